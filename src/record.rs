// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{error::check,
            sdk::{HandleState, RawHandle, Sdk},
            util,
            Capture,
            Device,
            DeviceConfiguration,
            ImuSample,
            K4aError,
            Result};
use eyre::bail;
use serde::{Deserialize, Serialize};
use std::{path::Path,
          sync::{Arc, Mutex, MutexGuard, PoisonError}};
use tracing::{debug, trace, warn};


/// What goes into a recording besides the camera tracks. Everything here is
/// part of the file header, so it has to be known when the file is created.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RecordOptions {
  /// custom metadata tags (name, value), written in order
  pub tags:      Vec<(String, String)>,
  /// whether to add a track for IMU samples
  pub imu_track: bool,
}


/// A recording being written from a live device.
///
/// Writes take `&self` and are serialized per `Record`. Call `close` to flush
/// buffered data to disk before closing; dropping a `Record` closes the file
/// without flushing.
#[derive(Debug)]
pub struct Record {
  sdk:   Arc<dyn Sdk>,
  state: HandleState,
  io:    Mutex<()>,
}

// DESTRUCTOR - CLOSES FILE ------------------------------------------------ //
impl Drop for Record {
  fn drop(&mut self) {
    if let Some(handle) = self.state.take() {
      self.sdk.record_close(handle);
      debug!("closed recording without flushing");
    }
  }
}

impl Record {
  /// Creates a `Record` which has no file open yet.
  pub fn new(sdk: Arc<dyn Sdk>) -> Self {
    Self { sdk,
           state: HandleState::Unopened,
           io: Mutex::new(()) }
  }

  // FILE CREATION / CLOSING FUNCTIONS ------------------------------------- //
  /// Creates the recording at `path` for captures of `device`, started with
  /// `config`, and writes the file header.
  pub fn create(&mut self,
                path: impl AsRef<Path>,
                device: &Device,
                config: &DeviceConfiguration)
                -> Result<()> {
    self.create_with(path, device, config, &RecordOptions::default())
  }

  /// Like `create`, but adds the tags and tracks in `options` before the
  /// header is written.
  ///
  /// Once the SDK has created the file, this `Record` owns it: if adding
  /// tags, tracks or the header fails, the error is returned and the file
  /// stays open until `close` or drop.
  pub fn create_with(&mut self,
                     path: impl AsRef<Path>,
                     device: &Device,
                     config: &DeviceConfiguration,
                     options: &RecordOptions)
                     -> Result<()> {
    match self.state {
      HandleState::Unopened => {}
      HandleState::Open(_) => {
        bail!(K4aError::InvalidState("recording file is open, close it first"))
      }
      HandleState::Closed => {
        bail!(K4aError::InvalidState("recording file has been closed"))
      }
    }

    let path = path.as_ref();
    let native = config.to_native()?;
    let (result, handle) =
      self.sdk.record_create(&util::path_to_cstring(path)?,
                             Some(device.raw_handle()),
                             native);
    check("k4a_record_create", result)?;
    let handle = match handle {
      Some(handle) => handle,
      None => bail!(K4aError::InvalidHandle { call: "k4a_record_create" }),
    };
    self.state = HandleState::Open(handle);
    debug!(path = %path.display(), device = device.index(), "created recording");

    for (name, value) in &options.tags {
      let name = util::strref_to_cstring(name)?;
      let value = util::strref_to_cstring(value)?;
      check("k4a_record_add_tag",
            self.sdk.record_add_tag(handle, &name, &value))?;
    }
    if options.imu_track {
      check("k4a_record_add_imu_track",
            self.sdk.record_add_imu_track(handle))?;
    }

    check("k4a_record_write_header", self.sdk.record_write_header(handle))
  }

  /// Flushes and closes the file; no-op if no file is open. The file is
  /// closed even if flushing fails, the flush error is returned afterwards.
  pub fn close(&mut self) -> Result<()> {
    let handle = match self.state.take() {
      Some(handle) => handle,
      None => return Ok(()),
    };

    let flushed = check("k4a_record_flush", self.sdk.record_flush(handle));
    if let Err(err) = &flushed {
      warn!(%err, "flush failed, closing recording anyway");
    }
    self.sdk.record_close(handle);
    debug!("closed recording");
    flushed
  }

  pub fn is_open(&self) -> bool {
    self.state.is_open()
  }

  /// The SDK handle while a file is open.
  pub fn raw_handle(&self) -> Option<RawHandle> {
    self.state.handle()
  }

  // WRITE FUNCTIONS ------------------------------------------------------- //
  /// Writes `capture` to the file. `Ok(false)` if there is nothing to write.
  pub fn write_capture(&self, capture: Option<&Capture>) -> Result<bool> {
    let capture = match capture {
      Some(capture) => capture,
      None => return Ok(false),
    };
    let handle = self.handle()?;

    let _guard = self.lock_io();
    check("k4a_record_write_capture",
          self.sdk.record_write_capture(handle, capture.raw_handle()))?;
    trace!("wrote capture");
    Ok(true)
  }

  /// Writes `sample` to the IMU track, which must have been added with
  /// `RecordOptions::imu_track`.
  pub fn write_imu_sample(&self, sample: &ImuSample) -> Result<()> {
    let handle = self.handle()?;

    let _guard = self.lock_io();
    check("k4a_record_write_imu_sample",
          self.sdk.record_write_imu_sample(handle, sample.to_native()))?;
    trace!(acc_timestamp_usec = sample.acc_timestamp_usec(),
           "wrote imu sample");
    Ok(())
  }

  /// Flushes buffered data to disk.
  pub fn flush(&self) -> Result<()> {
    let handle = self.handle()?;

    let _guard = self.lock_io();
    check("k4a_record_flush", self.sdk.record_flush(handle))
  }

  // ----------------------------------------------------------------------- //
  fn handle(&self) -> Result<RawHandle> {
    match self.state {
      HandleState::Open(handle) => Ok(handle),
      HandleState::Unopened => {
        bail!(K4aError::InvalidState("recording file hasn't been created"))
      }
      HandleState::Closed => {
        bail!(K4aError::InvalidState("recording file has been closed"))
      }
    }
  }

  fn lock_io(&self) -> MutexGuard<'_, ()> {
    self.io.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
