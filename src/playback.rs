// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{error::check,
            sdk::{BufferResult, HandleState, RawHandle, Sdk, StreamResult},
            types::{ColorResolution, ImageFormat, SeekOrigin},
            util,
            Calibration,
            Capture,
            ImuSample,
            K4aError,
            RecordConfiguration,
            Result};
use chrono::Duration;
use eyre::bail;
use std::{path::Path,
          sync::{Arc, Mutex, MutexGuard, PoisonError}};
use tracing::{debug, trace, warn};


/// A recording opened for reading.
///
/// Calibration and track configuration are read once when the file is opened.
/// Captures and IMU samples are then pulled one at a time until the end of the
/// stream. Reads take `&self` and are serialized per `Playback`, so one
/// instance can be shared between threads.
///
/// The file is closed when the `Playback` goes out of scope.
#[derive(Debug)]
pub struct Playback {
  sdk:           Arc<dyn Sdk>,
  state:         HandleState,
  calibration:   Option<Calibration>,
  configuration: Option<RecordConfiguration>,
  /// serializes stream access and holds the outcome of the last read
  last_result:   Mutex<Option<StreamResult>>,
}

// DESTRUCTOR - CLOSES FILE ------------------------------------------------ //
impl Drop for Playback {
  fn drop(&mut self) {
    self.close();
  }
}

impl Playback {
  /// Creates a `Playback` which has no file open yet.
  pub fn new(sdk: Arc<dyn Sdk>) -> Self {
    Self { sdk,
           state: HandleState::Unopened,
           calibration: None,
           configuration: None,
           last_result: Mutex::new(None) }
  }

  /// Creates a `Playback` and opens the recording at `path`.
  pub fn load(sdk: Arc<dyn Sdk>, path: impl AsRef<Path>) -> Result<Self> {
    let mut playback = Self::new(sdk);
    playback.open(path)?;
    Ok(playback)
  }

  // FILE OPENING / CLOSING FUNCTIONS -------------------------------------- //
  /// Opens the recording at `path` and reads its configuration and
  /// calibration. Recordings with a color track are set up to deliver color
  /// images as BGRA32.
  ///
  /// Fails if this `Playback` already has a file open, or had one open
  /// before. If the SDK fails after the file was opened, the file is closed
  /// again and this `Playback` stays unopened.
  pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
    match self.state {
      HandleState::Unopened => {}
      HandleState::Open(_) => {
        bail!(K4aError::InvalidState("playback file is open, close it first"))
      }
      HandleState::Closed => {
        bail!(K4aError::InvalidState("playback file has been closed"))
      }
    }

    let path = path.as_ref();
    let (result, handle) =
      self.sdk.playback_open(&util::path_to_cstring(path)?);
    check("k4a_playback_open", result)?;
    let handle = match handle {
      Some(handle) => handle,
      None => bail!(K4aError::InvalidHandle { call: "k4a_playback_open" }),
    };

    match self.read_header(handle) {
      Ok((configuration, calibration)) => {
        self.state = HandleState::Open(handle);
        self.configuration = Some(configuration);
        self.calibration = Some(calibration);
        debug!(path = %path.display(), "opened playback");
        Ok(())
      }
      Err(err) => {
        self.sdk.playback_close(handle);
        Err(err)
      }
    }
  }

  /// Everything we read from a file right after opening it.
  fn read_header(&self,
                 handle: RawHandle)
                 -> Result<(RecordConfiguration, Calibration)> {
    let (result, native) = self.sdk.playback_get_record_configuration(handle);
    check("k4a_playback_get_record_configuration", result)?;
    let configuration = RecordConfiguration::from_native(&native)?;

    let (result, native) = self.sdk.playback_get_calibration(handle);
    check("k4a_playback_get_calibration", result)?;
    let calibration = Calibration::from_native(&native)?;

    if calibration.color_resolution() != ColorResolution::Off {
      check("k4a_playback_set_color_conversion",
            self.sdk
                .playback_set_color_conversion(handle,
                                               ImageFormat::ColorBgra32))?;
    }

    Ok((configuration, calibration))
  }

  /// Closes the file; no-op if no file is open.
  pub fn close(&mut self) {
    if let Some(handle) = self.state.take() {
      self.sdk.playback_close(handle);
      debug!("closed playback");
    }
  }

  pub fn is_open(&self) -> bool {
    self.state.is_open()
  }

  /// The SDK handle while a file is open.
  pub fn raw_handle(&self) -> Option<RawHandle> {
    self.state.handle()
  }

  // RECORDING LEVEL FUNCTIONS --------------------------------------------- //
  /// Calibration of the device the recording was made with.
  pub fn calibration(&self) -> Result<&Calibration> {
    self.handle()?;
    match &self.calibration {
      Some(calibration) => Ok(calibration),
      None => bail!(K4aError::InvalidState("playback file hasn't been opened")),
    }
  }

  /// Track layout of the recording.
  pub fn configuration(&self) -> Result<&RecordConfiguration> {
    self.handle()?;
    match &self.configuration {
      Some(configuration) => Ok(configuration),
      None => bail!(K4aError::InvalidState("playback file hasn't been opened")),
    }
  }

  /// Value of the tag `name`, `None` if the recording has no such tag.
  pub fn tag(&self, name: &str) -> Result<Option<String>> {
    let handle = self.handle()?;
    let name = util::strref_to_cstring(name)?;

    // first call only asks for the size the value needs
    let (result, size) = self.sdk.playback_get_tag(handle, &name, &mut []);
    match result {
      BufferResult::Failed => return Ok(None),
      BufferResult::Succeeded => return Ok(Some(String::new())),
      BufferResult::TooSmall => {}
    }

    let mut buffer = vec![0u8; size];
    let (result, _) = self.sdk.playback_get_tag(handle, &name, &mut buffer);
    match result {
      BufferResult::Succeeded => Ok(Some(util::buffer_to_string(&buffer)?)),
      _ => bail!(K4aError::native("k4a_playback_get_tag", result)),
    }
  }

  /// Length of the recording.
  pub fn recording_length(&self) -> Result<Duration> {
    let handle = self.handle()?;
    let usec = self.sdk.playback_get_recording_length_usec(handle);
    Ok(util::usec_to_duration(usec))
  }

  /// Device timestamp of the last capture or IMU sample read.
  pub fn last_timestamp(&self) -> Result<Duration> {
    let handle = self.handle()?;
    let usec = self.sdk.playback_get_last_timestamp_usec(handle);
    Ok(util::usec_to_duration(usec))
  }

  // STREAM FUNCTIONS ------------------------------------------------------ //
  /// Reads the next capture. `Ok(None)` at the end of the recording.
  pub fn next_capture(&self) -> Result<Option<Capture>> {
    let handle = self.handle()?;
    let mut last_result = self.lock_stream();
    let (result, capture) = self.sdk.playback_get_next_capture(handle);
    *last_result = Some(result);
    self.wrap_capture("k4a_playback_get_next_capture", result, capture)
  }

  /// Reads the capture before the current read position. `Ok(None)` at the
  /// beginning of the recording.
  pub fn previous_capture(&self) -> Result<Option<Capture>> {
    let handle = self.handle()?;
    let mut last_result = self.lock_stream();
    let (result, capture) = self.sdk.playback_get_previous_capture(handle);
    *last_result = Some(result);
    self.wrap_capture("k4a_playback_get_previous_capture", result, capture)
  }

  /// Reads the next IMU sample. `Ok(None)` at the end of the recording.
  pub fn next_imu_sample(&self) -> Result<Option<ImuSample>> {
    let handle = self.handle()?;
    let mut last_result = self.lock_stream();
    let (result, native) = self.sdk.playback_get_next_imu_sample(handle);
    *last_result = Some(result);
    match result {
      StreamResult::Eof => Ok(None),
      StreamResult::Failed => {
        bail!(K4aError::native("k4a_playback_get_next_imu_sample", result))
      }
      StreamResult::Succeeded => {
        trace!(acc_timestamp_usec = native.acc_timestamp_usec,
               "read imu sample");
        Ok(Some(ImuSample::from(&native)))
      }
    }
  }

  /// Reads the IMU sample before the current read position. `Ok(None)` at
  /// the beginning of the recording.
  pub fn previous_imu_sample(&self) -> Result<Option<ImuSample>> {
    let handle = self.handle()?;
    let mut last_result = self.lock_stream();
    let (result, native) = self.sdk.playback_get_previous_imu_sample(handle);
    *last_result = Some(result);
    match result {
      StreamResult::Eof => Ok(None),
      StreamResult::Failed => {
        bail!(K4aError::native("k4a_playback_get_previous_imu_sample", result))
      }
      StreamResult::Succeeded => Ok(Some(ImuSample::from(&native))),
    }
  }

  /// Iterates over the remaining captures. Stops after the end of the
  /// recording or the first error.
  pub fn captures(&self) -> Captures<'_> {
    Captures { playback: self,
               done:     false, }
  }

  /// Iterates over the remaining IMU samples. Stops after the end of the
  /// recording or the first error.
  pub fn imu_samples(&self) -> ImuSamples<'_> {
    ImuSamples { playback: self,
                 done:     false, }
  }

  /// Whether the last read returned a capture or sample. `false` before the
  /// first read.
  pub fn is_stream_read_success(&self) -> bool {
    *self.lock_stream() == Some(StreamResult::Succeeded)
  }

  /// Whether the last read hit the end (or beginning) of the recording.
  /// `false` before the first read.
  pub fn is_end_of_stream(&self) -> bool {
    *self.lock_stream() == Some(StreamResult::Eof)
  }

  /// Moves the read position to `timestamp`, measured from the beginning of
  /// the recording. Returns whether the seek succeeded; never fails.
  pub fn seek_timestamp(&self, timestamp: Duration) -> bool {
    self.seek(timestamp, SeekOrigin::Begin)
  }

  /// Moves the read position by `offset` relative to `origin`. Returns
  /// whether the seek succeeded; never fails.
  pub fn seek(&self, offset: Duration, origin: SeekOrigin) -> bool {
    let handle = match self.state.handle() {
      Some(handle) => handle,
      None => return false,
    };
    let offset_usec = match util::duration_to_usec(offset) {
      Ok(offset_usec) => offset_usec,
      Err(err) => {
        warn!(%err, "seek offset out of range");
        return false;
      }
    };

    let _guard = self.lock_stream();
    let result =
      self.sdk.playback_seek_timestamp(handle, offset_usec, origin);
    if check("k4a_playback_seek_timestamp", result).is_err() {
      warn!(offset_usec, ?origin, "seek failed");
      return false;
    }
    true
  }

  // ----------------------------------------------------------------------- //
  fn handle(&self) -> Result<RawHandle> {
    match self.state {
      HandleState::Open(handle) => Ok(handle),
      HandleState::Unopened => {
        bail!(K4aError::InvalidState("playback file hasn't been opened"))
      }
      HandleState::Closed => {
        bail!(K4aError::InvalidState("playback file has been closed"))
      }
    }
  }

  fn lock_stream(&self) -> MutexGuard<'_, Option<StreamResult>> {
    self.last_result
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
  }

  fn wrap_capture(&self,
                call: &'static str,
                result: StreamResult,
                capture: Option<RawHandle>)
                -> Result<Option<Capture>> {
    match result {
      StreamResult::Eof => Ok(None),
      StreamResult::Failed => bail!(K4aError::native(call, result)),
      StreamResult::Succeeded => match capture {
        Some(capture) => {
          trace!(call, "read capture");
          Ok(Some(Capture::from_raw(self.sdk.clone(), capture)))
        }
        None => bail!(K4aError::InvalidHandle { call }),
      },
    }
  }
}


/// Iterator over the captures of a `Playback`, see `Playback::captures`.
#[derive(Debug)]
pub struct Captures<'a> {
  playback: &'a Playback,
  done:     bool,
}

impl Iterator for Captures<'_> {
  type Item = Result<Capture>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.playback.next_capture() {
      Ok(Some(capture)) => Some(Ok(capture)),
      Ok(None) => {
        self.done = true;
        None
      }
      Err(err) => {
        self.done = true;
        Some(Err(err))
      }
    }
  }
}


/// Iterator over the IMU samples of a `Playback`, see
/// `Playback::imu_samples`.
#[derive(Debug)]
pub struct ImuSamples<'a> {
  playback: &'a Playback,
  done:     bool,
}

impl Iterator for ImuSamples<'_> {
  type Item = Result<ImuSample>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.playback.next_imu_sample() {
      Ok(Some(sample)) => Some(Ok(sample)),
      Ok(None) => {
        self.done = true;
        None
      }
      Err(err) => {
        self.done = true;
        Some(Err(err))
      }
    }
  }
}
