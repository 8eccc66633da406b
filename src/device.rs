// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{error::check,
            sdk::{RawHandle, Sdk, WaitResult},
            Capture,
            DeviceConfiguration,
            K4aError,
            Result};
use eyre::{bail, ensure};
use std::{convert::TryFrom, sync::Arc, time::Duration};
use tracing::{debug, trace};


/// An open Azure Kinect device.
///
/// The device is closed (and its cameras stopped) when the `Device` goes out
/// of scope.
#[derive(Debug)]
pub struct Device {
  sdk:             Arc<dyn Sdk>,
  handle:          RawHandle,
  index:           u32,
  cameras_running: bool,
}

// DESTRUCTOR - CLOSES DEVICE ---------------------------------------------- //
impl Drop for Device {
  fn drop(&mut self) {
    if self.cameras_running {
      self.sdk.device_stop_cameras(self.handle);
    }
    self.sdk.device_close(self.handle);
    debug!(index = self.index, "closed device");
  }
}

impl Device {
  /// Number of devices connected to this machine.
  pub fn installed_count(sdk: &dyn Sdk) -> u32 {
    sdk.device_get_installed_count()
  }

  /// Opens the device with the given zero based index.
  pub fn open(sdk: Arc<dyn Sdk>, index: u32) -> Result<Self> {
    let (result, handle) = sdk.device_open(index);
    check("k4a_device_open", result)?;
    let handle = match handle {
      Some(handle) => handle,
      None => bail!(K4aError::InvalidHandle { call: "k4a_device_open" }),
    };

    debug!(index, "opened device");
    Ok(Self { sdk,
              handle,
              index,
              cameras_running: false })
  }

  pub fn index(&self) -> u32 {
    self.index
  }

  /// The SDK handle; stays valid as long as this `Device` lives.
  pub fn raw_handle(&self) -> RawHandle {
    self.handle
  }

  pub fn cameras_running(&self) -> bool {
    self.cameras_running
  }

  /// Starts color and depth cameras with `config`.
  pub fn start_cameras(&mut self, config: &DeviceConfiguration) -> Result<()> {
    ensure!(!self.cameras_running,
            K4aError::InvalidState("cameras are already running"));

    let native = config.to_native()?;
    check("k4a_device_start_cameras",
          self.sdk.device_start_cameras(self.handle, &native))?;
    self.cameras_running = true;

    debug!(index = self.index, ?config, "started cameras");
    Ok(())
  }

  /// Stops color and depth cameras; no-op if they aren't running.
  pub fn stop_cameras(&mut self) {
    if self.cameras_running {
      self.sdk.device_stop_cameras(self.handle);
      self.cameras_running = false;
      debug!(index = self.index, "stopped cameras");
    }
  }

  /// Waits for the next capture. `None` as timeout blocks until a capture
  /// arrives; a timeout returns `Ok(None)`.
  pub fn capture(&self, timeout: Option<Duration>) -> Result<Option<Capture>> {
    ensure!(self.cameras_running,
            K4aError::InvalidState("cameras are not running"));

    let timeout_in_ms = match timeout {
      Some(timeout) => i32::try_from(timeout.as_millis()).map_err(|_| {
        K4aError::InvalidValue(format!("timeout out of range ({:?})", timeout))
      })?,
      None => -1,
    };

    let (result, handle) =
      self.sdk.device_get_capture(self.handle, timeout_in_ms);
    match result {
      WaitResult::Timeout => Ok(None),
      WaitResult::Failed => {
        bail!(K4aError::native("k4a_device_get_capture", result))
      }
      WaitResult::Succeeded => match handle {
        Some(handle) => {
          trace!(index = self.index, "read capture from device");
          Ok(Some(Capture::from_raw(self.sdk.clone(), handle)))
        }
        None => bail!(K4aError::InvalidHandle { call: "k4a_device_get_capture" }),
      },
    }
  }
}
