// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::sdk::{RawHandle, Sdk};
use std::sync::Arc;


/// A synchronized set of color, depth and IR images taken at one point in
/// time, read from a device or a recording.
///
/// Owns one SDK reference to the capture: cloning adds a reference, dropping
/// releases one, and the SDK frees the capture with the last release.
#[derive(Debug)]
pub struct Capture {
  sdk:    Arc<dyn Sdk>,
  handle: RawHandle,
}

impl Capture {
  /// Takes ownership of a capture reference handed out by the SDK.
  pub(crate) fn from_raw(sdk: Arc<dyn Sdk>, handle: RawHandle) -> Self {
    Self { sdk, handle }
  }

  /// The SDK handle; stays valid as long as this `Capture` lives.
  pub fn raw_handle(&self) -> RawHandle {
    self.handle
  }

  /// Device temperature in degrees Celsius when the capture was taken, `None`
  /// if the SDK doesn't know it.
  pub fn temperature_c(&self) -> Option<f32> {
    let temperature = self.sdk.capture_get_temperature_c(self.handle);
    if temperature.is_nan() {
      None
    } else {
      Some(temperature)
    }
  }
}

impl Clone for Capture {
  fn clone(&self) -> Self {
    self.sdk.capture_reference(self.handle);
    Self { sdk:    self.sdk.clone(),
           handle: self.handle, }
  }
}

// DESTRUCTOR - RELEASES CAPTURE ------------------------------------------- //
impl Drop for Capture {
  fn drop(&mut self) {
    self.sdk.capture_release(self.handle);
  }
}
