// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

//! The seam between the safe wrappers and the Azure Kinect SDK.
//!
//! Every function of the C API this crate uses has exactly one method on the
//! `Sdk` trait. Implementations do no bookkeeping of their own; lifecycle
//! checks, locking and error translation all happen in the wrappers.

use crate::{bindings as k4a,
            types::{ImageFormat, SeekOrigin}};
use std::{ffi::{c_void, CStr},
          fmt,
          ptr::NonNull};


/// An opaque, non-null SDK handle (device, capture, playback or recording).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RawHandle(NonNull<c_void>);

// SDK handles are plain identifiers which the SDK allows to be used from any
// thread; we never dereference them.
unsafe impl Send for RawHandle {}
unsafe impl Sync for RawHandle {}

impl RawHandle {
  /// Wraps a pointer handed out by the SDK, `None` if it is null.
  pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
    NonNull::new(ptr).map(Self)
  }

  pub fn as_raw(self) -> *mut c_void {
    self.0.as_ptr()
  }
}


/// Lifecycle of the handle owned by a `Playback` or `Record`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandleState {
  Unopened,
  Open(RawHandle),
  Closed,
}

impl HandleState {
  pub fn handle(&self) -> Option<RawHandle> {
    match self {
      Self::Open(handle) => Some(*handle),
      _ => None,
    }
  }

  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open(_))
  }

  /// Moves an open state to `Closed`, handing back the handle to be released.
  /// Returns `None` (and leaves the state untouched) if nothing is open, which
  /// makes releasing idempotent.
  pub fn take(&mut self) -> Option<RawHandle> {
    let handle = self.handle()?;
    *self = Self::Closed;
    Some(handle)
  }
}


/// This macro - internal use only - declares a Rust enum mirroring one of the
/// SDK's result codes. Codes we don't know are treated as failure.
macro_rules! result_enum {
  ($(#[$meta:meta])* $name:ident : $raw:ty {
    $($variant:ident = $code:path),* $(,)?
  }) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum $name {
      $($variant),*
    }

    impl $name {
      pub fn from_raw(raw: $raw) -> Self {
        match raw {
          $($code => Self::$variant,)*
          _ => Self::Failed,
        }
      }
    }
  }
}

result_enum! {
  /// `k4a_result_t`
  K4aResult: k4a::k4a_result_t {
    Succeeded = k4a::K4A_RESULT_SUCCEEDED,
    Failed = k4a::K4A_RESULT_FAILED,
  }
}

result_enum! {
  /// `k4a_buffer_result_t`
  BufferResult: k4a::k4a_buffer_result_t {
    Succeeded = k4a::K4A_BUFFER_RESULT_SUCCEEDED,
    Failed = k4a::K4A_BUFFER_RESULT_FAILED,
    TooSmall = k4a::K4A_BUFFER_RESULT_TOO_SMALL,
  }
}

result_enum! {
  /// `k4a_wait_result_t`
  WaitResult: k4a::k4a_wait_result_t {
    Succeeded = k4a::K4A_WAIT_RESULT_SUCCEEDED,
    Failed = k4a::K4A_WAIT_RESULT_FAILED,
    Timeout = k4a::K4A_WAIT_RESULT_TIMEOUT,
  }
}

result_enum! {
  /// `k4a_stream_result_t`, the outcome of reading from a playback
  StreamResult: k4a::k4a_stream_result_t {
    Succeeded = k4a::K4A_STREAM_RESULT_SUCCEEDED,
    Failed = k4a::K4A_STREAM_RESULT_FAILED,
    Eof = k4a::K4A_STREAM_RESULT_EOF,
  }
}


/// One method per SDK function. Out parameters are returned alongside the
/// result code; handles which come back null are `None`.
pub trait Sdk: fmt::Debug + Send + Sync {
  // DEVICE FUNCTIONS ------------------------------------------------------ //
  fn device_get_installed_count(&self) -> u32;
  fn device_open(&self, index: u32) -> (K4aResult, Option<RawHandle>);
  fn device_close(&self, device: RawHandle);
  fn device_start_cameras(&self,
                          device: RawHandle,
                          config: &k4a::k4a_device_configuration_t)
                          -> K4aResult;
  fn device_stop_cameras(&self, device: RawHandle);
  fn device_get_capture(&self,
                        device: RawHandle,
                        timeout_in_ms: i32)
                        -> (WaitResult, Option<RawHandle>);

  // CAPTURE FUNCTIONS ----------------------------------------------------- //
  fn capture_reference(&self, capture: RawHandle);
  fn capture_release(&self, capture: RawHandle);
  fn capture_get_temperature_c(&self, capture: RawHandle) -> f32;

  // PLAYBACK FUNCTIONS ---------------------------------------------------- //
  fn playback_open(&self, path: &CStr) -> (K4aResult, Option<RawHandle>);
  fn playback_get_calibration(&self,
                              playback: RawHandle)
                              -> (K4aResult, k4a::k4a_calibration_t);
  fn playback_get_record_configuration(
    &self,
    playback: RawHandle)
    -> (K4aResult, k4a::k4a_record_configuration_t);
  /// Reads tag `name` into `value` (an empty buffer only queries the size)
  /// and returns the buffer size the value requires, including the `\0`.
  fn playback_get_tag(&self,
                      playback: RawHandle,
                      name: &CStr,
                      value: &mut [u8])
                      -> (BufferResult, usize);
  fn playback_set_color_conversion(&self,
                                   playback: RawHandle,
                                   target_format: ImageFormat)
                                   -> K4aResult;
  fn playback_get_next_capture(&self,
                               playback: RawHandle)
                               -> (StreamResult, Option<RawHandle>);
  fn playback_get_previous_capture(&self,
                                   playback: RawHandle)
                                   -> (StreamResult, Option<RawHandle>);
  fn playback_get_next_imu_sample(&self,
                                  playback: RawHandle)
                                  -> (StreamResult, k4a::k4a_imu_sample_t);
  fn playback_get_previous_imu_sample(
    &self,
    playback: RawHandle)
    -> (StreamResult, k4a::k4a_imu_sample_t);
  fn playback_seek_timestamp(&self,
                             playback: RawHandle,
                             offset_usec: i64,
                             origin: SeekOrigin)
                             -> K4aResult;
  fn playback_get_recording_length_usec(&self, playback: RawHandle) -> u64;
  fn playback_get_last_timestamp_usec(&self, playback: RawHandle) -> u64;
  fn playback_close(&self, playback: RawHandle);

  // RECORD FUNCTIONS ------------------------------------------------------ //
  fn record_create(&self,
                   path: &CStr,
                   device: Option<RawHandle>,
                   device_config: k4a::k4a_device_configuration_t)
                   -> (K4aResult, Option<RawHandle>);
  fn record_add_tag(&self,
                    recording: RawHandle,
                    name: &CStr,
                    value: &CStr)
                    -> K4aResult;
  fn record_add_imu_track(&self, recording: RawHandle) -> K4aResult;
  fn record_write_header(&self, recording: RawHandle) -> K4aResult;
  fn record_write_capture(&self,
                          recording: RawHandle,
                          capture: RawHandle)
                          -> K4aResult;
  fn record_write_imu_sample(&self,
                             recording: RawHandle,
                             imu_sample: k4a::k4a_imu_sample_t)
                             -> K4aResult;
  fn record_flush(&self, recording: RawHandle) -> K4aResult;
  fn record_close(&self, recording: RawHandle);
}
