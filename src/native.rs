// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{bindings as k4a,
            sdk::{BufferResult, K4aResult, RawHandle, Sdk, StreamResult,
                  WaitResult},
            types::{ImageFormat, SeekOrigin}};
use lazy_static::lazy_static;
use std::{ffi::CStr,
          os::raw::{c_char, c_void},
          ptr,
          sync::Arc};


lazy_static! {
  static ref NATIVE_SDK: Arc<dyn Sdk> = Arc::new(NativeSdk);
}

/// The installed Azure Kinect SDK (`k4a` and `k4arecord`).
pub fn native_sdk() -> Arc<dyn Sdk> {
  NATIVE_SDK.clone()
}


/// `Sdk` implementation which calls straight into the C libraries.
#[derive(Debug)]
pub struct NativeSdk;

fn raw(handle: Option<RawHandle>) -> *mut c_void {
  handle.map_or(ptr::null_mut(), RawHandle::as_raw)
}

impl Sdk for NativeSdk {
  // DEVICE FUNCTIONS ------------------------------------------------------ //
  fn device_get_installed_count(&self) -> u32 {
    unsafe { k4a::k4a_device_get_installed_count() }
  }

  fn device_open(&self, index: u32) -> (K4aResult, Option<RawHandle>) {
    let mut handle: k4a::k4a_device_t = ptr::null_mut();
    let result = unsafe { k4a::k4a_device_open(index, &mut handle) };
    (K4aResult::from_raw(result), RawHandle::from_raw(handle))
  }

  fn device_close(&self, device: RawHandle) {
    unsafe { k4a::k4a_device_close(device.as_raw()) }
  }

  fn device_start_cameras(&self,
                          device: RawHandle,
                          config: &k4a::k4a_device_configuration_t)
                          -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_device_start_cameras(device.as_raw(), config)
    })
  }

  fn device_stop_cameras(&self, device: RawHandle) {
    unsafe { k4a::k4a_device_stop_cameras(device.as_raw()) }
  }

  fn device_get_capture(&self,
                        device: RawHandle,
                        timeout_in_ms: i32)
                        -> (WaitResult, Option<RawHandle>) {
    let mut capture: k4a::k4a_capture_t = ptr::null_mut();
    let result = unsafe {
      k4a::k4a_device_get_capture(device.as_raw(), &mut capture, timeout_in_ms)
    };
    (WaitResult::from_raw(result), RawHandle::from_raw(capture))
  }

  // CAPTURE FUNCTIONS ----------------------------------------------------- //
  fn capture_reference(&self, capture: RawHandle) {
    unsafe { k4a::k4a_capture_reference(capture.as_raw()) }
  }

  fn capture_release(&self, capture: RawHandle) {
    unsafe { k4a::k4a_capture_release(capture.as_raw()) }
  }

  fn capture_get_temperature_c(&self, capture: RawHandle) -> f32 {
    unsafe { k4a::k4a_capture_get_temperature_c(capture.as_raw()) }
  }

  // PLAYBACK FUNCTIONS ---------------------------------------------------- //
  fn playback_open(&self, path: &CStr) -> (K4aResult, Option<RawHandle>) {
    let mut handle: k4a::k4a_playback_t = ptr::null_mut();
    let result = unsafe { k4a::k4a_playback_open(path.as_ptr(), &mut handle) };
    (K4aResult::from_raw(result), RawHandle::from_raw(handle))
  }

  fn playback_get_calibration(&self,
                              playback: RawHandle)
                              -> (K4aResult, k4a::k4a_calibration_t) {
    let mut calibration = k4a::k4a_calibration_t::default();
    let result = unsafe {
      k4a::k4a_playback_get_calibration(playback.as_raw(), &mut calibration)
    };
    (K4aResult::from_raw(result), calibration)
  }

  fn playback_get_record_configuration(
    &self,
    playback: RawHandle)
    -> (K4aResult, k4a::k4a_record_configuration_t) {
    let mut config = k4a::k4a_record_configuration_t::default();
    let result = unsafe {
      k4a::k4a_playback_get_record_configuration(playback.as_raw(),
                                                 &mut config)
    };
    (K4aResult::from_raw(result), config)
  }

  fn playback_get_tag(&self,
                      playback: RawHandle,
                      name: &CStr,
                      value: &mut [u8])
                      -> (BufferResult, usize) {
    let mut size = value.len();
    // the SDK expects NULL, not a dangling pointer, when only querying size
    let buffer: *mut c_char = if value.is_empty() {
      ptr::null_mut()
    } else {
      value.as_mut_ptr().cast()
    };
    let result = unsafe {
      k4a::k4a_playback_get_tag(playback.as_raw(),
                                name.as_ptr(),
                                buffer,
                                &mut size)
    };
    (BufferResult::from_raw(result), size)
  }

  fn playback_set_color_conversion(&self,
                                   playback: RawHandle,
                                   target_format: ImageFormat)
                                   -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_playback_set_color_conversion(playback.as_raw(),
                                             target_format.as_raw())
    })
  }

  fn playback_get_next_capture(&self,
                               playback: RawHandle)
                               -> (StreamResult, Option<RawHandle>) {
    let mut capture: k4a::k4a_capture_t = ptr::null_mut();
    let result = unsafe {
      k4a::k4a_playback_get_next_capture(playback.as_raw(), &mut capture)
    };
    (StreamResult::from_raw(result), RawHandle::from_raw(capture))
  }

  fn playback_get_previous_capture(&self,
                                   playback: RawHandle)
                                   -> (StreamResult, Option<RawHandle>) {
    let mut capture: k4a::k4a_capture_t = ptr::null_mut();
    let result = unsafe {
      k4a::k4a_playback_get_previous_capture(playback.as_raw(), &mut capture)
    };
    (StreamResult::from_raw(result), RawHandle::from_raw(capture))
  }

  fn playback_get_next_imu_sample(&self,
                                  playback: RawHandle)
                                  -> (StreamResult, k4a::k4a_imu_sample_t) {
    let mut sample = k4a::k4a_imu_sample_t::default();
    let result = unsafe {
      k4a::k4a_playback_get_next_imu_sample(playback.as_raw(), &mut sample)
    };
    (StreamResult::from_raw(result), sample)
  }

  fn playback_get_previous_imu_sample(
    &self,
    playback: RawHandle)
    -> (StreamResult, k4a::k4a_imu_sample_t) {
    let mut sample = k4a::k4a_imu_sample_t::default();
    let result = unsafe {
      k4a::k4a_playback_get_previous_imu_sample(playback.as_raw(), &mut sample)
    };
    (StreamResult::from_raw(result), sample)
  }

  fn playback_seek_timestamp(&self,
                             playback: RawHandle,
                             offset_usec: i64,
                             origin: SeekOrigin)
                             -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_playback_seek_timestamp(playback.as_raw(),
                                       offset_usec,
                                       origin.as_raw())
    })
  }

  fn playback_get_recording_length_usec(&self, playback: RawHandle) -> u64 {
    unsafe { k4a::k4a_playback_get_recording_length_usec(playback.as_raw()) }
  }

  fn playback_get_last_timestamp_usec(&self, playback: RawHandle) -> u64 {
    unsafe { k4a::k4a_playback_get_last_timestamp_usec(playback.as_raw()) }
  }

  fn playback_close(&self, playback: RawHandle) {
    unsafe { k4a::k4a_playback_close(playback.as_raw()) }
  }

  // RECORD FUNCTIONS ------------------------------------------------------ //
  fn record_create(&self,
                   path: &CStr,
                   device: Option<RawHandle>,
                   device_config: k4a::k4a_device_configuration_t)
                   -> (K4aResult, Option<RawHandle>) {
    let mut handle: k4a::k4a_record_t = ptr::null_mut();
    let result = unsafe {
      k4a::k4a_record_create(path.as_ptr(),
                             raw(device),
                             device_config,
                             &mut handle)
    };
    (K4aResult::from_raw(result), RawHandle::from_raw(handle))
  }

  fn record_add_tag(&self,
                    recording: RawHandle,
                    name: &CStr,
                    value: &CStr)
                    -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_record_add_tag(recording.as_raw(), name.as_ptr(), value.as_ptr())
    })
  }

  fn record_add_imu_track(&self, recording: RawHandle) -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_record_add_imu_track(recording.as_raw())
    })
  }

  fn record_write_header(&self, recording: RawHandle) -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_record_write_header(recording.as_raw())
    })
  }

  fn record_write_capture(&self,
                          recording: RawHandle,
                          capture: RawHandle)
                          -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_record_write_capture(recording.as_raw(), capture.as_raw())
    })
  }

  fn record_write_imu_sample(&self,
                             recording: RawHandle,
                             imu_sample: k4a::k4a_imu_sample_t)
                             -> K4aResult {
    K4aResult::from_raw(unsafe {
      k4a::k4a_record_write_imu_sample(recording.as_raw(), imu_sample)
    })
  }

  fn record_flush(&self, recording: RawHandle) -> K4aResult {
    K4aResult::from_raw(unsafe { k4a::k4a_record_flush(recording.as_raw()) })
  }

  fn record_close(&self, recording: RawHandle) {
    unsafe { k4a::k4a_record_close(recording.as_raw()) }
  }
}
