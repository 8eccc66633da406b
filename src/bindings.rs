// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

#![allow(non_camel_case_types)]

use std::os::raw::{c_int, c_void};
#[cfg(feature = "native")]
use std::os::raw::{c_char, c_float};


// OPAQUE HANDLES ---------------------------------------------------------- //
pub type k4a_device_t = *mut c_void;
pub type k4a_capture_t = *mut c_void;
pub type k4a_playback_t = *mut c_void;
pub type k4a_record_t = *mut c_void;
// ------------------------------------------------------------------------- //

// RESULT CODES ------------------------------------------------------------ //
//
// these are C enums, which we keep as plain integers on the FFI boundary:
// receiving a value from C that isn't a valid variant of a Rust enum is
// undefined behaviour, and the SDK may well grow new codes.
pub type k4a_result_t = c_int;
pub const K4A_RESULT_SUCCEEDED: k4a_result_t = 0;
pub const K4A_RESULT_FAILED: k4a_result_t = 1;

pub type k4a_buffer_result_t = c_int;
pub const K4A_BUFFER_RESULT_SUCCEEDED: k4a_buffer_result_t = 0;
pub const K4A_BUFFER_RESULT_FAILED: k4a_buffer_result_t = 1;
pub const K4A_BUFFER_RESULT_TOO_SMALL: k4a_buffer_result_t = 2;

pub type k4a_wait_result_t = c_int;
pub const K4A_WAIT_RESULT_SUCCEEDED: k4a_wait_result_t = 0;
pub const K4A_WAIT_RESULT_FAILED: k4a_wait_result_t = 1;
pub const K4A_WAIT_RESULT_TIMEOUT: k4a_wait_result_t = 2;

pub type k4a_stream_result_t = c_int;
pub const K4A_STREAM_RESULT_SUCCEEDED: k4a_stream_result_t = 0;
pub const K4A_STREAM_RESULT_FAILED: k4a_stream_result_t = 1;
pub const K4A_STREAM_RESULT_EOF: k4a_stream_result_t = 2;
// ------------------------------------------------------------------------- //

// ENUMERATIONS ------------------------------------------------------------ //
pub type k4a_image_format_t = c_int;
pub type k4a_color_resolution_t = c_int;
pub type k4a_depth_mode_t = c_int;
pub type k4a_fps_t = c_int;
pub type k4a_wired_sync_mode_t = c_int;
pub type k4a_playback_seek_origin_t = c_int;
pub type k4a_calibration_model_type_t = c_int;

/// Number of sensors in `k4a_calibration_t::extrinsics` (depth, color, gyro,
/// accel)
pub const K4A_CALIBRATION_TYPE_NUM: usize = 4;
// ------------------------------------------------------------------------- //


// STRUCTS ----------------------------------------------------------------- //
/// Binding to `k4a_device_configuration_t`, passed by value to
/// `k4a_record_create` and by pointer to `k4a_device_start_cameras`
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_device_configuration_t {
  pub color_format:                      k4a_image_format_t,
  pub color_resolution:                  k4a_color_resolution_t,
  pub depth_mode:                        k4a_depth_mode_t,
  pub camera_fps:                        k4a_fps_t,
  pub synchronized_images_only:          bool,
  pub depth_delay_off_color_usec:        i32,
  pub wired_sync_mode:                   k4a_wired_sync_mode_t,
  pub subordinate_delay_off_master_usec: u32,
  pub disable_streaming_indicator:       bool,
}

/// Binding to `k4a_record_configuration_t`, the track layout of a recording
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_record_configuration_t {
  pub color_format:                      k4a_image_format_t,
  pub color_resolution:                  k4a_color_resolution_t,
  pub depth_mode:                        k4a_depth_mode_t,
  pub camera_fps:                        k4a_fps_t,
  pub color_track_enabled:               bool,
  pub depth_track_enabled:               bool,
  pub ir_track_enabled:                  bool,
  pub imu_track_enabled:                 bool,
  pub depth_delay_off_color_usec:        i32,
  pub wired_sync_mode:                   k4a_wired_sync_mode_t,
  pub subordinate_delay_off_master_usec: u32,
  pub start_timestamp_offset_usec:       u32,
}

/// Binding to `k4a_calibration_extrinsics_t`
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_calibration_extrinsics_t {
  pub rotation:    [f32; 9], // row major 3x3
  pub translation: [f32; 3], // millimeters
}

/// Binding to `k4a_calibration_intrinsics_t`. The parameters are a C union
/// of a named struct and `float v[15]`; we only ever need the array view.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_calibration_intrinsics_t {
  pub type_:           k4a_calibration_model_type_t,
  pub parameter_count: u32,
  pub parameters:      [f32; 15],
}

/// Binding to `k4a_calibration_camera_t`
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_calibration_camera_t {
  pub extrinsics:        k4a_calibration_extrinsics_t,
  pub intrinsics:        k4a_calibration_intrinsics_t,
  pub resolution_width:  c_int,
  pub resolution_height: c_int,
  pub metric_radius:     f32,
}

/// Binding to `k4a_calibration_t`
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_calibration_t {
  pub depth_camera_calibration: k4a_calibration_camera_t,
  pub color_camera_calibration: k4a_calibration_camera_t,
  pub extrinsics:               [[k4a_calibration_extrinsics_t;
                                  K4A_CALIBRATION_TYPE_NUM];
                                 K4A_CALIBRATION_TYPE_NUM],
  pub depth_mode:               k4a_depth_mode_t,
  pub color_resolution:         k4a_color_resolution_t,
}

/// Binding to `k4a_imu_sample_t`. `k4a_float3_t` is a union of `{x, y, z}`
/// and `float v[3]`, both of which have the layout of `[f32; 3]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct k4a_imu_sample_t {
  pub temperature:         f32,
  pub acc_sample:          [f32; 3],
  pub acc_timestamp_usec:  u64,
  pub gyro_sample:         [f32; 3],
  pub gyro_timestamp_usec: u64,
}
// ------------------------------------------------------------------------- //


#[cfg(feature = "native")]
#[allow(dead_code)]
#[doc(hidden)]
extern "C" {
  // DEVICE FUNCTIONS (k4a) ------------------------------------------------ //
  //
  /// Get the number of connected devices
  pub fn k4a_device_get_installed_count() -> u32;

  /// Open a device
  ///
  /// # Arguments
  /// - `index`: zero based index of the device
  /// - `device_handle`: out pointer receiving the device handle
  ///
  /// # Returns
  /// - `K4A_RESULT_SUCCEEDED` if the device was opened
  pub fn k4a_device_open(index: u32,
                         device_handle: *mut k4a_device_t)
                         -> k4a_result_t;

  /// Close a device. Closing a device which has running cameras stops them.
  pub fn k4a_device_close(device_handle: k4a_device_t);

  /// Start the color and depth cameras
  ///
  /// # Arguments
  /// - `device_handle`: handle returned by `k4a_device_open`
  /// - `config`: pointer to the camera configuration
  pub fn k4a_device_start_cameras(device_handle: k4a_device_t,
                                  config: *const k4a_device_configuration_t)
                                  -> k4a_result_t;

  /// Stop the color and depth cameras
  pub fn k4a_device_stop_cameras(device_handle: k4a_device_t);

  /// Read a capture from a running device
  ///
  /// # Arguments
  /// - `device_handle`: handle returned by `k4a_device_open`
  /// - `capture_handle`: out pointer receiving the capture handle
  /// - `timeout_in_ms`: `0` polls, `-1` blocks indefinitely
  ///
  /// # Returns
  /// - `K4A_WAIT_RESULT_SUCCEEDED` if a capture was read
  /// - `K4A_WAIT_RESULT_TIMEOUT` if no capture arrived in time
  /// - `K4A_WAIT_RESULT_FAILED` otherwise
  pub fn k4a_device_get_capture(device_handle: k4a_device_t,
                                capture_handle: *mut k4a_capture_t,
                                timeout_in_ms: i32)
                                -> k4a_wait_result_t;
  // ----------------------------------------------------------------------- //

  // CAPTURE FUNCTIONS (k4a) ----------------------------------------------- //
  //
  /// Add a reference to a capture
  pub fn k4a_capture_reference(capture_handle: k4a_capture_t);

  /// Release a reference to a capture; the last release frees it
  pub fn k4a_capture_release(capture_handle: k4a_capture_t);

  /// Get the device temperature at the time of the capture, `NaN` if unknown
  pub fn k4a_capture_get_temperature_c(capture_handle: k4a_capture_t)
                                       -> c_float;
  // ----------------------------------------------------------------------- //

  // PLAYBACK FUNCTIONS (k4arecord) ---------------------------------------- //
  //
  /// Open a recording for playback
  ///
  /// # Arguments
  /// - `path`: file system path of the recording as a C string
  /// - `playback_handle`: out pointer receiving the playback handle
  pub fn k4a_playback_open(path: *const c_char,
                           playback_handle: *mut k4a_playback_t)
                           -> k4a_result_t;

  /// Get the camera calibration stored in the recording
  pub fn k4a_playback_get_calibration(playback_handle: k4a_playback_t,
                                      calibration: *mut k4a_calibration_t)
                                      -> k4a_result_t;

  /// Get the track layout of the recording
  pub fn k4a_playback_get_record_configuration(
    playback_handle: k4a_playback_t,
    config: *mut k4a_record_configuration_t)
    -> k4a_result_t;

  /// Read a tag value
  ///
  /// # Arguments
  /// - `name`: tag name as a C string
  /// - `value`: buffer receiving the value, may be `NULL` to query the size
  /// - `value_size`: in: size of `value`, out: size required (incl. `\0`)
  ///
  /// # Returns
  /// - `K4A_BUFFER_RESULT_SUCCEEDED` if the value was written
  /// - `K4A_BUFFER_RESULT_TOO_SMALL` if `value` is too small (or `NULL`)
  /// - `K4A_BUFFER_RESULT_FAILED` if the tag does not exist
  pub fn k4a_playback_get_tag(playback_handle: k4a_playback_t,
                              name: *const c_char,
                              value: *mut c_char,
                              value_size: *mut usize)
                              -> k4a_buffer_result_t;

  /// Convert color frames to the given format on read
  pub fn k4a_playback_set_color_conversion(playback_handle: k4a_playback_t,
                                           target_format: k4a_image_format_t)
                                           -> k4a_result_t;

  /// Read the next capture and advance the read position
  pub fn k4a_playback_get_next_capture(playback_handle: k4a_playback_t,
                                       capture_handle: *mut k4a_capture_t)
                                       -> k4a_stream_result_t;

  /// Read the previous capture and move the read position back
  pub fn k4a_playback_get_previous_capture(playback_handle: k4a_playback_t,
                                           capture_handle: *mut k4a_capture_t)
                                           -> k4a_stream_result_t;

  /// Read the next IMU sample and advance the read position
  pub fn k4a_playback_get_next_imu_sample(playback_handle: k4a_playback_t,
                                          imu_sample: *mut k4a_imu_sample_t)
                                          -> k4a_stream_result_t;

  /// Read the previous IMU sample and move the read position back
  pub fn k4a_playback_get_previous_imu_sample(
    playback_handle: k4a_playback_t,
    imu_sample: *mut k4a_imu_sample_t)
    -> k4a_stream_result_t;

  /// Seek to a timestamp relative to `origin`
  pub fn k4a_playback_seek_timestamp(playback_handle: k4a_playback_t,
                                     offset_usec: i64,
                                     origin: k4a_playback_seek_origin_t)
                                     -> k4a_result_t;

  /// Length of the recording in microseconds
  pub fn k4a_playback_get_recording_length_usec(
    playback_handle: k4a_playback_t)
    -> u64;

  /// Timestamp of the last capture or IMU sample in microseconds
  pub fn k4a_playback_get_last_timestamp_usec(playback_handle: k4a_playback_t)
                                              -> u64;

  /// Close the recording
  pub fn k4a_playback_close(playback_handle: k4a_playback_t);
  // ----------------------------------------------------------------------- //

  // RECORD FUNCTIONS (k4arecord) ------------------------------------------ //
  //
  /// Create a recording file bound to a device
  ///
  /// # Arguments
  /// - `path`: file system path of the new recording as a C string
  /// - `device`: device the recording is made with (may be `NULL`)
  /// - `device_config`: the configuration the cameras were started with
  /// - `recording_handle`: out pointer receiving the recording handle
  pub fn k4a_record_create(path: *const c_char,
                           device: k4a_device_t,
                           device_config: k4a_device_configuration_t,
                           recording_handle: *mut k4a_record_t)
                           -> k4a_result_t;

  /// Add a tag to the recording; must happen before the header is written
  pub fn k4a_record_add_tag(recording_handle: k4a_record_t,
                            name: *const c_char,
                            value: *const c_char)
                            -> k4a_result_t;

  /// Add the IMU track; must happen before the header is written
  pub fn k4a_record_add_imu_track(recording_handle: k4a_record_t)
                                  -> k4a_result_t;

  /// Write the recording header
  pub fn k4a_record_write_header(recording_handle: k4a_record_t)
                                 -> k4a_result_t;

  /// Write a capture to the recording
  pub fn k4a_record_write_capture(recording_handle: k4a_record_t,
                                  capture_handle: k4a_capture_t)
                                  -> k4a_result_t;

  /// Write an IMU sample to the recording
  pub fn k4a_record_write_imu_sample(recording_handle: k4a_record_t,
                                     imu_sample: k4a_imu_sample_t)
                                     -> k4a_result_t;

  /// Flush all pending data to disk
  pub fn k4a_record_flush(recording_handle: k4a_record_t) -> k4a_result_t;

  /// Close the recording; pending data is flushed on a best effort basis
  pub fn k4a_record_close(recording_handle: k4a_record_t);
  // ----------------------------------------------------------------------- //
}
