// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{bindings as k4a,
            types::{ColorResolution, DepthMode, Fps, ImageFormat, WiredSyncMode},
            K4aError};
use chrono::Duration;
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;


/// Track layout of a recording, as stored in the file.
///
/// Only the crate creates these (from the file's native descriptor when a
/// `Playback` is opened); callers get read access via the getters.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct RecordConfiguration {
  color_format:                 ImageFormat,
  color_resolution:             ColorResolution,
  depth_mode:                   DepthMode,
  camera_fps:                   Fps,
  color_track_enabled:          bool,
  depth_track_enabled:          bool,
  ir_track_enabled:             bool,
  imu_track_enabled:            bool,
  #[serde(with = "usec")]
  depth_delay_off_color:        Duration,
  wired_sync_mode:              WiredSyncMode,
  #[serde(with = "usec")]
  subordinate_delay_off_master: Duration,
  #[serde(with = "usec")]
  start_timestamp_offset:       Duration,
}

impl Default for RecordConfiguration {
  fn default() -> Self {
    Self { color_format:                 ImageFormat::ColorMjpg,
           color_resolution:             ColorResolution::Off,
           depth_mode:                   DepthMode::Off,
           camera_fps:                   Fps::Fps30,
           color_track_enabled:          false,
           depth_track_enabled:          false,
           ir_track_enabled:             false,
           imu_track_enabled:            false,
           depth_delay_off_color:        Duration::zero(),
           wired_sync_mode:              WiredSyncMode::Standalone,
           subordinate_delay_off_master: Duration::zero(),
           start_timestamp_offset:       Duration::zero(), }
  }
}

impl RecordConfiguration {
  pub(crate) fn from_native(native: &k4a::k4a_record_configuration_t)
                            -> Result<Self, K4aError> {
    Ok(Self {
      color_format:                 ImageFormat::from_raw(native.color_format)?,
      color_resolution:             ColorResolution::from_raw(
        native.color_resolution,
      )?,
      depth_mode:                   DepthMode::from_raw(native.depth_mode)?,
      camera_fps:                   Fps::from_raw(native.camera_fps)?,
      color_track_enabled:          native.color_track_enabled,
      depth_track_enabled:          native.depth_track_enabled,
      ir_track_enabled:             native.ir_track_enabled,
      imu_track_enabled:            native.imu_track_enabled,
      depth_delay_off_color:        Duration::microseconds(
        native.depth_delay_off_color_usec as i64,
      ),
      wired_sync_mode:              WiredSyncMode::from_raw(
        native.wired_sync_mode,
      )?,
      subordinate_delay_off_master: Duration::microseconds(
        native.subordinate_delay_off_master_usec as i64,
      ),
      start_timestamp_offset:       Duration::microseconds(
        native.start_timestamp_offset_usec as i64,
      ),
    })
  }
}


/// Camera settings a device is started with, and which a recording made with
/// that device is bound to. `Default` matches the SDK's defaults (everything
/// off, 30 fps, standalone).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DeviceConfiguration {
  pub color_format:                 ImageFormat,
  pub color_resolution:             ColorResolution,
  pub depth_mode:                   DepthMode,
  pub camera_fps:                   Fps,
  /// only deliver captures which contain both color and depth images
  pub synchronized_images_only:     bool,
  /// may be negative, i.e. depth before color
  #[serde(with = "usec")]
  pub depth_delay_off_color:        Duration,
  pub wired_sync_mode:              WiredSyncMode,
  #[serde(with = "usec")]
  pub subordinate_delay_off_master: Duration,
  pub disable_streaming_indicator:  bool,
}

impl Default for DeviceConfiguration {
  fn default() -> Self {
    Self { color_format:                 ImageFormat::ColorMjpg,
           color_resolution:             ColorResolution::Off,
           depth_mode:                   DepthMode::Off,
           camera_fps:                   Fps::Fps30,
           synchronized_images_only:     false,
           depth_delay_off_color:        Duration::zero(),
           wired_sync_mode:              WiredSyncMode::Standalone,
           subordinate_delay_off_master: Duration::zero(),
           disable_streaming_indicator:  false, }
  }
}

impl DeviceConfiguration {
  /// Translates to the SDK's struct. Fails if a delay doesn't fit the SDK's
  /// microsecond fields (`i32` for the color delay, `u32` for the
  /// subordinate delay).
  pub fn to_native(&self) -> Result<k4a::k4a_device_configuration_t, K4aError> {
    let depth_delay_off_color_usec = self.depth_delay_off_color
                                         .num_microseconds()
                                         .and_then(|usec| i32::try_from(usec).ok())
                                         .ok_or_else(|| {
                                           out_of_range("depth delay off color",
                                                        self.depth_delay_off_color)
                                         })?;
    let subordinate_delay_off_master_usec =
      self.subordinate_delay_off_master
          .num_microseconds()
          .and_then(|usec| u32::try_from(usec).ok())
          .ok_or_else(|| {
            out_of_range("subordinate delay off master",
                         self.subordinate_delay_off_master)
          })?;

    Ok(k4a::k4a_device_configuration_t {
      color_format: self.color_format.as_raw(),
      color_resolution: self.color_resolution.as_raw(),
      depth_mode: self.depth_mode.as_raw(),
      camera_fps: self.camera_fps.as_raw(),
      synchronized_images_only: self.synchronized_images_only,
      depth_delay_off_color_usec,
      wired_sync_mode: self.wired_sync_mode.as_raw(),
      subordinate_delay_off_master_usec,
      disable_streaming_indicator: self.disable_streaming_indicator,
    })
  }
}

fn out_of_range(what: &str, duration: Duration) -> K4aError {
  K4aError::InvalidValue(format!("{} out of range ({})", what, duration))
}


/// (De)serializes a `chrono::Duration` as integer microseconds, the unit the
/// SDK uses for all delays and offsets.
mod usec {
  use chrono::Duration;
  use serde::{ser::Error, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(duration: &Duration,
                                  serializer: S)
                                  -> Result<S::Ok, S::Error> {
    match duration.num_microseconds() {
      Some(usec) => serializer.serialize_i64(usec),
      None => Err(S::Error::custom("duration out of range")),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D)
                                                -> Result<Duration, D::Error> {
    Ok(Duration::microseconds(i64::deserialize(deserializer)?))
  }
}
