// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{bindings as k4a, K4aError};
use serde::{Deserialize, Serialize};


/// This macro - internal use only - declares a Rust enum for one of the SDK's
/// C enums, with conversions in both directions. Converting from an unknown
/// raw value is an error, since it means the file or the SDK speaks a newer
/// dialect than we do.
macro_rules! native_enum {
  ($(#[$meta:meta])* $name:ident : $raw:ty {
    $($(#[$vmeta:meta])* $variant:ident = $code:literal),* $(,)?
  }) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
    pub enum $name {
      $($(#[$vmeta])* $variant),*
    }

    impl $name {
      pub fn from_raw(raw: $raw) -> Result<Self, K4aError> {
        match raw {
          $($code => Ok(Self::$variant),)*
          _ => Err(K4aError::InvalidValue(
            format!("{} is not a valid {}", raw, stringify!($name))
          )),
        }
      }

      pub fn as_raw(self) -> $raw {
        match self {
          $(Self::$variant => $code,)*
        }
      }
    }
  }
}


native_enum! {
  /// `k4a_image_format_t`
  ImageFormat: k4a::k4a_image_format_t {
    ColorMjpg = 0,
    ColorNv12 = 1,
    ColorYuy2 = 2,
    /// 8 bit per channel, interleaved blue, green, red, alpha
    ColorBgra32 = 3,
    Depth16 = 4,
    Ir16 = 5,
    Custom8 = 6,
    Custom16 = 7,
    Custom = 8,
  }
}

native_enum! {
  /// `k4a_color_resolution_t`
  ColorResolution: k4a::k4a_color_resolution_t {
    Off = 0,
    R720p = 1,
    R1080p = 2,
    R1440p = 3,
    R1536p = 4,
    R2160p = 5,
    R3072p = 6,
  }
}

native_enum! {
  /// `k4a_depth_mode_t`
  DepthMode: k4a::k4a_depth_mode_t {
    Off = 0,
    NfovBinned2x2 = 1,
    NfovUnbinned = 2,
    WfovBinned2x2 = 3,
    WfovUnbinned = 4,
    PassiveIr = 5,
  }
}

native_enum! {
  /// `k4a_fps_t`
  Fps: k4a::k4a_fps_t {
    Fps5 = 0,
    Fps15 = 1,
    Fps30 = 2,
  }
}

native_enum! {
  /// `k4a_wired_sync_mode_t`
  WiredSyncMode: k4a::k4a_wired_sync_mode_t {
    Standalone = 0,
    Master = 1,
    Subordinate = 2,
  }
}

native_enum! {
  /// `k4a_playback_seek_origin_t`
  SeekOrigin: k4a::k4a_playback_seek_origin_t {
    /// offset is relative to the start of the recording
    Begin = 0,
    /// offset is relative to the end of the recording (and negative)
    End = 1,
    /// offset is an absolute device timestamp
    DeviceTime = 2,
  }
}

native_enum! {
  /// `k4a_calibration_model_type_t`
  CalibrationModelType: k4a::k4a_calibration_model_type_t {
    Unknown = 0,
    Theta = 1,
    Polynomial3k = 2,
    Rational6kt = 3,
    BrownConrady = 4,
  }
}

impl ColorResolution {
  /// Width and height in pixels, `None` for `Off`.
  pub fn dimensions(self) -> Option<(u32, u32)> {
    match self {
      Self::Off => None,
      Self::R720p => Some((1280, 720)),
      Self::R1080p => Some((1920, 1080)),
      Self::R1440p => Some((2560, 1440)),
      Self::R1536p => Some((2048, 1536)),
      Self::R2160p => Some((3840, 2160)),
      Self::R3072p => Some((4096, 3072)),
    }
  }
}

impl Fps {
  pub fn frames_per_second(self) -> u32 {
    match self {
      Self::Fps5 => 5,
      Self::Fps15 => 15,
      Self::Fps30 => 30,
    }
  }
}
