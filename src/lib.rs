// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

//! Safe wrappers around the Azure Kinect SDK for reading and writing
//! recordings.
//!
//! All native calls go through the `Sdk` trait. With the `native` feature
//! enabled, `native_sdk()` hands out the implementation backed by the
//! installed `k4a` and `k4arecord` libraries.

#[doc(hidden)]
pub mod bindings;
mod calibration;
mod capture;
mod configuration;
mod device;
mod error;
#[cfg(test)]
mod fake;
mod imu;
#[cfg(feature = "native")]
mod native;
mod playback;
mod record;
pub mod sdk;
mod types;
mod util;

pub use calibration::{Calibration, CameraCalibration, Extrinsics, Intrinsics,
                      Sensor};
pub use capture::Capture;
pub use configuration::{DeviceConfiguration, RecordConfiguration};
pub use device::Device;
pub use error::{K4aError, Result};
pub use imu::ImuSample;
#[cfg(feature = "native")]
pub use native::{native_sdk, NativeSdk};
pub use playback::{Captures, ImuSamples, Playback};
pub use record::{Record, RecordOptions};
pub use sdk::{RawHandle, Sdk};
pub use types::{CalibrationModelType, ColorResolution, DepthMode, Fps,
                ImageFormat, SeekOrigin, WiredSyncMode};
