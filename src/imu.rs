// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{bindings as k4a, util};
use chrono::Duration;
use getset::CopyGetters;
use serde::Serialize;


/// One reading of the inertial measurement unit.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct ImuSample {
  /// sensor temperature in degrees Celsius
  temperature:         f32,
  /// accelerometer x, y, z in meters per second squared
  acc_sample:          [f32; 3],
  /// device timestamp of the accelerometer reading in microseconds
  acc_timestamp_usec:  u64,
  /// gyroscope x, y, z in radians per second
  gyro_sample:         [f32; 3],
  /// device timestamp of the gyroscope reading in microseconds
  gyro_timestamp_usec: u64,
}

impl ImuSample {
  pub fn new(temperature: f32,
             acc_sample: [f32; 3],
             acc_timestamp_usec: u64,
             gyro_sample: [f32; 3],
             gyro_timestamp_usec: u64)
             -> Self {
    Self { temperature,
           acc_sample,
           acc_timestamp_usec,
           gyro_sample,
           gyro_timestamp_usec }
  }

  pub fn acc_timestamp(&self) -> Duration {
    util::usec_to_duration(self.acc_timestamp_usec)
  }

  pub fn gyro_timestamp(&self) -> Duration {
    util::usec_to_duration(self.gyro_timestamp_usec)
  }

  pub(crate) fn to_native(&self) -> k4a::k4a_imu_sample_t {
    k4a::k4a_imu_sample_t { temperature:         self.temperature,
                            acc_sample:          self.acc_sample,
                            acc_timestamp_usec:  self.acc_timestamp_usec,
                            gyro_sample:         self.gyro_sample,
                            gyro_timestamp_usec: self.gyro_timestamp_usec, }
  }
}

impl From<&k4a::k4a_imu_sample_t> for ImuSample {
  fn from(native: &k4a::k4a_imu_sample_t) -> Self {
    Self::new(native.temperature,
              native.acc_sample,
              native.acc_timestamp_usec,
              native.gyro_sample,
              native.gyro_timestamp_usec)
  }
}
