// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{bindings as k4a,
            types::{CalibrationModelType, ColorResolution, DepthMode},
            K4aError};
use getset::{CopyGetters, Getters};
use serde::Serialize;


/// Index into `Calibration::extrinsics`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Sensor {
  Depth = 0,
  Color = 1,
  Gyro = 2,
  Accel = 3,
}


/// Rotation and translation from one sensor's coordinate system to another.
#[derive(Clone, Copy, Debug, Default, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct Extrinsics {
  /// row major 3x3 rotation matrix
  rotation:    [f32; 9],
  /// translation in millimeters
  translation: [f32; 3],
}

impl From<&k4a::k4a_calibration_extrinsics_t> for Extrinsics {
  fn from(native: &k4a::k4a_calibration_extrinsics_t) -> Self {
    Self { rotation:    native.rotation,
           translation: native.translation, }
  }
}


/// Lens model of a camera. Which of the 15 parameters are used depends on the
/// model type; their order is cx, cy, fx, fy, k1 - k6, codx, cody, p2, p1,
/// metric radius.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct Intrinsics {
  model_type:      CalibrationModelType,
  parameter_count: u32,
  parameters:      [f32; 15],
}

impl Intrinsics {
  /// Principal point `(cx, cy)` in pixels.
  pub fn principal_point(&self) -> (f32, f32) {
    (self.parameters[0], self.parameters[1])
  }

  /// Focal length `(fx, fy)` in pixels.
  pub fn focal_length(&self) -> (f32, f32) {
    (self.parameters[2], self.parameters[3])
  }
}


/// Calibration of a single camera.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Getters, Serialize)]
pub struct CameraCalibration {
  #[getset(get = "pub")]
  extrinsics:        Extrinsics,
  #[getset(get = "pub")]
  intrinsics:        Intrinsics,
  #[getset(get_copy = "pub")]
  resolution_width:  i32,
  #[getset(get_copy = "pub")]
  resolution_height: i32,
  /// max field of view radius the calibration is valid for
  #[getset(get_copy = "pub")]
  metric_radius:     f32,
}

impl CameraCalibration {
  fn from_native(native: &k4a::k4a_calibration_camera_t)
                 -> Result<Self, K4aError> {
    Ok(Self {
      extrinsics:        Extrinsics::from(&native.extrinsics),
      intrinsics:        Intrinsics {
        model_type:      CalibrationModelType::from_raw(
          native.intrinsics.type_,
        )?,
        parameter_count: native.intrinsics.parameter_count,
        parameters:      native.intrinsics.parameters,
      },
      resolution_width:  native.resolution_width,
      resolution_height: native.resolution_height,
      metric_radius:     native.metric_radius,
    })
  }
}


/// Intrinsic and extrinsic calibration of the device a recording was made
/// with. Fixed for the whole recording.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize)]
pub struct Calibration {
  #[getset(get = "pub")]
  depth_camera:     CameraCalibration,
  #[getset(get = "pub")]
  color_camera:     CameraCalibration,
  extrinsics:       [[Extrinsics; k4a::K4A_CALIBRATION_TYPE_NUM];
                     k4a::K4A_CALIBRATION_TYPE_NUM],
  #[getset(get_copy = "pub")]
  depth_mode:       DepthMode,
  #[getset(get_copy = "pub")]
  color_resolution: ColorResolution,
}

impl Calibration {
  pub(crate) fn from_native(native: &k4a::k4a_calibration_t)
                            -> Result<Self, K4aError> {
    let mut extrinsics = [[Extrinsics::default();
                           k4a::K4A_CALIBRATION_TYPE_NUM];
                          k4a::K4A_CALIBRATION_TYPE_NUM];
    for (row, native_row) in extrinsics.iter_mut().zip(native.extrinsics.iter())
    {
      for (cell, native_cell) in row.iter_mut().zip(native_row.iter()) {
        *cell = Extrinsics::from(native_cell);
      }
    }

    let depth_camera =
      CameraCalibration::from_native(&native.depth_camera_calibration)?;
    let color_camera =
      CameraCalibration::from_native(&native.color_camera_calibration)?;

    let depth_mode = DepthMode::from_raw(native.depth_mode)?;
    let color_resolution = ColorResolution::from_raw(native.color_resolution)?;

    Ok(Self { depth_camera,
              color_camera,
              extrinsics,
              depth_mode,
              color_resolution })
  }

  /// Transformation from the coordinate system of sensor `from` to that of
  /// sensor `to`.
  pub fn extrinsics(&self, from: Sensor, to: Sensor) -> &Extrinsics {
    &self.extrinsics[from as usize][to as usize]
  }
}
