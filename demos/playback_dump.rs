// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

//! Prints the layout, calibration summary and capture timeline of a
//! recording.
//!
//! ```text
//! RUST_LOG=k4arecord=debug cargo run --features native --example \
//!   playback_dump -- recording.mkv
//! ```

use eyre::{eyre, WrapErr};
use k4arecord::{native_sdk, Playback, Result};
use std::env;


fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt().with_env_filter(
    tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
  )
  .init();

  let path = env::args().nth(1)
                        .ok_or_else(|| eyre!("usage: playback_dump <recording>"))?;
  let playback = Playback::load(native_sdk(), &path).wrap_err_with(|| {
                   format!("unable to open recording '{}'", path)
                 })?;

  let configuration = playback.configuration()?;
  println!("recording:     {}", path);
  println!("length:        {}", playback.recording_length()?);
  println!("color:         {:?} @ {:?} ({:?})",
           configuration.color_resolution(),
           configuration.camera_fps(),
           configuration.color_format());
  println!("depth:         {:?}", configuration.depth_mode());
  println!("imu track:     {}", configuration.imu_track_enabled());
  if let Some(serial) = playback.tag("K4A_DEVICE_SERIAL_NUMBER")? {
    println!("serial number: {}", serial);
  }

  let calibration = playback.calibration()?;
  let (fx, fy) = calibration.depth_camera().intrinsics().focal_length();
  println!("depth focal:   {:.2} / {:.2}", fx, fy);

  let mut count = 0usize;
  for capture in playback.captures() {
    let capture = capture?;
    count += 1;
    println!("capture {:>6} @ {} (temperature {:?})",
             count,
             playback.last_timestamp()?,
             capture.temperature_c());
  }
  println!("{} captures", count);

  Ok(())
}
