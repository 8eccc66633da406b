// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::sdk::K4aResult;
use std::fmt;
use thiserror::Error;


/// k4arecord's result type. Errors are `eyre::Report`s; those raised by this
/// crate wrap a `K4aError`, which can be recovered with
/// `report.downcast_ref::<K4aError>()`.
pub type Result<T> = eyre::Result<T>;


/// Everything that can go wrong between the caller and the SDK.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum K4aError {
  /// The object is in the wrong lifecycle state for the call, e.g. reading
  /// from a playback which was never opened or opening one twice. Detected
  /// before the SDK is called.
  #[error("{0}")]
  InvalidState(&'static str),

  /// The SDK reported failure.
  #[error("{call} failed ({result})")]
  Native {
    call:   &'static str,
    result: String,
  },

  /// The SDK reported success but handed back no handle. This should never
  /// happen and means the native response can't be trusted.
  #[error("{call} did not return a valid handle")]
  InvalidHandle { call: &'static str },

  /// A value could not be converted across the FFI boundary.
  #[error("invalid value: {0}")]
  InvalidValue(String),
}

impl K4aError {
  /// Builds a `Native` error from any of the SDK's result enums.
  pub fn native<R: fmt::Debug>(call: &'static str, result: R) -> Self {
    Self::Native { call,
                   result: format!("{:?}", result) }
  }
}


/// Turns a `K4aResult` into `Ok(())` or a `K4aError::Native`, naming the SDK
/// function in the error.
pub(crate) fn check(call: &'static str, result: K4aResult) -> Result<()> {
  match result {
    K4aResult::Succeeded => Ok(()),
    K4aResult::Failed => Err(K4aError::native(call, result).into()),
  }
}
