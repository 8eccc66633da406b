// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::K4aError;
use chrono::Duration;
use std::{convert::TryFrom,
          ffi::{CStr, CString},
          path::Path};


/// Convenience function to convert directly from a Rust `&str` to a
/// `std::ffi::CString`, i.e. a lifetime safe object capable of providing a raw
/// C string (`*const c_char` in Rust, `const char *` in C).
pub fn strref_to_cstring(strref: &str) -> Result<CString, K4aError> {
  CString::new(strref).map_err(|err| {
    K4aError::InvalidValue(format!("'{}': {}", strref, err))
  })
}

/// Converts a Rust `std::path::Path` to a `std::ffi::CString` object. Unlike
/// `canonicalize`-ing first, this also works for recordings which don't exist
/// yet.
pub fn path_to_cstring(path: &Path) -> Result<CString, K4aError> {
  let strref = path.to_str().ok_or_else(|| {
    K4aError::InvalidValue(format!("path '{}' is not valid unicode",
                                   path.display()))
  })?;
  strref_to_cstring(strref)
}

/// Converts a buffer filled in by the SDK - a C string including its `\0`,
/// possibly followed by garbage - into a Rust `String`.
pub fn buffer_to_string(buffer: &[u8]) -> Result<String, K4aError> {
  let cstr = CStr::from_bytes_until_nul(buffer).map_err(|err| {
    K4aError::InvalidValue(format!("SDK string: {}", err))
  })?;
  cstr.to_str()
      .map(str::to_owned)
      .map_err(|err| K4aError::InvalidValue(format!("SDK string: {}", err)))
}

/// Device timestamps and recording lengths come out of the SDK as unsigned
/// microseconds; anything beyond `i64::MAX` saturates.
pub fn usec_to_duration(usec: u64) -> Duration {
  Duration::microseconds(i64::try_from(usec).unwrap_or(i64::MAX))
}

/// The SDK takes seek offsets as signed microseconds.
pub fn duration_to_usec(duration: Duration) -> Result<i64, K4aError> {
  duration.num_microseconds().ok_or_else(|| {
    K4aError::InvalidValue(format!("duration out of range ({})", duration))
  })
}
