// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use std::{env, fs, path::Path};


fn main() {
  println!("cargo:rerun-if-env-changed=K4A_SDK_DIR");

  // without the `native` feature nothing calls into the SDK, so there is
  // nothing to link against. this keeps the test suite (which runs against a
  // scripted fake) buildable on machines without the SDK installed.
  if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
    return;
  }

  // if the SDK location is given explicitly, copy its shared libraries into
  // OUT_DIR. cargo only sets up the run time library path for link search
  // paths within OUT_DIR, so linking straight from the SDK dir would build
  // but fail to load.
  if let Ok(sdk_dir) = env::var("K4A_SDK_DIR") {
    #[rustfmt::skip]
    let out_dir = env::var(
      "OUT_DIR"
    ).expect("unable to read OUT_DIR env variable");

    let lib_src_path = format!("{}/lib", sdk_dir);
    let lib_dst_path = format!("{}/lib", out_dir);

    if !Path::new(&lib_dst_path).exists() {
      fs::create_dir(&lib_dst_path).expect("unable to create lib dir");
    }

    let files = fs::read_dir(&lib_src_path).expect("unable to read SDK lib dir");
    for file in files {
      let src_path = file.expect("could not read file").path();
      if !src_path.is_file() {
        continue;
      }
      let file_name = src_path.file_name()
                              .and_then(|name| name.to_str())
                              .expect("SDK library name is not valid unicode");
      let dst_path = format!("{}/{}", &lib_dst_path, file_name);

      fs::copy(&src_path, dst_path).expect("unable to copy libs to target dir");
    }

    println!(r"cargo:rustc-link-search=all={}/lib", out_dir);
  }

  // otherwise we rely on the system linker paths (the SDK's .deb packages
  // install to /usr/lib/x86_64-linux-gnu)
  println!(r"cargo:rustc-link-lib=dylib=k4a");
  println!(r"cargo:rustc-link-lib=dylib=k4arecord");
}
