// Build script that tries to generate the C header with `cbindgen`.
// Without `cbindgen` the checked-in `include/theremin.h` is copied to
// $OUT_DIR instead, so consumers can always include it from either place.

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/theremin.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    let header_repo = crate_dir.join("include").join("theremin.h");
    let header_out = out_dir.join("theremin.h");

    let generated = Command::new("cbindgen")
        .args(["--crate", "theremin-ffi", "--lang", "C", "--output"])
        .arg(&header_out)
        .current_dir(&crate_dir)
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    if generated {
        println!("cargo:warning=theremin-ffi: generated header with cbindgen -> {}", header_out.display());
        return;
    }

    fs::copy(&header_repo, &header_out).expect("failed to copy include/theremin.h to OUT_DIR");
}
