//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and records the build time as the
//! initial wall-clock reference of the firmware.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    // Host builds of the library need neither the linker script nor the clock seed
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Seed the clock with the local wall time of the build
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const BUILD_LOCAL_EPOCH: i64 = {:?};",
            chrono::offset::Local::now().naive_local().and_utc().timestamp()
        ))
        .unwrap();

    println!("cargo:rerun-if-changed=memory.x");
}
