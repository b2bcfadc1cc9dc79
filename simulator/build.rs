//! Build script for emm-simulator
//!
//! Sets up SDL2 library paths and copies SDL2.dll to the target directory.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    // Only run SDL2 setup on Windows
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping SDL2 setup");
        return;
    };
    let Some(workspace_dir) = manifest_dir.parent() else {
        return;
    };
    let vendor_sdl2 = workspace_dir.join("vendor").join("sdl2");

    if vendor_sdl2.exists() {
        println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

        // OUT_DIR is target/<profile>/build/emm-simulator-xxx/out
        if let Ok(out_dir) = env::var("OUT_DIR")
            && let Some(target_dir) = PathBuf::from(&out_dir)
                .ancestors()
                .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
        {
            let dll_src = vendor_sdl2.join("SDL2.dll");
            let dll_dst = target_dir.join("SDL2.dll");

            if dll_src.exists() && !dll_dst.exists() {
                if let Err(e) = fs::copy(&dll_src, &dll_dst) {
                    println!("cargo:warning=Failed to copy SDL2.dll: {e}");
                }
            }
        }
    } else {
        println!("cargo:warning=SDL2 vendor directory not found at {}", vendor_sdl2.display());
    }

    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());
}
