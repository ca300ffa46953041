//! Build script that probes for OpenCV and pkg-config and prints install hints when either is missing.

use std::env;
use std::process::Command;

/// pkg-config names OpenCV has been published under, newest first
const OPENCV_PACKAGES: [&str; 2] = ["opencv4", "opencv"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    match pkg_config(&["--version"]) {
        Some(version) => println!("cargo:warning=Found pkg-config version: {version}"),
        None => {
            println!("cargo:warning=pkg-config not found. This is required to find system libraries.");
            print_hints("pkg-config", "pkg-config", "pkgconf-pkg-config");
        }
    }

    let opencv = OPENCV_PACKAGES
        .iter()
        .find_map(|package| pkg_config(&["--modversion", package]));
    match opencv {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
            println!("cargo:warning=The objdetect, features2d, highgui and videoio modules are required.");
            print_hints("libopencv-dev", "opencv", "opencv-devel");
        }
    }

    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
    println!("cargo:rustc-env=BUILD_HOST={}", env::var("HOST").unwrap_or_default());
}

/// Trimmed stdout of a successful pkg-config invocation
fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn print_hints(apt: &str, brew: &str, dnf: &str) {
    println!("cargo:warning=On Ubuntu: sudo apt-get install {apt}");
    println!("cargo:warning=On macOS: brew install {brew}");
    println!("cargo:warning=On Fedora: sudo dnf install {dnf}");
}
