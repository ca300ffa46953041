//! Real-time pupil tracking library built on `OpenCV`.
//!
//! Each frame is narrowed down in three stages:
//! 1. Haar cascade face detection on the grayscale frame
//! 2. Haar cascade eye detection inside each face crop
//! 3. Adaptive thresholding of each eye crop followed by blob detection,
//!    whose blobs are the pupil candidates
//!
//! Every result remembers which crop it was found in, so the annotator can
//! draw faces, eyes and pupils back onto the full frame.
//!
//! # Cascade files
//!
//! The face and eye stages need OpenCV's stock Haar cascades
//! `haarcascade_frontalface_default.xml` and `haarcascade_right_eye.xml`.
//! They are not bundled. By default they are read from `assets/`; copy them
//! there from the `haarcascades` directory of an OpenCV install (for example
//! `/usr/share/opencv4/haarcascades` on Debian/Ubuntu, or `data/haarcascades`
//! in the OpenCV source tree), or point `models.face_cascade` /
//! `models.eye_cascade` (`--face-cascade` / `--eye-cascade`) at them.
//!
//! # Examples
//!
//! ## Single Image
//!
//! ```no_run
//! use pupil_tracker::{config::Config, pipeline::{Detectors, Pipeline}, annotate::annotate_frame};
//! use opencv::{imgcodecs, prelude::*};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut pipeline = Pipeline::new(Detectors::from_config(&config)?);
//!
//! let mut image = imgcodecs::imread("face.jpg", imgcodecs::IMREAD_COLOR)?;
//! let analysis = pipeline.process(&image)?;
//!
//! for face in &analysis.faces {
//!     for eye in &face.eyes {
//!         for pupil in &eye.pupils {
//!             let center = pupil.to_frame().center();
//!             println!("Pupil at ({}, {})", center.x, center.y);
//!         }
//!     }
//! }
//!
//! annotate_frame(&mut image, &analysis)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Webcam Loop
//!
//! ```no_run
//! use pupil_tracker::{app::TrackerApp, config::Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.camera.index = 0;
//!
//! // Runs until 'q' is pressed; the camera and windows are released on return
//! let summary = TrackerApp::new(config)?.run()?;
//! println!("{} frames, {} pupils", summary.frames, summary.pupils);
//! # Ok(())
//! # }
//! ```

/// Frame annotation: boxes, labels and pupil circles
pub mod annotate;

/// Main application module
pub mod app;

/// Pupil candidates from binarized eye crops
pub mod blob;

/// Camera and video file frame sources
pub mod capture;

/// Haar cascade region detection
pub mod cascade;

/// Command line arguments
pub mod cli;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Window management and keyboard input
pub mod display;

/// Error types and result handling
pub mod error;

/// Regions, pupil candidates and crop offsets
pub mod geometry;

/// Face, eye and pupil narrowing for one frame
pub mod pipeline;

/// Grayscale conversion, cropping and eye binarization
pub mod preprocess;

pub use error::{Error, Result};
