//! Configuration management for the pupil tracker

use crate::constants::{
    DEFAULT_BLOB_MAX_AREA, DEFAULT_BLOB_MAX_THRESHOLD, DEFAULT_BLOB_MIN_AREA, DEFAULT_BLOB_MIN_CIRCULARITY,
    DEFAULT_BLOB_MIN_CONVEXITY, DEFAULT_BLOB_MIN_INERTIA_RATIO, DEFAULT_BLOB_MIN_THRESHOLD,
    DEFAULT_BLOB_THRESHOLD_STEP, DEFAULT_CAMERA_INDEX, DEFAULT_EYE_MIN_NEIGHBORS, DEFAULT_FACE_MIN_NEIGHBORS,
    DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_SCALE_FACTOR, DEFAULT_THRESHOLD_BLOCK_SIZE,
    DEFAULT_THRESHOLD_MAX_VALUE, DEFAULT_THRESHOLD_OFFSET,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cascade classifier files
    pub models: ModelConfig,

    /// Face cascade parameters
    pub face_detection: CascadeConfig,

    /// Eye cascade parameters, applied to each face crop
    pub eye_detection: CascadeConfig,

    /// Adaptive threshold applied to each eye crop
    pub threshold: ThresholdConfig,

    /// Pupil blob filters
    pub blob: BlobConfig,

    /// Frame source settings
    pub camera: CameraConfig,

    /// Window settings
    pub display: DisplayConfig,
}

/// Cascade classifier file paths
///
/// The XML files ship with OpenCV (`haarcascades` data directory), not with
/// this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Frontal face Haar cascade
    pub face_cascade: PathBuf,

    /// Right eye Haar cascade
    pub eye_cascade: PathBuf,
}

/// Multi-scale sliding window parameters
///
/// Face and eye stages have different defaults, so a section given in a file
/// must list every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Ratio between successive scan scales, must be > 1
    pub scale_factor: f64,

    /// Overlapping votes a candidate needs to be kept
    pub min_neighbors: i32,

    /// Smallest window side in pixels, 0 for no limit
    pub min_size: i32,
}

/// Gaussian adaptive threshold parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Odd neighbourhood side length
    pub block_size: i32,

    /// Subtracted from the weighted local mean
    pub offset: f64,

    /// Output value for pixels above threshold
    pub max_value: f64,
}

/// Blob detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub min_threshold: f32,
    pub max_threshold: f32,
    pub threshold_step: f32,
    pub min_area: f32,
    pub max_area: f32,
    pub min_circularity: f32,
    pub min_convexity: f32,
    pub min_inertia_ratio: f32,
}

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device index
    pub index: i32,

    /// Read a video file instead of the camera
    pub video_file: Option<PathBuf>,

    /// Dropped frames in a row before giving up
    pub max_consecutive_failures: u32,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show windows at all
    pub enabled: bool,

    /// Number of per-eye debug window pairs, 0 to disable
    pub eye_windows: usize,

    /// Annotate the grayscale frame instead of the color frame
    pub grayscale_canvas: bool,

    /// Draw the frame rate in the corner
    pub show_fps: bool,

    /// Milliseconds to wait for a key each frame
    pub key_delay_ms: i32,

    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            face_detection: CascadeConfig::face(),
            eye_detection: CascadeConfig::eye(),
            threshold: ThresholdConfig::default(),
            blob: BlobConfig::default(),
            camera: CameraConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_cascade: PathBuf::from("assets/haarcascade_frontalface_default.xml"),
            eye_cascade: PathBuf::from("assets/haarcascade_right_eye.xml"),
        }
    }
}

impl CascadeConfig {
    /// Parameters for whole-frame face search
    pub fn face() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_FACE_MIN_NEIGHBORS,
            min_size: 0,
        }
    }

    /// Parameters for eye search inside a face crop
    pub fn eye() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_EYE_MIN_NEIGHBORS,
            min_size: 0,
        }
    }

    fn validate(&self, stage: &str) -> Result<()> {
        if !(self.scale_factor > 1.0) {
            return Err(Error::ConfigError(format!("{stage} scale factor must be greater than 1.0")));
        }
        if self.min_neighbors < 0 {
            return Err(Error::ConfigError(format!("{stage} min neighbors must not be negative")));
        }
        if self.min_size < 0 {
            return Err(Error::ConfigError(format!("{stage} min size must not be negative")));
        }
        Ok(())
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_THRESHOLD_BLOCK_SIZE,
            offset: DEFAULT_THRESHOLD_OFFSET,
            max_value: DEFAULT_THRESHOLD_MAX_VALUE,
        }
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            min_threshold: DEFAULT_BLOB_MIN_THRESHOLD,
            max_threshold: DEFAULT_BLOB_MAX_THRESHOLD,
            threshold_step: DEFAULT_BLOB_THRESHOLD_STEP,
            min_area: DEFAULT_BLOB_MIN_AREA,
            max_area: DEFAULT_BLOB_MAX_AREA,
            min_circularity: DEFAULT_BLOB_MIN_CIRCULARITY,
            min_convexity: DEFAULT_BLOB_MIN_CONVEXITY,
            min_inertia_ratio: DEFAULT_BLOB_MIN_INERTIA_RATIO,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_CAMERA_INDEX,
            video_file: None,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eye_windows: 2,
            grayscale_canvas: false,
            show_fps: true,
            key_delay_ms: 1,
            max_frames: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// Sections missing from the file keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate parameter ranges.
    ///
    /// Cascade file existence is checked when the classifiers are loaded.
    pub fn validate(&self) -> Result<()> {
        self.face_detection.validate("Face")?;
        self.eye_detection.validate("Eye")?;

        let threshold = &self.threshold;
        if threshold.block_size < 3 || threshold.block_size % 2 == 0 {
            return Err(Error::ConfigError(
                "Threshold block size must be odd and at least 3".to_string(),
            ));
        }
        if !(threshold.max_value > 0.0 && threshold.max_value <= 255.0) {
            return Err(Error::ConfigError(
                "Threshold max value must be in (0, 255]".to_string(),
            ));
        }

        let blob = &self.blob;
        if blob.threshold_step <= 0.0 {
            return Err(Error::ConfigError("Blob threshold step must be positive".to_string()));
        }
        if blob.min_threshold >= blob.max_threshold {
            return Err(Error::ConfigError(
                "Blob min threshold must be below max threshold".to_string(),
            ));
        }
        if blob.min_area < 0.0 || blob.min_area > blob.max_area {
            return Err(Error::ConfigError(
                "Blob min area must be between 0 and max area".to_string(),
            ));
        }
        for (name, value) in [
            ("circularity", blob.min_circularity),
            ("convexity", blob.min_convexity),
            ("inertia ratio", blob.min_inertia_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!("Blob min {name} must be between 0.0 and 1.0")));
            }
        }

        if self.camera.index < 0 {
            return Err(Error::ConfigError("Camera index must not be negative".to_string()));
        }
        if self.camera.max_consecutive_failures == 0 {
            return Err(Error::ConfigError(
                "Max consecutive failures must be greater than 0".to_string(),
            ));
        }
        if self.display.key_delay_ms < 1 {
            return Err(Error::ConfigError("Key delay must be at least 1 ms".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pupil Tracker Configuration

models:
  face_cascade: "assets/haarcascade_frontalface_default.xml"
  eye_cascade: "assets/haarcascade_right_eye.xml"

face_detection:
  scale_factor: 1.3
  min_neighbors: 5
  min_size: 0

eye_detection:
  scale_factor: 1.3
  min_neighbors: 12
  min_size: 0

# Gaussian adaptive threshold on each eye crop
threshold:
  block_size: 99
  offset: 8.0
  max_value: 100.0

# Pupil blob filters
blob:
  min_threshold: 5.0
  max_threshold: 220.0
  threshold_step: 10.0
  min_area: 100.0
  max_area: 5000.0
  min_circularity: 0.3
  min_convexity: 0.5
  min_inertia_ratio: 0.3

camera:
  index: 0
  max_consecutive_failures: 30

display:
  enabled: true
  eye_windows: 2
  grayscale_canvas: false
  show_fps: true
  key_delay_ms: 1
"#;
