//! Command line arguments and how they override the configuration file.

use crate::{config::Config, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Realtime face, eye and pupil tracking", long_about = None)]
pub struct Args {
    /// Camera index to use
    #[arg(long)]
    pub cam: Option<i32>,

    /// Video file to process instead of a camera
    #[arg(short, long)]
    pub video: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Frontal face Haar cascade
    #[arg(long)]
    pub face_cascade: Option<PathBuf>,

    /// Right eye Haar cascade
    #[arg(long)]
    pub eye_cascade: Option<PathBuf>,

    /// Do not open the per-eye debug windows
    #[arg(long)]
    pub no_eye_windows: bool,

    /// Draw overlays on the grayscale frame
    #[arg(long)]
    pub gray: bool,

    /// Run without any windows
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Load the configuration file, if any, then apply command line overrides
    ///
    /// An unreadable configuration file falls back to defaults with a warning.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Config::from_file(path).unwrap_or_else(|e| {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                })
            }
            None => Config::default(),
        };

        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite configuration values given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(index) = self.cam {
            config.camera.index = index;
        }
        if let Some(video) = &self.video {
            config.camera.video_file = Some(video.clone());
        }
        if let Some(path) = &self.face_cascade {
            config.models.face_cascade = path.clone();
        }
        if let Some(path) = &self.eye_cascade {
            config.models.eye_cascade = path.clone();
        }
        if self.no_eye_windows {
            config.display.eye_windows = 0;
        }
        if self.gray {
            config.display.grayscale_canvas = true;
        }
        if self.headless {
            config.display.enabled = false;
        }
        if self.max_frames.is_some() {
            config.display.max_frames = self.max_frames;
        }
    }
}
