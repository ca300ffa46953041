//! Pupil tracker application: webcam face, eye and pupil detection.

use anyhow::Result;
use clap::Parser;
use log::info;
use pupil_tracker::{app::TrackerApp, cli::Args};

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Pupil Tracker");

    let config = args.load_config()?;

    let app = TrackerApp::new(config)?;
    let summary = app.run()?;

    info!(
        "Processed {} frame(s), {} dropped, {} failed",
        summary.frames, summary.dropped_frames, summary.failed_frames
    );

    Ok(())
}
