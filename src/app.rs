//! Main application loop for the pupil tracker.

use crate::{
    annotate::{annotate_frame, colors, draw_fps, draw_pupil},
    capture::{CameraSource, Capture, FrameSource, VideoFileSource},
    config::Config,
    constants::{EYE_PLACEHOLDER_HEIGHT, EYE_PLACEHOLDER_WIDTH, MAIN_WINDOW, QUIT_KEY},
    display::{DisplaySurface, EyeWindows, HeadlessDisplay, HighGuiDisplay},
    error::{Error, Result},
    pipeline::{Detectors, FrameAnalysis, Pipeline},
    preprocess::{crop, to_grayscale},
};
use log::{info, warn};
use opencv::{
    core::{Mat, CV_8UC1},
    imgproc,
    prelude::*,
};
use std::time::Instant;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// The quit key was pressed
    #[default]
    QuitKey,
    /// The video file ran out of frames
    EndOfStream,
    /// The configured frame limit was reached
    FrameLimit,
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames read and displayed
    pub frames: u64,
    /// Reads that produced no frame
    pub dropped_frames: u64,
    /// Frames shown without annotations because processing failed
    pub failed_frames: u64,
    pub faces: u64,
    pub eyes: u64,
    pub pupils: u64,
    pub stop: StopReason,
}

impl RunSummary {
    fn record(&mut self, analysis: &FrameAnalysis) {
        self.faces += analysis.face_count() as u64;
        self.eyes += analysis.eye_count() as u64;
        self.pupils += analysis.pupil_count() as u64;
    }
}

/// Main application struct
pub struct TrackerApp {
    config: Config,
    pipeline: Pipeline,
    source: Box<dyn FrameSource>,
    display: Box<dyn DisplaySurface>,
}

impl TrackerApp {
    /// Load the detectors, then open the configured source and display
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, a cascade cannot be loaded or
    /// the frame source cannot be opened
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing pupil tracker");
        config.validate()?;

        let detectors = Detectors::from_config(&config)?;

        let source: Box<dyn FrameSource> = match &config.camera.video_file {
            Some(path) => Box::new(VideoFileSource::open(path)?),
            None => Box::new(CameraSource::open(config.camera.index)?),
        };

        let display: Box<dyn DisplaySurface> = if config.display.enabled {
            Box::new(HighGuiDisplay::new())
        } else {
            info!("Running headless");
            Box::new(HeadlessDisplay)
        };

        Ok(Self::from_parts(config, Pipeline::new(detectors), source, display))
    }

    /// Assemble an app from already constructed parts
    pub fn from_parts(
        config: Config,
        pipeline: Pipeline,
        source: Box<dyn FrameSource>,
        display: Box<dyn DisplaySurface>,
    ) -> Self {
        Self {
            config,
            pipeline,
            source,
            display,
        }
    }

    /// Run until the quit key, end of stream or frame limit.
    ///
    /// The frame source is released and all windows are closed exactly once
    /// when this returns, whichever way the loop ended.
    ///
    /// # Errors
    ///
    /// Returns `Camera` after too many consecutive dropped frames or failed
    /// reads, or any error raised by the display. Errors while processing a
    /// single frame are logged and do not stop the loop.
    pub fn run(self) -> Result<RunSummary> {
        let Self {
            config,
            mut pipeline,
            mut source,
            mut display,
        } = self;

        let eye_windows = (0..config.display.eye_windows).map(EyeWindows::for_slot).collect();
        let mut session = Session {
            config: &config,
            pipeline: &mut pipeline,
            source: source.as_mut(),
            display: display.as_mut(),
            eye_windows,
        };

        info!("Starting main loop");
        let summary = session.run_loop()?;
        drop(session);

        info!(
            "Stopped after {} frame(s) ({:?}): {} face(s), {} eye(s), {} pupil(s)",
            summary.frames, summary.stop, summary.faces, summary.eyes, summary.pupils
        );
        Ok(summary)
    }
}

/// Loop state that owns the device lifetimes for one run
struct Session<'a> {
    config: &'a Config,
    pipeline: &'a mut Pipeline,
    source: &'a mut dyn FrameSource,
    display: &'a mut dyn DisplaySurface,
    eye_windows: Vec<EyeWindows>,
}

impl Session<'_> {
    fn run_loop(&mut self) -> Result<RunSummary> {
        self.open_windows()?;

        let max_failures = self.config.camera.max_consecutive_failures;
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut consecutive_drops = 0;

        loop {
            if self.config.display.max_frames.is_some_and(|limit| summary.frames >= limit) {
                summary.stop = StopReason::FrameLimit;
                break;
            }

            let capture = self.source.read_frame().unwrap_or_else(|e| {
                warn!("Frame source error: {}", e);
                Capture::Dropped
            });
            let frame = match capture {
                Capture::Frame(frame) => {
                    consecutive_drops = 0;
                    frame
                }
                Capture::Dropped => {
                    consecutive_drops += 1;
                    summary.dropped_frames += 1;
                    warn!("Failed to read frame ({} in a row)", consecutive_drops);
                    if consecutive_drops >= max_failures {
                        return Err(Error::Camera(format!(
                            "No frame from source after {consecutive_drops} attempts"
                        )));
                    }
                    continue;
                }
                Capture::Ended => {
                    info!("End of stream reached");
                    summary.stop = StopReason::EndOfStream;
                    break;
                }
            };

            summary.frames += 1;
            let fps = summary.frames as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
            self.present(&frame, fps, &mut summary)?;

            if self.display.poll_key(self.config.display.key_delay_ms)? == Some(QUIT_KEY) {
                info!("Exit requested by user");
                summary.stop = StopReason::QuitKey;
                break;
            }
        }

        Ok(summary)
    }

    fn open_windows(&mut self) -> Result<()> {
        self.display.open(MAIN_WINDOW)?;
        for windows in &self.eye_windows {
            self.display.open(&windows.thresholded)?;
            self.display.open(&windows.detection)?;
        }
        Ok(())
    }

    /// Process, annotate and show one frame
    fn present(&mut self, frame: &Mat, fps: f64, summary: &mut RunSummary) -> Result<()> {
        let mut canvas = self.fresh_canvas(frame)?;

        let analysed = self.pipeline.process(frame).and_then(|analysis| {
            annotate_frame(&mut canvas, &analysis)?;
            Ok(analysis)
        });

        match analysed {
            Ok(analysis) => {
                summary.record(&analysis);
                if let Err(e) = self.show_eyes(frame, &analysis) {
                    warn!("Frame {}: eye windows not updated: {}", summary.frames, e);
                    self.blank_eye_windows(0);
                }
            }
            Err(e) => {
                summary.failed_frames += 1;
                warn!("Frame {}: processing failed, showing it unannotated: {}", summary.frames, e);
                canvas = self.fresh_canvas(frame)?;
                self.blank_eye_windows(0);
            }
        }

        if self.config.display.show_fps {
            draw_fps(&mut canvas, fps)?;
        }
        self.display.show(MAIN_WINDOW, &canvas)
    }

    /// Canvas for `frame`, or a plain copy when the conversion fails
    fn fresh_canvas(&self, frame: &Mat) -> Result<Mat> {
        self.canvas_for(frame).or_else(|e| -> Result<Mat> {
            warn!("Canvas conversion failed, drawing on the raw frame: {}", e);
            Ok(frame.try_clone()?)
        })
    }

    /// Fresh image to draw on, color even when annotating the gray frame
    fn canvas_for(&self, frame: &Mat) -> Result<Mat> {
        if !self.config.display.grayscale_canvas {
            return Ok(frame.try_clone()?);
        }
        let gray = to_grayscale(frame)?;
        let mut canvas = Mat::default();
        imgproc::cvt_color(&gray, &mut canvas, imgproc::COLOR_GRAY2BGR, 0)?;
        Ok(canvas)
    }

    /// Update the per-eye debug windows, one slot per eye until slots run out.
    ///
    /// Slots without an eye this frame are blanked.
    fn show_eyes(&mut self, frame: &Mat, analysis: &FrameAnalysis) -> Result<()> {
        let mut shown = 0;
        for (windows, eye) in self.eye_windows.iter().zip(analysis.eyes()) {
            self.display.show(&windows.thresholded, &eye.thresholded)?;

            let mut detection = crop(frame, &eye.eye.to_frame())?;
            for pupil in &eye.pupils {
                draw_pupil(&mut detection, &pupil.local, colors::pupil())?;
            }
            self.display.show(&windows.detection, &detection)?;
            shown += 1;
        }
        self.blank_eye_windows(shown);
        Ok(())
    }

    /// Show an empty placeholder in every eye slot from `first` on
    fn blank_eye_windows(&mut self, first: usize) {
        if first >= self.eye_windows.len() {
            return;
        }
        let blank = Mat::zeros(EYE_PLACEHOLDER_HEIGHT, EYE_PLACEHOLDER_WIDTH, CV_8UC1).and_then(|zeros| zeros.to_mat());
        let blank = match blank {
            Ok(blank) => blank,
            Err(e) => {
                warn!("Failed to build eye placeholder: {}", e);
                return;
            }
        };
        for windows in &self.eye_windows[first..] {
            for name in [&windows.thresholded, &windows.detection] {
                if let Err(e) = self.display.show(name, &blank) {
                    warn!("Failed to clear {}: {}", name, e);
                }
            }
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.source.release() {
            warn!("Failed to release frame source: {}", e);
        }
        if let Err(e) = self.display.close_all() {
            warn!("Failed to close windows: {}", e);
        }
        info!("Frame source released, windows closed");
    }
}
