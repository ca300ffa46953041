//! Frame sources: live cameras and video files.

use crate::{Error, Result};
use log::{debug, info, warn};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::path::Path;

/// Outcome of one read from a frame source
#[derive(Debug)]
pub enum Capture {
    /// A decoded frame
    Frame(Mat),
    /// The device produced nothing this time; later reads may succeed
    Dropped,
    /// No more frames will come
    Ended,
}

/// Produces successive color frames
pub trait FrameSource {
    /// Block until the next frame is available
    fn read_frame(&mut self) -> Result<Capture>;

    /// Release the underlying device
    fn release(&mut self) -> Result<()>;
}

/// Live camera opened by device index
pub struct CameraSource {
    capture: VideoCapture,
    index: i32,
}

impl CameraSource {
    /// Open camera `index`
    ///
    /// # Errors
    ///
    /// Returns `Camera` if the device cannot be opened
    pub fn open(index: i32) -> Result<Self> {
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::Camera(format!("Unable to open camera {index}")));
        }

        // Keep latency low; not every backend supports this.
        if !capture.set(CAP_PROP_BUFFERSIZE, 1.0)? {
            debug!("Camera {} ignored buffer size request", index);
        }

        Ok(Self { capture, index })
    }
}

impl FrameSource for CameraSource {
    fn read_frame(&mut self) -> Result<Capture> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => Ok(Capture::Frame(frame)),
            Ok(_) => Ok(Capture::Dropped),
            // Backend exceptions count as a missed frame
            Err(e) => {
                warn!("Camera {} read failed: {}", self.index, e);
                Ok(Capture::Dropped)
            }
        }
    }

    fn release(&mut self) -> Result<()> {
        info!("Releasing camera {}", self.index);
        self.capture.release()?;
        Ok(())
    }
}

/// Frames decoded from a video file
pub struct VideoFileSource {
    capture: VideoCapture,
}

impl VideoFileSource {
    /// Open a video file
    ///
    /// # Errors
    ///
    /// Returns `Camera` if the file cannot be opened for decoding
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening video file: {}", path.display());
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::InvalidInput(format!("Video path is not valid UTF-8: {}", path.display())))?;

        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::Camera(format!("Unable to open video file {}", path.display())));
        }
        Ok(Self { capture })
    }
}

impl FrameSource for VideoFileSource {
    fn read_frame(&mut self) -> Result<Capture> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(Capture::Ended);
        }
        Ok(Capture::Frame(frame))
    }

    fn release(&mut self) -> Result<()> {
        self.capture.release()?;
        Ok(())
    }
}
