//! Helper functions and stand-ins for tests
#![allow(dead_code)]

use opencv::{
    core::{Mat, Scalar, CV_8UC2, CV_8UC3},
    prelude::*,
};
use pupil_tracker::{
    blob::{Blob, BlobDetection},
    capture::{Capture, FrameSource},
    cascade::RegionDetector,
    config::Config,
    display::DisplaySurface,
    geometry::Region,
    pipeline::{Detectors, Pipeline},
    Error, Result,
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

/// Uniform gray color frame
pub fn create_test_frame(width: i32, height: i32) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(128.0))?)
}

/// Region detector that always reports the same regions
pub struct FixedRegions(pub Vec<Region>);

impl RegionDetector for FixedRegions {
    fn detect(&mut self, _image: &Mat) -> Result<Vec<Region>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Region detector answering each call with the next scripted result, then nothing
pub struct ScriptedRegions(pub VecDeque<Vec<Region>>);

impl ScriptedRegions {
    pub fn new(calls: impl IntoIterator<Item = Vec<Region>>) -> Self {
        Self(calls.into_iter().collect())
    }
}

impl RegionDetector for ScriptedRegions {
    fn detect(&mut self, _image: &Mat) -> Result<Vec<Region>> {
        Ok(self.0.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Region detector that fails on the listed calls (0-based) and finds nothing otherwise
pub struct FlakyRegions {
    pub failing_calls: Vec<usize>,
    calls: usize,
}

impl FlakyRegions {
    pub fn new(failing_calls: Vec<usize>) -> Self {
        Self { failing_calls, calls: 0 }
    }
}

impl RegionDetector for FlakyRegions {
    fn detect(&mut self, _image: &Mat) -> Result<Vec<Region>> {
        let call = self.calls;
        self.calls += 1;
        if self.failing_calls.contains(&call) {
            return Err(Error::InvalidInput(format!("detector failure on call {call}")));
        }
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Blob detector recording the size of every image it was given
#[derive(Clone, Default)]
pub struct RecordingBlobs {
    pub inputs: Rc<RefCell<Vec<(i32, i32)>>>,
    pub blobs: Vec<Blob>,
}

impl BlobDetection for RecordingBlobs {
    fn detect_blobs(&mut self, binary: &Mat) -> Result<Vec<Blob>> {
        self.inputs.borrow_mut().push((binary.cols(), binary.rows()));
        Ok(self.blobs.clone())
    }
}

/// Pipeline over stub detectors
pub fn stub_pipeline(
    face: impl RegionDetector + 'static,
    eye: impl RegionDetector + 'static,
    pupil: RecordingBlobs,
) -> Pipeline {
    Pipeline::new(Detectors {
        face: Box::new(face),
        eye: Box::new(eye),
        pupil: Box::new(pupil),
        threshold: Config::default().threshold,
    })
}

/// What a scripted source hands out on each read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Frame,
    /// Two-channel frame no grayscale conversion accepts
    OddFrame,
    Dropped,
    /// The read itself fails
    Error,
}

/// Frame source playing back a fixed script, then ending or dropping forever
pub struct ScriptedSource {
    script: VecDeque<Step>,
    drop_forever: bool,
    pub reads: Rc<Cell<usize>>,
    pub releases: Rc<Cell<usize>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            drop_forever: false,
            reads: Rc::default(),
            releases: Rc::default(),
        }
    }

    /// A camera that never delivers a frame
    pub fn dead_camera() -> Self {
        Self {
            drop_forever: true,
            ..Self::new(Vec::new())
        }
    }
}

impl FrameSource for ScriptedSource {
    fn read_frame(&mut self) -> Result<Capture> {
        self.reads.set(self.reads.get() + 1);
        match self.script.pop_front() {
            Some(Step::Frame) => Ok(Capture::Frame(create_test_frame(320, 240)?)),
            Some(Step::OddFrame) => Ok(Capture::Frame(Mat::new_rows_cols_with_default(
                240,
                320,
                CV_8UC2,
                Scalar::all(128.0),
            )?)),
            Some(Step::Dropped) => Ok(Capture::Dropped),
            Some(Step::Error) => Err(Error::Camera("device reset".to_string())),
            None if self.drop_forever => Ok(Capture::Dropped),
            None => Ok(Capture::Ended),
        }
    }

    fn release(&mut self) -> Result<()> {
        self.releases.set(self.releases.get() + 1);
        Ok(())
    }
}

/// Everything a recording display was asked to do
#[derive(Debug, Default)]
pub struct DisplayLog {
    pub opened: Vec<String>,
    pub shown: Vec<String>,
    pub polls: usize,
    pub closes: usize,
}

impl DisplayLog {
    pub fn shown_count(&self, name: &str) -> usize {
        self.shown.iter().filter(|shown| *shown == name).count()
    }
}

/// Display that records calls and replays scripted key presses
pub struct RecordingDisplay {
    pub log: Rc<RefCell<DisplayLog>>,
    keys: VecDeque<Option<char>>,
}

impl RecordingDisplay {
    pub fn new(keys: impl IntoIterator<Item = Option<char>>) -> Self {
        Self {
            log: Rc::default(),
            keys: keys.into_iter().collect(),
        }
    }

    /// A display where no key is ever pressed
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }
}

impl DisplaySurface for RecordingDisplay {
    fn open(&mut self, name: &str) -> Result<()> {
        self.log.borrow_mut().opened.push(name.to_string());
        Ok(())
    }

    fn show(&mut self, name: &str, image: &Mat) -> Result<()> {
        if image.empty() {
            return Err(Error::Display(format!("empty image for {name}")));
        }
        self.log.borrow_mut().shown.push(name.to_string());
        Ok(())
    }

    fn poll_key(&mut self, _delay_ms: i32) -> Result<Option<char>> {
        self.log.borrow_mut().polls += 1;
        Ok(self.keys.pop_front().flatten())
    }

    fn close_all(&mut self) -> Result<()> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}
