//! Per-frame face → eye → pupil narrowing.
//!
//! Each stage runs on a crop of the previous stage's grayscale image. Results
//! keep their crop-local coordinates together with the crop's offset in the
//! full frame (see [`Anchored`]), so the annotator can composite them back
//! onto the frame without re-deriving any offsets.

use crate::{
    blob::{BlobDetection, PupilBlobDetector},
    cascade::{CascadeDetector, RegionDetector},
    config::{Config, ThresholdConfig},
    geometry::{Anchored, PupilCandidate, Region},
    preprocess::{binarize_eye, crop, to_grayscale},
    Result,
};
use log::{debug, info};
use opencv::core::Mat;

/// Loaded detectors shared by every frame
pub struct Detectors {
    /// Finds faces in the full grayscale frame
    pub face: Box<dyn RegionDetector>,
    /// Finds eyes in a face crop
    pub eye: Box<dyn RegionDetector>,
    /// Finds pupils in a binarized eye crop
    pub pupil: Box<dyn BlobDetection>,
    /// Eye binarization parameters
    pub threshold: ThresholdConfig,
}

impl Detectors {
    /// Load both cascades and build the blob detector
    ///
    /// # Errors
    ///
    /// Returns an error if either cascade file cannot be loaded
    pub fn from_config(config: &Config) -> Result<Self> {
        let face = CascadeDetector::load(&config.models.face_cascade, config.face_detection)?;
        let eye = CascadeDetector::load(&config.models.eye_cascade, config.eye_detection)?;
        let pupil = PupilBlobDetector::new(&config.blob)?;

        Ok(Self {
            face: Box::new(face),
            eye: Box::new(eye),
            pupil: Box::new(pupil),
            threshold: config.threshold,
        })
    }
}

/// Everything found in one frame
#[derive(Debug, Default)]
pub struct FrameAnalysis {
    pub faces: Vec<FaceAnalysis>,
}

/// A face and the eyes found inside it
#[derive(Debug)]
pub struct FaceAnalysis {
    pub face: Anchored<Region>,
    pub eyes: Vec<EyeAnalysis>,
}

/// An eye, its binarized crop and the pupils found in it
#[derive(Debug)]
pub struct EyeAnalysis {
    pub eye: Anchored<Region>,
    /// Adaptive threshold output the pupils were detected on
    pub thresholded: Mat,
    pub pupils: Vec<Anchored<PupilCandidate>>,
}

impl FrameAnalysis {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn eye_count(&self) -> usize {
        self.faces.iter().map(|face| face.eyes.len()).sum()
    }

    pub fn pupil_count(&self) -> usize {
        self.eyes().map(|eye| eye.pupils.len()).sum()
    }

    /// All eyes in detection order
    pub fn eyes(&self) -> impl Iterator<Item = &EyeAnalysis> {
        self.faces.iter().flat_map(|face| face.eyes.iter())
    }
}

/// Runs the detection cascade on frames
pub struct Pipeline {
    detectors: Detectors,
}

impl Pipeline {
    pub fn new(detectors: Detectors) -> Self {
        Self { detectors }
    }

    /// Analyse a color (or grayscale) frame
    ///
    /// A stage that finds nothing ends its branch; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an `OpenCV` operation fails
    pub fn process(&mut self, frame: &Mat) -> Result<FrameAnalysis> {
        let gray = to_grayscale(frame)?;
        self.process_gray(&gray)
    }

    /// Analyse an already grayscale frame
    pub fn process_gray(&mut self, gray: &Mat) -> Result<FrameAnalysis> {
        let faces = self.detectors.face.detect(gray)?;
        debug!("{} found {} face(s)", self.detectors.face.name(), faces.len());

        let mut analysis = FrameAnalysis::default();
        for face in faces {
            info!("face : ({}, {}, {}, {})", face.x, face.y, face.width, face.height);
            let face = Anchored::in_frame(face);
            let eyes = self.detect_eyes(gray, &face)?;
            analysis.faces.push(FaceAnalysis { face, eyes });
        }

        Ok(analysis)
    }

    fn detect_eyes(&mut self, gray: &Mat, face: &Anchored<Region>) -> Result<Vec<EyeAnalysis>> {
        let face_crop = crop(gray, &face.local)?;
        let eyes = self.detectors.eye.detect(&face_crop)?;

        let mut results = Vec::with_capacity(eyes.len());
        for eye in eyes {
            info!("eye : ({}, {}, {}, {})", eye.x, eye.y, eye.width, eye.height);
            let eye_crop = crop(&face_crop, &eye)?;
            let eye = face.child(eye);
            results.push(self.detect_pupils(&eye_crop, eye)?);
        }
        Ok(results)
    }

    fn detect_pupils(&mut self, eye_crop: &Mat, eye: Anchored<Region>) -> Result<EyeAnalysis> {
        let thresholded = binarize_eye(eye_crop, &self.detectors.threshold)?;
        let blobs = self.detectors.pupil.detect_blobs(&thresholded)?;

        let pupils = blobs
            .iter()
            .map(|blob| {
                let pupil = blob.to_pupil();
                info!("pupil : ({}, {}, {})", pupil.center_x, pupil.center_y, pupil.radius);
                eye.child(pupil)
            })
            .collect();

        Ok(EyeAnalysis { eye, thresholded, pupils })
    }
}
