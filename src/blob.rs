//! Dark blob detection on binarized eye crops.
//!
//! The detector sweeps a threshold over the image, keeps connected dark
//! components that survive several consecutive thresholds and filters them
//! by area, circularity, convexity and inertia ratio. The default filters
//! favour round, convex, non-elongated regions: pupils rather than lashes or
//! shadows.

use crate::{config::BlobConfig, geometry::PupilCandidate, Result};
use opencv::{
    core::{KeyPoint, Mat, Ptr, Vector},
    features2d::{SimpleBlobDetector, SimpleBlobDetector_Params},
    prelude::*,
};

/// A detected blob in the coordinates of the image it was found in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    /// Centroid x
    pub x: f32,
    /// Centroid y
    pub y: f32,
    /// Diameter estimate
    pub size: f32,
}

impl Blob {
    pub fn to_pupil(&self) -> PupilCandidate {
        PupilCandidate::from_keypoint(self.x, self.y, self.size)
    }
}

/// Finds blobs in a binary image
pub trait BlobDetection {
    fn detect_blobs(&mut self, binary: &Mat) -> Result<Vec<Blob>>;
}

/// `OpenCV` simple blob detector configured for pupils
pub struct PupilBlobDetector {
    detector: Ptr<SimpleBlobDetector>,
}

impl PupilBlobDetector {
    /// Build a detector from the configured filters
    ///
    /// # Errors
    ///
    /// Returns an error if OpenCV rejects the parameters
    pub fn new(config: &BlobConfig) -> Result<Self> {
        let params = detector_params(config)?;
        let detector = SimpleBlobDetector::create(params)?;
        Ok(Self { detector })
    }
}

impl BlobDetection for PupilBlobDetector {
    fn detect_blobs(&mut self, binary: &Mat) -> Result<Vec<Blob>> {
        let mut keypoints = Vector::<KeyPoint>::new();
        self.detector.detect(binary, &mut keypoints, &Mat::default())?;

        Ok(keypoints
            .iter()
            .map(|keypoint| {
                let pt = keypoint.pt();
                Blob {
                    x: pt.x,
                    y: pt.y,
                    size: keypoint.size(),
                }
            })
            .collect())
    }
}

fn detector_params(config: &BlobConfig) -> Result<SimpleBlobDetector_Params> {
    let mut params = SimpleBlobDetector_Params::default()?;

    params.min_threshold = config.min_threshold;
    params.max_threshold = config.max_threshold;
    params.threshold_step = config.threshold_step;

    params.filter_by_color = true;
    params.blob_color = 0;

    params.filter_by_area = true;
    params.min_area = config.min_area;
    params.max_area = config.max_area;

    params.filter_by_circularity = true;
    params.min_circularity = config.min_circularity;

    params.filter_by_convexity = true;
    params.min_convexity = config.min_convexity;

    params.filter_by_inertia = true;
    params.min_inertia_ratio = config.min_inertia_ratio;

    Ok(params)
}
