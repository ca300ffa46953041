//! Region detection with pre-trained Haar cascade classifiers.

use crate::{config::CascadeConfig, geometry::Region, Error, Result};
use log::info;
use opencv::{
    core::{Mat, Rect, Size, Vector},
    objdetect::{CascadeClassifier, CASCADE_SCALE_IMAGE},
    prelude::*,
};
use std::path::Path;

/// Where to get the stock cascades when a configured file is missing
pub const CASCADE_HINT: &str = "copy it from the haarcascades directory of an OpenCV install, \
e.g. /usr/share/opencv4/haarcascades, or pass --face-cascade / --eye-cascade";

/// Finds bounding boxes of a trained pattern in a grayscale image
pub trait RegionDetector {
    /// Detect regions in `image`.
    ///
    /// Every returned region lies inside the image. Order is unspecified
    /// and the result may be empty.
    fn detect(&mut self, image: &Mat) -> Result<Vec<Region>>;

    /// Detector name for logs
    fn name(&self) -> &str;
}

/// Multi-scale sliding window Haar cascade
pub struct CascadeDetector {
    classifier: CascadeClassifier,
    params: CascadeConfig,
    name: String,
}

impl CascadeDetector {
    /// Load a cascade definition from an XML file
    ///
    /// # Errors
    ///
    /// Returns `ModelError` if the file does not exist or OpenCV cannot
    /// parse it into a usable classifier
    pub fn load<P: AsRef<Path>>(path: P, params: CascadeConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelError(format!(
                "Cascade file not found: {} ({})",
                path.display(),
                CASCADE_HINT
            )));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::ModelError(format!("Cascade path is not valid UTF-8: {}", path.display())))?;

        let classifier = CascadeClassifier::new(path_str)?;
        if classifier.empty()? {
            return Err(Error::ModelError(format!("Failed to load cascade: {}", path.display())));
        }

        let name = path
            .file_stem()
            .map_or_else(|| "cascade".to_string(), |stem| stem.to_string_lossy().into_owned());
        info!(
            "Loaded cascade {} (scale factor {}, min neighbors {})",
            name, params.scale_factor, params.min_neighbors
        );

        Ok(Self { classifier, params, name })
    }

    pub fn params(&self) -> &CascadeConfig {
        &self.params
    }
}

impl RegionDetector for CascadeDetector {
    fn detect(&mut self, image: &Mat) -> Result<Vec<Region>> {
        let mut rects = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            image,
            &mut rects,
            self.params.scale_factor,
            self.params.min_neighbors,
            CASCADE_SCALE_IMAGE,
            Size::new(self.params.min_size, self.params.min_size),
            Size::default(),
        )?;

        Ok(clamp_regions(rects.iter().map(Region::from), image.cols(), image.rows()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Clip detections to the image and drop those left empty
pub fn clamp_regions<I>(regions: I, width: i32, height: i32) -> Vec<Region>
where
    I: IntoIterator<Item = Region>,
{
    regions
        .into_iter()
        .filter_map(|region| region.clamp_to(width, height))
        .collect()
}
