//! Image preprocessing: grayscale conversion, cropping and eye binarization.

use crate::{config::ThresholdConfig, geometry::Region, Error, Result};
use opencv::{
    core::{Mat, Rect},
    imgproc::{self, ADAPTIVE_THRESH_GAUSSIAN_C, THRESH_BINARY},
    prelude::*,
};

/// Convert a frame to single-channel intensity
///
/// BGR and BGRA frames are converted, single-channel frames are copied.
///
/// # Errors
///
/// Returns an error for empty frames or unsupported channel counts
pub fn to_grayscale(frame: &Mat) -> Result<Mat> {
    if frame.empty() {
        return Err(Error::InvalidInput("Cannot convert an empty frame".to_string()));
    }

    let code = match frame.channels() {
        1 => return Ok(frame.try_clone()?),
        3 => imgproc::COLOR_BGR2GRAY,
        4 => imgproc::COLOR_BGRA2GRAY,
        n => return Err(Error::InvalidInput(format!("Unsupported channel count: {n}"))),
    };

    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, code, 0)?;
    Ok(gray)
}

/// Copy the pixels of `region` out of `image`
///
/// # Errors
///
/// Returns an error if the region does not lie inside the image
pub fn crop(image: &Mat, region: &Region) -> Result<Mat> {
    if region.is_empty() || !region.fits_within(image.cols(), image.rows()) {
        return Err(Error::InvalidInput(format!(
            "Region {region:?} outside {}x{} image",
            image.cols(),
            image.rows()
        )));
    }
    let roi = Mat::roi(image, Rect::from(*region))?;
    Ok(roi.try_clone()?)
}

/// Binarize an eye crop so the pupil separates from the sclera
///
/// Each pixel is compared with the Gaussian-weighted mean of its
/// `block_size` neighbourhood minus `offset`. Pixels above become
/// `max_value`, the rest 0. Borders are replicated.
///
/// # Errors
///
/// Returns an error if the crop is not single-channel 8-bit
pub fn binarize_eye(eye_crop: &Mat, params: &ThresholdConfig) -> Result<Mat> {
    if eye_crop.empty() {
        return Err(Error::InvalidInput("Cannot threshold an empty eye crop".to_string()));
    }
    if eye_crop.channels() != 1 {
        return Err(Error::InvalidInput(format!(
            "Eye crop must be grayscale, got {} channels",
            eye_crop.channels()
        )));
    }

    let mut binary = Mat::default();
    imgproc::adaptive_threshold(
        eye_crop,
        &mut binary,
        params.max_value,
        ADAPTIVE_THRESH_GAUSSIAN_C,
        THRESH_BINARY,
        params.block_size,
        params.offset,
    )?;
    Ok(binary)
}
