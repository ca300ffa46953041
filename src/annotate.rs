//! Drawing detections onto display images.

use crate::{
    constants::{LABEL_FONT_SCALE, LABEL_OFFSET, LINE_THICKNESS},
    geometry::{PupilCandidate, Region},
    pipeline::FrameAnalysis,
    Result,
};
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
};

/// BGR colors used for each stage
pub mod colors {
    use opencv::core::Scalar;

    pub fn face() -> Scalar {
        Scalar::new(255.0, 0.0, 0.0, 0.0)
    }

    pub fn eye() -> Scalar {
        Scalar::new(0.0, 255.0, 0.0, 0.0)
    }

    pub fn label() -> Scalar {
        Scalar::new(255.0, 255.0, 0.0, 0.0)
    }

    pub fn pupil() -> Scalar {
        Scalar::new(0.0, 0.0, 255.0, 0.0)
    }
}

/// Draw a rectangle with a text label just above its top edge
///
/// `region` must already be in the coordinate space of `image`.
pub fn draw_region(image: &mut Mat, region: &Region, label: &str, color: Scalar) -> Result<()> {
    imgproc::rectangle(image, Rect::from(*region), color, LINE_THICKNESS, LINE_8, 0)?;
    imgproc::put_text(
        image,
        label,
        region.label_anchor(LABEL_OFFSET),
        FONT_HERSHEY_SIMPLEX,
        LABEL_FONT_SCALE,
        colors::label(),
        LINE_THICKNESS,
        LINE_8,
        false,
    )?;
    Ok(())
}

/// Draw a pupil outline, `pupil` in the coordinate space of `image`
pub fn draw_pupil(image: &mut Mat, pupil: &PupilCandidate, color: Scalar) -> Result<()> {
    imgproc::circle(image, pupil.center(), pupil.radius, color, LINE_THICKNESS, LINE_8, 0)?;
    Ok(())
}

/// Composite every face, eye and pupil of a frame onto its full-size canvas
pub fn annotate_frame(canvas: &mut Mat, analysis: &FrameAnalysis) -> Result<()> {
    for face in &analysis.faces {
        draw_region(canvas, &face.face.to_frame(), "Face", colors::face())?;

        for eye in &face.eyes {
            draw_region(canvas, &eye.eye.to_frame(), "Eye", colors::eye())?;

            for pupil in &eye.pupils {
                draw_pupil(canvas, &pupil.to_frame(), colors::pupil())?;
            }
        }
    }
    Ok(())
}

/// Draw the frame rate in the top-left corner
pub fn draw_fps(canvas: &mut Mat, fps: f64) -> Result<()> {
    imgproc::put_text(
        canvas,
        &format!("FPS: {fps:.1}"),
        Point::new(10, 30),
        FONT_HERSHEY_SIMPLEX,
        LABEL_FONT_SCALE,
        colors::eye(),
        LINE_THICKNESS,
        LINE_8,
        false,
    )?;
    Ok(())
}
