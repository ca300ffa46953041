//! Tests against the real Haar cascades in `assets/`

use opencv::{
    core::{Mat, Scalar, CV_8UC1, CV_8UC3},
    imgproc,
    prelude::*,
};
use pupil_tracker::{
    cascade::{CascadeDetector, RegionDetector},
    config::{CascadeConfig, Config},
    pipeline::{Detectors, Pipeline},
};

fn face_detector() -> CascadeDetector {
    let config = Config::default();
    CascadeDetector::load(&config.models.face_cascade, CascadeConfig::face()).expect("Failed to load face cascade")
}

#[test]
#[ignore = "Requires Haar cascade files"]
fn test_cascades_load() {
    let config = Config::default();
    let face = CascadeDetector::load(&config.models.face_cascade, config.face_detection).unwrap();
    let eye = CascadeDetector::load(&config.models.eye_cascade, config.eye_detection).unwrap();

    assert_eq!(face.name(), "haarcascade_frontalface_default");
    assert_eq!(eye.params().min_neighbors, 12);
}

#[test]
#[ignore = "Requires Haar cascade files"]
fn test_blank_frame_has_no_faces() {
    let mut pipeline = Pipeline::new(Detectors::from_config(&Config::default()).unwrap());

    for value in [0.0, 128.0, 255.0] {
        let frame = Mat::new_rows_cols_with_default(480, 640, CV_8UC3, Scalar::all(value)).unwrap();
        let analysis = pipeline.process(&frame).unwrap();
        assert_eq!(analysis.face_count(), 0);
        assert_eq!(analysis.pupil_count(), 0);
    }
}

#[test]
#[ignore = "Requires Haar cascade files"]
fn test_detections_lie_inside_the_image() {
    let mut detector = face_detector();

    // Busy synthetic pattern to give the cascade something to chew on
    let mut image = Mat::new_rows_cols_with_default(240, 320, CV_8UC1, Scalar::all(90.0)).unwrap();
    for i in 0..12 {
        imgproc::circle(
            &mut image,
            opencv::core::Point::new(20 + i * 25, 40 + (i % 4) * 50),
            10 + i % 3 * 8,
            Scalar::all(f64::from(i * 20)),
            -1,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
    }

    for region in detector.detect(&image).unwrap() {
        assert!(region.fits_within(320, 240), "{region:?}");
        assert!(!region.is_empty());
    }
}

#[test]
#[ignore = "Requires Haar cascade files and test image"]
fn test_face_image_yields_nested_results() {
    let image = opencv::imgcodecs::imread("assets/face.jpg", opencv::imgcodecs::IMREAD_COLOR).unwrap();
    if image.empty() {
        return;
    }

    let mut pipeline = Pipeline::new(Detectors::from_config(&Config::default()).unwrap());
    let analysis = pipeline.process(&image).unwrap();

    assert!(analysis.face_count() > 0);
    for face in &analysis.faces {
        let face_region = face.face.to_frame();
        for eye in &face.eyes {
            assert!(face_region.contains(&eye.eye.to_frame()));
            for pupil in &eye.pupils {
                let center = pupil.to_frame().center();
                assert!(eye.eye.to_frame().contains_point(center.x, center.y));
            }
        }
    }
}
