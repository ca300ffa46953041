//! Integration tests for face → eye → pupil narrowing

mod test_helpers;

use opencv::{
    core::{Mat, Point, Scalar, Vec3b, CV_8UC3},
    imgproc,
    prelude::*,
};
use pupil_tracker::{
    annotate::annotate_frame,
    blob::{Blob, PupilBlobDetector},
    config::Config,
    geometry::Region,
    pipeline::{Detectors, Pipeline},
};
use test_helpers::{create_test_frame, FixedRegions, RecordingBlobs};

#[test]
fn test_two_faces_with_one_eye_each_run_blob_detection_twice() {
    let blobs = RecordingBlobs {
        blobs: vec![Blob { x: 12.0, y: 9.0, size: 8.0 }],
        ..RecordingBlobs::default()
    };
    let inputs = blobs.inputs.clone();
    let mut pipeline = test_helpers::stub_pipeline(
        FixedRegions(vec![Region::new(10, 10, 120, 120), Region::new(180, 40, 120, 120)]),
        FixedRegions(vec![Region::new(20, 30, 50, 30)]),
        blobs,
    );

    let frame = create_test_frame(320, 240).unwrap();
    let analysis = pipeline.process(&frame).unwrap();

    assert_eq!(analysis.face_count(), 2);
    assert_eq!(analysis.eye_count(), 2);
    assert_eq!(analysis.pupil_count(), 2);
    // Each call sees only its own eye crop
    assert_eq!(*inputs.borrow(), vec![(50, 30), (50, 30)]);

    let centers: Vec<Point> = analysis
        .eyes()
        .flat_map(|eye| eye.pupils.iter().map(|pupil| pupil.to_frame().center()))
        .collect();
    assert_eq!(centers, vec![Point::new(42, 49), Point::new(212, 79)]);
}

#[test]
fn test_eye_regions_are_reported_in_frame_coordinates() {
    let mut pipeline = test_helpers::stub_pipeline(
        FixedRegions(vec![Region::new(100, 50, 150, 150)]),
        FixedRegions(vec![Region::new(10, 20, 40, 30), Region::new(90, 20, 40, 30)]),
        RecordingBlobs::default(),
    );

    let frame = create_test_frame(320, 240).unwrap();
    let analysis = pipeline.process(&frame).unwrap();

    let eyes: Vec<Region> = analysis.eyes().map(|eye| eye.eye.to_frame()).collect();
    assert_eq!(eyes, vec![Region::new(110, 70, 40, 30), Region::new(190, 70, 40, 30)]);
    for eye in &eyes {
        assert!(analysis.faces[0].face.to_frame().contains(eye));
    }
    // No blobs still yields a thresholded image per eye
    for eye in analysis.eyes() {
        assert_eq!((eye.thresholded.cols(), eye.thresholded.rows()), (40, 30));
        assert!(eye.pupils.is_empty());
    }
}

#[test]
fn test_dark_disk_is_found_as_pupil_in_frame() {
    let mut frame = Mat::new_rows_cols_with_default(240, 320, CV_8UC3, Scalar::all(100.0)).unwrap();
    imgproc::circle(
        &mut frame,
        Point::new(155, 112),
        7,
        Scalar::all(0.0),
        -1,
        imgproc::LINE_8,
        0,
    )
    .unwrap();

    let config = Config::default();
    let mut pipeline = Pipeline::new(Detectors {
        face: Box::new(FixedRegions(vec![Region::new(100, 50, 200, 180)])),
        eye: Box::new(FixedRegions(vec![Region::new(30, 40, 80, 60)])),
        pupil: Box::new(PupilBlobDetector::new(&config.blob).unwrap()),
        threshold: config.threshold,
    });

    let analysis = pipeline.process(&frame).unwrap();
    assert_eq!(analysis.pupil_count(), 1);

    let pupil = analysis.faces[0].eyes[0].pupils[0].to_frame();
    assert!((pupil.center_x - 155).abs() <= 2, "x = {}", pupil.center_x);
    assert!((pupil.center_y - 112).abs() <= 2, "y = {}", pupil.center_y);
    assert!((pupil.radius - 7).abs() <= 2, "radius = {}", pupil.radius);

    let mut canvas = frame.try_clone().unwrap();
    annotate_frame(&mut canvas, &analysis).unwrap();
    let marked = *canvas.at_2d::<Vec3b>(pupil.center_y, pupil.center_x + pupil.radius).unwrap();
    assert_eq!(marked, Vec3b::from([0, 0, 255]));
}

#[test]
fn test_frame_is_not_modified_by_processing() {
    let mut pipeline = test_helpers::stub_pipeline(
        FixedRegions(vec![Region::new(10, 10, 100, 100)]),
        FixedRegions(vec![Region::new(10, 10, 40, 30)]),
        RecordingBlobs::default(),
    );

    let frame = create_test_frame(160, 120).unwrap();
    let before = frame.data_bytes().unwrap().to_vec();
    pipeline.process(&frame).unwrap();

    assert_eq!(frame.data_bytes().unwrap(), before.as_slice());
}
