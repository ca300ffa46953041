//! Constants used throughout the application

/// Default camera device index
pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Consecutive dropped frames tolerated before the loop gives up
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Cascade scale step between pyramid levels
pub const DEFAULT_SCALE_FACTOR: f64 = 1.3;

/// Neighbour votes required to keep a face candidate
pub const DEFAULT_FACE_MIN_NEIGHBORS: i32 = 5;

/// Neighbour votes required to keep an eye candidate
pub const DEFAULT_EYE_MIN_NEIGHBORS: i32 = 12;

/// Adaptive threshold neighbourhood (must be odd)
pub const DEFAULT_THRESHOLD_BLOCK_SIZE: i32 = 99;

/// Constant subtracted from the Gaussian-weighted local mean
pub const DEFAULT_THRESHOLD_OFFSET: f64 = 8.0;

/// Value written for pixels above the local threshold
pub const DEFAULT_THRESHOLD_MAX_VALUE: f64 = 100.0;

/// Blob detector threshold sweep
pub const DEFAULT_BLOB_MIN_THRESHOLD: f32 = 5.0;
pub const DEFAULT_BLOB_MAX_THRESHOLD: f32 = 220.0;
pub const DEFAULT_BLOB_THRESHOLD_STEP: f32 = 10.0;

/// Blob shape filters tuned for pupils
pub const DEFAULT_BLOB_MIN_AREA: f32 = 100.0;
pub const DEFAULT_BLOB_MAX_AREA: f32 = 5000.0;
pub const DEFAULT_BLOB_MIN_CIRCULARITY: f32 = 0.3;
pub const DEFAULT_BLOB_MIN_CONVEXITY: f32 = 0.5;
pub const DEFAULT_BLOB_MIN_INERTIA_RATIO: f32 = 0.3;

/// Label placement above a rectangle's top edge
pub const LABEL_OFFSET: i32 = 5;

/// Stroke width for rectangles and circles
pub const LINE_THICKNESS: i32 = 2;

/// Hershey simplex font scale for labels
pub const LABEL_FONT_SCALE: f64 = 1.0;

/// Window names
pub const MAIN_WINDOW: &str = "Main Frame";

/// Size of the blank image shown in an eye window with no eye this frame
pub const EYE_PLACEHOLDER_WIDTH: i32 = 120;
pub const EYE_PLACEHOLDER_HEIGHT: i32 = 80;

/// Key that ends the display loop
pub const QUIT_KEY: char = 'q';
