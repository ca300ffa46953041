//! Geometric records shared by every stage of the tracker.
//!
//! Faces, eyes and pupils are each found inside a crop of the previous
//! stage's image, so their raw coordinates are relative to that crop.
//! [`Anchored`] keeps a value together with the offset of its crop inside the
//! full frame so nothing is drawn in the wrong coordinate space.

use opencv::core::{Point, Rect};

/// Translation from a crop's local space into full-frame space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    /// Offset of the full frame itself
    pub const ORIGIN: Offset = Offset { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Offset of a crop nested inside a crop located at `self`
    #[must_use]
    pub fn then(self, inner: Offset) -> Offset {
        Offset::new(self.dx + inner.dx, self.dy + inner.dy)
    }
}

/// Values that can be moved between coordinate spaces
pub trait Translate {
    #[must_use]
    fn translated(&self, offset: Offset) -> Self;
}

/// Axis-aligned bounding box in its parent image's coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner as the offset of a crop taken from this region
    pub fn origin(&self) -> Offset {
        Offset::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersect with a `width` x `height` parent image.
    ///
    /// Returns `None` if nothing of the region lies inside the parent.
    pub fn clamp_to(&self, width: i32, height: i32) -> Option<Region> {
        let x = self.x.clamp(0, width.max(0));
        let y = self.y.clamp(0, height.max(0));
        let right = self.right().clamp(0, width.max(0));
        let bottom = self.bottom().clamp(0, height.max(0));
        let clamped = Region::new(x, y, right - x, bottom - y);
        (!clamped.is_empty()).then_some(clamped)
    }

    /// Whether `self` lies entirely inside a `width` x `height` parent
    pub fn fits_within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width && self.bottom() <= height
    }

    /// Whether `other` lies entirely inside `self` (same coordinate space)
    pub fn contains(&self, other: &Region) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    /// Whether the point lies inside `self`, right/bottom edges exclusive
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Point just above the top-left corner where a label is drawn
    pub fn label_anchor(&self, gap: i32) -> Point {
        Point::new(self.x, self.y - gap)
    }
}

impl Translate for Region {
    fn translated(&self, offset: Offset) -> Self {
        Region::new(self.x + offset.dx, self.y + offset.dy, self.width, self.height)
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::new(rect.x, rect.y, rect.width, rect.height)
    }
}

impl From<Region> for Rect {
    fn from(region: Region) -> Self {
        Rect::new(region.x, region.y, region.width, region.height)
    }
}

/// Pupil location in the coordinate space of its eye crop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PupilCandidate {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl PupilCandidate {
    pub fn new(center_x: i32, center_y: i32, radius: i32) -> Self {
        Self { center_x, center_y, radius }
    }

    /// Build a candidate from a blob keypoint centre and diameter.
    ///
    /// The centre is truncated to whole pixels and the radius is
    /// `floor(size / 2)`, never negative.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_keypoint(x: f32, y: f32, size: f32) -> Self {
        let radius = if size.is_finite() { (size / 2.0).floor().max(0.0) as i32 } else { 0 };
        Self::new(x as i32, y as i32, radius)
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

impl Translate for PupilCandidate {
    fn translated(&self, offset: Offset) -> Self {
        PupilCandidate::new(self.center_x + offset.dx, self.center_y + offset.dy, self.radius)
    }
}

/// A value in local crop coordinates paired with the crop's full-frame offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchored<T> {
    /// Value as reported by the detector that ran on the crop
    pub local: T,
    /// Where the crop's (0, 0) sits in the full frame
    pub origin: Offset,
}

impl<T: Translate> Anchored<T> {
    pub fn new(local: T, origin: Offset) -> Self {
        Self { local, origin }
    }

    /// A value detected directly on the full frame
    pub fn in_frame(local: T) -> Self {
        Self::new(local, Offset::ORIGIN)
    }

    /// The value expressed in full-frame coordinates
    pub fn to_frame(&self) -> T {
        self.local.translated(self.origin)
    }
}

impl Anchored<Region> {
    /// Offset of the crop cut out of this region, for anchoring its children
    pub fn crop_origin(&self) -> Offset {
        self.origin.then(self.local.origin())
    }

    /// Anchor a value found inside this region's crop
    pub fn child<U: Translate>(&self, local: U) -> Anchored<U> {
        Anchored::new(local, self.crop_origin())
    }
}
