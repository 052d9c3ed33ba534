#![forbid(unsafe_code)]

//! Geometric primitives for frame placement.
//!
//! Offsets follow the host toolkit's convention: `x` grows to the right and
//! `y` grows upward, so an offset of `(0, -135)` places a frame 135 units
//! below its reference point. Resolved rectangles ([`Rect`]) use screen
//! coordinates with the origin at the top-left and `y` growing downward.

use crate::toolkit::FrameHandle;

/// Width and height of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// A size with zero width and height.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is non-positive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A displacement applied after anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    /// Horizontal displacement (positive is right).
    pub x: f32,
    /// Vertical displacement (positive is up).
    pub y: f32,
}

impl Offset {
    /// No displacement.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new offset.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One of the nine attachment points on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorPoint {
    TopLeft,
    #[default]
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl AnchorPoint {
    /// Fractional position of this point inside a frame, `(0, 0)` being the
    /// top-left corner and `(1, 1)` the bottom-right one.
    pub const fn fraction(self) -> (f32, f32) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::Top => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::Left => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::Right => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::Bottom => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// Host-facing name of the point.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "TOPLEFT",
            Self::Top => "TOP",
            Self::TopRight => "TOPRIGHT",
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
            Self::BottomLeft => "BOTTOMLEFT",
            Self::Bottom => "BOTTOM",
            Self::BottomRight => "BOTTOMRIGHT",
        }
    }
}

/// What an anchor is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    /// The whole screen.
    Screen,
    /// Another frame.
    Frame(FrameHandle),
}

/// Attaches `point` of a frame to `relative_point` of `target`, displaced by
/// `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: AnchorPoint,
    pub target: AnchorTarget,
    pub relative_point: AnchorPoint,
    pub offset: Offset,
}

impl Anchor {
    /// Create a new anchor.
    pub const fn new(
        point: AnchorPoint,
        target: AnchorTarget,
        relative_point: AnchorPoint,
        offset: Offset,
    ) -> Self {
        Self {
            point,
            target,
            relative_point,
            offset,
        }
    }

    /// Top edge of a frame glued to the bottom edge of `frame`.
    pub const fn below(frame: FrameHandle) -> Self {
        Self::new(
            AnchorPoint::Top,
            AnchorTarget::Frame(frame),
            AnchorPoint::Bottom,
            Offset::ZERO,
        )
    }

    /// Top edge of a frame placed relative to the top of the screen.
    pub const fn screen_top(offset: Offset) -> Self {
        Self::new(
            AnchorPoint::Top,
            AnchorTarget::Screen,
            AnchorPoint::Top,
            offset,
        )
    }

    /// Same point on both sides, relative to `frame`.
    pub const fn inside(point: AnchorPoint, frame: FrameHandle, offset: Offset) -> Self {
        Self::new(point, AnchorTarget::Frame(frame), point, offset)
    }
}

/// A resolved rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Screen position of an attachment point.
    pub fn point(&self, point: AnchorPoint) -> (f32, f32) {
        let (fx, fy) = point.fraction();
        (self.x + self.width * fx, self.y + self.height * fy)
    }

    /// Place a frame of `size` so that its `point` lands on `target`, then
    /// apply `offset` in host convention (positive `y` moves up).
    pub fn placed(size: Size, point: AnchorPoint, target: (f32, f32), offset: Offset) -> Self {
        let (fx, fy) = point.fraction();
        Self::new(
            target.0 - size.width * fx + offset.x,
            target.1 - size.height * fy - offset.y,
            size.width,
            size.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_empty_for_non_positive_dimensions() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(-1.0, 10.0).is_empty());
        assert!(!Size::new(320.0, 72.0).is_empty());
    }

    #[test]
    fn rect_point_hits_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.point(AnchorPoint::TopLeft), (10.0, 20.0));
        assert_eq!(r.point(AnchorPoint::Bottom), (60.0, 70.0));
        assert_eq!(r.point(AnchorPoint::Right), (110.0, 45.0));
    }

    #[test]
    fn placed_applies_host_offset_convention() {
        // Top of a 320x72 frame glued to the top-center of a 1000-wide screen,
        // pushed down 135 units.
        let r = Rect::placed(
            Size::new(320.0, 72.0),
            AnchorPoint::Top,
            (500.0, 0.0),
            Offset::new(0.0, -135.0),
        );
        assert_eq!(r, Rect::new(340.0, 135.0, 320.0, 72.0));
        assert_eq!(r.bottom(), 207.0);
    }

    #[test]
    fn below_anchor_shape() {
        let a = Anchor::below(FrameHandle(7));
        assert_eq!(a.point, AnchorPoint::Top);
        assert_eq!(a.relative_point, AnchorPoint::Bottom);
        assert_eq!(a.target, AnchorTarget::Frame(FrameHandle(7)));
        assert_eq!(a.offset, Offset::ZERO);
    }

    #[test]
    fn anchor_point_names() {
        assert_eq!(AnchorPoint::TopLeft.as_str(), "TOPLEFT");
        assert_eq!(AnchorPoint::BottomRight.as_str(), "BOTTOMRIGHT");
    }
}
