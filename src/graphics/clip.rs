//! Blit clipping rectangle.

/// Inclusive rectangle bounding blitter writes. Not validated; callers keep
/// `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whole surface of `width` x `height`.
    #[must_use]
    pub const fn full(width: i32, height: i32) -> Self {
        Self::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }
}
