//! Integer pixel geometry shared by the normalizer and the resolver.
//!
//! All coordinates use a top-left origin with the y-axis pointing down.

use serde::Serialize;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The same size with width and height exchanged.
    pub const fn swapped(self) -> Self {
        Self { w: self.h, h: self.w }
    }

    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// A rectangle on the packed texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.w as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.h as u64
    }

    /// Whether the rectangle lies entirely inside a canvas of `size`.
    pub fn fits_within(&self, size: Size) -> bool {
        self.right() <= size.w as u64 && self.bottom() <= size.h as u64
    }
}

/// Placement of trimmed pixels inside the sprite's original canvas.
///
/// Offsets are signed because legacy centered-offset encodings can describe
/// placements that escape the canvas; the resolver rejects those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl SourceRect {
    pub const fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// A rectangle covering a whole canvas.
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    /// Rotate a rectangle expressed in a `canvas` 90° clockwise.
    ///
    /// The result lives in the swapped canvas. This is the turn a packer
    /// applies when it stores a sprite rotated.
    pub fn rotated_cw(self, canvas: Size) -> Self {
        Self {
            x: canvas.h as i64 - self.y - self.h as i64,
            y: self.x,
            w: self.h,
            h: self.w,
        }
    }
}

/// Four-sided padding. Signed so that inconsistent metadata can be detected
/// instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Padding {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Padding derived from where `inner` sits within `canvas`.
    ///
    /// Right and bottom are the remainders, so `inner + padding == canvas`
    /// always holds on both axes.
    pub fn around(inner: SourceRect, canvas: Size) -> Self {
        Self {
            left: inner.x,
            top: inner.y,
            right: canvas.w as i64 - inner.w as i64 - inner.x,
            bottom: canvas.h as i64 - inner.h as i64 - inner.y,
        }
    }

    /// Re-express padding measured on clockwise-rotated pixels in the
    /// orientation obtained after turning them back counter-clockwise.
    pub const fn unrotated(self) -> Self {
        Self {
            left: self.top,
            top: self.right,
            right: self.bottom,
            bottom: self.left,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }

    pub const fn is_non_negative(&self) -> bool {
        self.left >= 0 && self.top >= 0 && self.right >= 0 && self.bottom >= 0
    }

    pub const fn horizontal(&self) -> i64 {
        self.left + self.right
    }

    pub const fn vertical(&self) -> i64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_swapped() {
        assert_eq!(Size::new(3, 7).swapped(), Size::new(7, 3));
    }

    #[test]
    fn test_rect_fits_within() {
        let canvas = Size::new(16, 16);
        assert!(Rect::new(0, 0, 16, 16).fits_within(canvas));
        assert!(Rect::new(8, 4, 8, 12).fits_within(canvas));
        assert!(!Rect::new(9, 0, 8, 8).fits_within(canvas));
        assert!(!Rect::new(0, 10, 4, 7).fits_within(canvas));
    }

    #[test]
    fn test_padding_around_uses_remainders() {
        let pad = Padding::around(SourceRect::new(1, 2, 5, 3), Size::new(10, 8));
        assert_eq!(pad, Padding::new(1, 2, 4, 3));
        assert_eq!(5 + pad.horizontal(), 10);
        assert_eq!(3 + pad.vertical(), 8);
    }

    #[test]
    fn test_padding_negative_detected() {
        let pad = Padding::around(SourceRect::new(-2, 0, 4, 4), Size::new(4, 4));
        assert!(!pad.is_non_negative());
    }

    #[test]
    fn test_rotated_cw_then_unrotated_padding() {
        // 10x6 canvas with content at (1,2) size 4x3.
        let canvas = Size::new(10, 6);
        let natural = SourceRect::new(1, 2, 4, 3);
        let packed = natural.rotated_cw(canvas);

        assert_eq!(packed, SourceRect::new(1, 1, 3, 4));

        let packed_pad = Padding::around(packed, canvas.swapped());
        assert_eq!(packed_pad.unrotated(), Padding::around(natural, canvas));
    }
}
