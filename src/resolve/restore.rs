//! Restoration padding.
//!
//! One formula is used for every dialect: the placement rectangle recorded
//! during normalization is measured against the (packed-orientation) source
//! canvas, then the padding is turned back to the natural orientation for
//! rotated sprites.

use crate::error::{Result, UnpxError};
use crate::types::{Padding, SpriteFrame};

/// Padding to add around the unrotated cropped pixels.
pub fn restore_padding(name: &str, frame: &SpriteFrame) -> Result<Padding> {
    if !frame.trimmed {
        return Ok(Padding::ZERO);
    }

    let placed = frame.sprite_source_rect;
    if (placed.w, placed.h) != (frame.frame_rect.w, frame.frame_rect.h) {
        return Err(UnpxError::InvalidGeometry {
            sprite: name.to_string(),
            message: format!(
                "placement size {}x{} differs from frame size {}x{}",
                placed.w, placed.h, frame.frame_rect.w, frame.frame_rect.h
            ),
        });
    }

    let padding = Padding::around(placed, frame.source_size);
    if !padding.is_non_negative() {
        return Err(UnpxError::InvalidGeometry {
            sprite: name.to_string(),
            message: format!(
                "trimmed pixels at ({}, {}) size {}x{} escape the {}x{} source canvas",
                placed.x, placed.y, placed.w, placed.h, frame.source_size.w, frame.source_size.h
            ),
        });
    }

    Ok(if frame.rotated {
        padding.unrotated()
    } else {
        padding
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rect, Size, SourceRect};

    fn trimmed(frame_rect: Rect, source: Size, placed: SourceRect, rotated: bool) -> SpriteFrame {
        SpriteFrame {
            frame_rect,
            rotated,
            trimmed: true,
            source_size: source,
            sprite_source_rect: placed,
            origin: Default::default(),
        }
    }

    #[test]
    fn test_untrimmed_is_zero() {
        let frame = SpriteFrame::untrimmed(Rect::new(0, 0, 8, 8));
        assert_eq!(restore_padding("s", &frame).unwrap(), Padding::ZERO);
    }

    #[test]
    fn test_direct_rect_formula() {
        let frame = trimmed(
            Rect::new(0, 0, 6, 8),
            Size::new(10, 12),
            SourceRect::new(1, 2, 6, 8),
            false,
        );
        assert_eq!(restore_padding("s", &frame).unwrap(), Padding::new(1, 2, 3, 2));
    }

    #[test]
    fn test_rotated_padding_is_natural() {
        // Packed: 4x6 pixels at (3,1) in a 10x8 canvas.
        let frame = trimmed(
            Rect::new(0, 0, 4, 6),
            Size::new(10, 8),
            SourceRect::new(3, 1, 4, 6),
            true,
        );
        let pad = restore_padding("s", &frame).unwrap();
        // Natural: 6x4 pixels at (1,3) in an 8x10 canvas.
        assert_eq!(pad, Padding::new(1, 3, 1, 3));
        assert_eq!(6 + pad.horizontal(), 8);
        assert_eq!(4 + pad.vertical(), 10);
    }

    #[test]
    fn test_escaping_placement_fails() {
        let frame = trimmed(
            Rect::new(0, 0, 6, 6),
            Size::new(8, 8),
            SourceRect::new(4, 0, 6, 6),
            false,
        );
        assert!(matches!(
            restore_padding("s", &frame),
            Err(UnpxError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_placement_size_mismatch_fails() {
        let frame = trimmed(
            Rect::new(0, 0, 6, 6),
            Size::new(8, 8),
            SourceRect::new(0, 0, 5, 6),
            false,
        );
        assert!(restore_padding("s", &frame).is_err());
    }
}
