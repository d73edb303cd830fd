//! Crop rectangle derivation.

use crate::error::{Result, UnpxError};
use crate::types::{FrameOrigin, Rect, SpriteFrame};

/// The region of the texture holding a sprite's packed pixels.
///
/// `texture_height` is only consulted for rotated frames whose stored corner
/// is relative to the unrotated texture frame.
pub fn crop_rect(
    name: &str,
    frame: &SpriteFrame,
    texture_height: impl FnOnce() -> Result<u32>,
) -> Result<Rect> {
    match frame.origin {
        FrameOrigin::UnrotatedTexture { stored_x, stored_y } if frame.rotated => {
            let height = texture_height()?;
            let y = height
                .checked_sub(frame.frame_rect.h)
                .and_then(|v| v.checked_sub(stored_x))
                .ok_or_else(|| UnpxError::InvalidGeometry {
                    sprite: name.to_string(),
                    message: format!(
                        "stored x {} plus height {} exceeds texture height {}",
                        stored_x, frame.frame_rect.h, height
                    ),
                })?;
            Ok(Rect::new(stored_y, y, frame.frame_rect.w, frame.frame_rect.h))
        }
        _ => Ok(frame.frame_rect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    fn rotated_frame(origin: FrameOrigin) -> SpriteFrame {
        let mut frame = SpriteFrame::untrimmed(Rect::new(5, 2, 4, 6));
        frame.rotated = true;
        frame.source_size = Size::new(4, 6);
        frame.origin = origin;
        frame
    }

    #[test]
    fn test_packed_origin_is_frame_rect() {
        let frame = rotated_frame(FrameOrigin::Packed);
        let rect = crop_rect("s", &frame, || panic!("height not needed")).unwrap();
        assert_eq!(rect, Rect::new(5, 2, 4, 6));
    }

    #[test]
    fn test_unrotated_texture_origin_flips_axis() {
        let frame = rotated_frame(FrameOrigin::UnrotatedTexture {
            stored_x: 5,
            stored_y: 2,
        });
        let rect = crop_rect("s", &frame, || Ok(32)).unwrap();
        // y = 32 - 6 - 5
        assert_eq!(rect, Rect::new(2, 21, 4, 6));
    }

    #[test]
    fn test_unrotated_origin_ignored_when_not_rotated() {
        let mut frame = rotated_frame(FrameOrigin::UnrotatedTexture {
            stored_x: 5,
            stored_y: 2,
        });
        frame.rotated = false;
        let rect = crop_rect("s", &frame, || panic!("height not needed")).unwrap();
        assert_eq!(rect, frame.frame_rect);
    }

    #[test]
    fn test_flip_beyond_texture_fails() {
        let frame = rotated_frame(FrameOrigin::UnrotatedTexture {
            stored_x: 30,
            stored_y: 0,
        });
        let err = crop_rect("s", &frame, || Ok(32)).unwrap_err();
        assert!(matches!(err, UnpxError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_missing_height_propagates() {
        let frame = rotated_frame(FrameOrigin::UnrotatedTexture {
            stored_x: 0,
            stored_y: 0,
        });
        let result = crop_rect("s", &frame, || Err(UnpxError::parse("no height")));
        assert!(result.is_err());
    }
}
