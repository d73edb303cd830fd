//! Assembly of canonical frames from dialect-specific readings.

use crate::config::{JobConfig, RotatedOffsetSign};
use crate::error::{Result, UnpxError};
use crate::types::{FrameOrigin, Rect, Size, SourceRect, SpriteFrame};
use crate::validation::{Diagnostic, ValidationResult};

/// How a dialect describes where trimmed pixels sit in the original canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Displacement of the content's center from the canvas center, y-up.
    CenterOffset { x: i64, y: i64 },
    /// Explicit rectangle in the natural orientation, y-down.
    Rect(SourceRect),
    /// Content is centered.
    Centered,
}

/// A frame as read from the metadata, before any orientation handling.
///
/// Sizes are in the sprite's natural orientation, which is how every
/// supported dialect writes them.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub rotated: bool,
    pub source_size: Option<(i64, i64)>,
    pub placement: Placement,
    /// Explicit trim flag, when the dialect has one.
    pub trimmed: Option<bool>,
    /// The stored corner is relative to the unrotated texture frame.
    pub unrotated_origin: bool,
}

impl RawFrame {
    /// Convert into a canonical frame, reporting inconsistencies.
    pub fn into_frame(
        self,
        name: &str,
        config: &JobConfig,
        diagnostics: &mut ValidationResult,
    ) -> Result<SpriteFrame> {
        let x = non_negative(name, "frame x", self.x)?;
        let y = non_negative(name, "frame y", self.y)?;
        let w = positive(name, "frame width", self.w)?;
        let h = positive(name, "frame height", self.h)?;
        let natural = Size::new(w, h);

        let canvas = match self.source_size {
            Some((sw, sh)) => Size::new(
                positive(name, "source width", sw)?,
                positive(name, "source height", sh)?,
            ),
            None => natural,
        };

        let placement = match self.placement {
            Placement::Rect(rect) => rect,
            Placement::Centered => centered(natural, canvas, 0, 0),
            Placement::CenterOffset { x: ox, y: oy } => {
                let ox = if self.rotated && config.rotated_offset == RotatedOffsetSign::Negate {
                    -ox
                } else {
                    ox
                };
                centered(natural, canvas, ox, -oy)
            }
        };

        let geometric_trim = natural != canvas || placement != SourceRect::full(canvas);
        let trimmed = match self.trimmed {
            Some(false) if geometric_trim => {
                diagnostics.push(
                    Diagnostic::warning(
                        "unpx::normalize::untrimmed-mismatch",
                        format!(
                            "Marked untrimmed but the {}x{} frame does not fill its {}x{} source",
                            natural.w, natural.h, canvas.w, canvas.h
                        ),
                    )
                    .for_sprite(name)
                    .with_help("The sprite is restored as trimmed"),
                );
                true
            }
            Some(flag) => flag,
            None => geometric_trim,
        };

        let origin = if self.rotated && self.unrotated_origin {
            FrameOrigin::UnrotatedTexture {
                stored_x: x,
                stored_y: y,
            }
        } else {
            FrameOrigin::Packed
        };

        let frame = if self.rotated {
            SpriteFrame {
                frame_rect: Rect::new(x, y, h, w),
                rotated: true,
                trimmed,
                source_size: canvas.swapped(),
                sprite_source_rect: placement.rotated_cw(canvas),
                origin,
            }
        } else {
            SpriteFrame {
                frame_rect: Rect::new(x, y, w, h),
                rotated: false,
                trimmed,
                source_size: canvas,
                sprite_source_rect: placement,
                origin,
            }
        };

        Ok(frame)
    }
}

/// Placement of `content` inside `canvas`, shifted by `(dx, dy)` (y-down).
fn centered(content: Size, canvas: Size, dx: i64, dy: i64) -> SourceRect {
    let left = (canvas.w as i64 - content.w as i64).div_euclid(2) + dx;
    let top = (canvas.h as i64 - content.h as i64).div_euclid(2) + dy;
    SourceRect::new(left, top, content.w, content.h)
}

fn non_negative(name: &str, what: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| UnpxError::Parse {
        message: format!("Sprite '{}' has invalid {} {}", name, what, value),
        help: Some("Coordinates must be non-negative".to_string()),
    })
}

fn positive(name: &str, what: &str, value: i64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(UnpxError::Parse {
            message: format!("Sprite '{}' has invalid {} {}", name, what, value),
            help: Some("Sizes must be at least 1 pixel".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(w: i64, h: i64, rotated: bool, source: (i64, i64), placement: Placement) -> RawFrame {
        RawFrame {
            x: 2,
            y: 3,
            w,
            h,
            rotated,
            source_size: Some(source),
            placement,
            trimmed: None,
            unrotated_origin: false,
        }
    }

    fn convert(raw: RawFrame, config: &JobConfig) -> (SpriteFrame, ValidationResult) {
        let mut diagnostics = ValidationResult::new();
        let frame = raw.into_frame("s", config, &mut diagnostics).unwrap();
        (frame, diagnostics)
    }

    #[test]
    fn test_untrimmed_offset_frame() {
        let (frame, diags) = convert(
            raw(10, 10, false, (10, 10), Placement::CenterOffset { x: 0, y: 0 }),
            &JobConfig::default(),
        );
        assert_eq!(frame.frame_rect, Rect::new(2, 3, 10, 10));
        assert_eq!(frame.sprite_source_rect, SourceRect::new(0, 0, 10, 10));
        assert!(!frame.trimmed);
        assert!(diags.is_clean());
    }

    #[test]
    fn test_offset_is_y_up() {
        // Content 4x4 in 10x10, shifted right by 1 and up by 2.
        let (frame, _) = convert(
            raw(4, 4, false, (10, 10), Placement::CenterOffset { x: 1, y: 2 }),
            &JobConfig::default(),
        );
        assert_eq!(frame.sprite_source_rect, SourceRect::new(4, 1, 4, 4));
        assert!(frame.trimmed);
    }

    #[test]
    fn test_rotated_swaps_frame_and_source() {
        let (frame, _) = convert(
            raw(6, 4, true, (8, 10), Placement::Centered),
            &JobConfig::default(),
        );
        assert_eq!(frame.frame_rect, Rect::new(2, 3, 4, 6));
        assert_eq!(frame.source_size, Size::new(10, 8));
        assert_eq!(frame.natural_size(), Size::new(8, 10));
        // Natural placement (1,3,6,4) turned clockwise in an 8x10 canvas.
        assert_eq!(frame.sprite_source_rect, SourceRect::new(3, 1, 4, 6));
    }

    #[test]
    fn test_rotated_offset_sign_negate() {
        let placement = Placement::CenterOffset { x: 1, y: 0 };
        let (preserve, _) = convert(raw(4, 4, true, (8, 8), placement), &JobConfig::default());
        let (negate, _) = convert(
            raw(4, 4, true, (8, 8), placement),
            &JobConfig::default().with_rotated_offset(RotatedOffsetSign::Negate),
        );
        // Natural left of 3 vs 1 ends up as the packed top.
        assert_eq!(preserve.sprite_source_rect.y, 3);
        assert_eq!(negate.sprite_source_rect.y, 1);
    }

    #[test]
    fn test_negate_leaves_unrotated_alone() {
        let placement = Placement::CenterOffset { x: 1, y: 1 };
        let (a, _) = convert(raw(4, 4, false, (8, 8), placement), &JobConfig::default());
        let (b, _) = convert(
            raw(4, 4, false, (8, 8), placement),
            &JobConfig::default().with_rotated_offset(RotatedOffsetSign::Negate),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_untrimmed_flag_mismatch_warns() {
        let mut r = raw(4, 4, false, (8, 8), Placement::Centered);
        r.trimmed = Some(false);
        let (frame, diags) = convert(r, &JobConfig::default());
        assert!(frame.trimmed);
        assert!(diags.contains_code("unpx::normalize::untrimmed-mismatch"));
    }

    #[test]
    fn test_unrotated_origin_only_for_rotated() {
        let mut r = raw(4, 6, false, (4, 6), Placement::Centered);
        r.unrotated_origin = true;
        let (plain, _) = convert(r, &JobConfig::default());
        assert_eq!(plain.origin, FrameOrigin::Packed);

        r.rotated = true;
        let (rotated, _) = convert(r, &JobConfig::default());
        assert_eq!(
            rotated.origin,
            FrameOrigin::UnrotatedTexture {
                stored_x: 2,
                stored_y: 3
            }
        );
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut diagnostics = ValidationResult::new();
        let result = raw(0, 4, false, (4, 4), Placement::Centered).into_frame(
            "empty",
            &JobConfig::default(),
            &mut diagnostics,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_coordinate_rejected() {
        let mut r = raw(4, 4, false, (4, 4), Placement::Centered);
        r.x = -1;
        let mut diagnostics = ValidationResult::new();
        assert!(r
            .into_frame("neg", &JobConfig::default(), &mut diagnostics)
            .is_err());
    }
}
