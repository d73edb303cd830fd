//! Validation checks for normalized sprite sheets.
//!
//! Each check takes a `&SpriteSheet` and returns a `ValidationResult`.

use crate::resolve::crop_rect;
use crate::types::{Padding, Size, SpriteSheet};

use super::warning::{Diagnostic, ValidationResult};

/// Warn about sheets without any frames.
pub fn check_empty_sheet(sheet: &SpriteSheet) -> ValidationResult {
    let mut result = ValidationResult::new();
    if sheet.is_empty() {
        result.push(
            Diagnostic::warning("unpx::validate::empty-sheet", "Sheet contains no frames")
                .with_help("Nothing will be extracted from this sheet"),
        );
    }
    result
}

/// Check that every crop rectangle lies inside the texture.
pub fn check_frame_bounds(sheet: &SpriteSheet, texture: Size) -> ValidationResult {
    let mut result = ValidationResult::new();

    for named in &sheet.frames {
        let Ok(rect) = crop_rect(&named.name, &named.frame, || Ok(texture.h)) else {
            result.push(
                Diagnostic::error(
                    "unpx::validate::frame-out-of-bounds",
                    format!("Frame cannot be placed on a {}x{} texture", texture.w, texture.h),
                )
                .for_sprite(&named.name),
            );
            continue;
        };

        if !rect.fits_within(texture) {
            result.push(
                Diagnostic::error(
                    "unpx::validate::frame-out-of-bounds",
                    format!(
                        "Frame ({}, {}) {}x{} exceeds the {}x{} texture",
                        rect.x, rect.y, rect.w, rect.h, texture.w, texture.h
                    ),
                )
                .for_sprite(&named.name)
                .with_help("Check that the metadata belongs to this texture"),
            );
        }
    }

    result
}

/// Check that trimmed pixels sit inside their original canvas.
///
/// Both findings are errors: padding cannot be restored for such a sprite.
pub fn check_source_placement(sheet: &SpriteSheet) -> ValidationResult {
    let mut result = ValidationResult::new();

    for named in &sheet.frames {
        let frame = &named.frame;
        let placed = frame.sprite_source_rect;

        if (placed.w, placed.h) != (frame.frame_rect.w, frame.frame_rect.h) {
            result.push(
                Diagnostic::error(
                    "unpx::validate::frame-size-mismatch",
                    format!(
                        "Trimmed size {}x{} differs from frame size {}x{}",
                        placed.w, placed.h, frame.frame_rect.w, frame.frame_rect.h
                    ),
                )
                .for_sprite(&named.name),
            );
            continue;
        }

        if !Padding::around(placed, frame.source_size).is_non_negative() {
            result.push(
                Diagnostic::error(
                    "unpx::validate::source-rect-out-of-canvas",
                    format!(
                        "Trimmed pixels at ({}, {}) escape the {}x{} source canvas",
                        placed.x, placed.y, frame.source_size.w, frame.source_size.h
                    ),
                )
                .for_sprite(&named.name)
                .with_help(
                    "For rotated legacy sprites, try the other --rotated-offset convention",
                ),
            );
        }
    }

    result
}

/// Warn when the metadata declares a different texture size.
pub fn check_canvas_size(sheet: &SpriteSheet, texture: Size) -> ValidationResult {
    let mut result = ValidationResult::new();
    if let Some(declared) = sheet.canvas_size {
        if declared != texture {
            result.push(Diagnostic::warning(
                "unpx::validate::canvas-size-mismatch",
                format!(
                    "Metadata declares a {}x{} texture but the image is {}x{}",
                    declared.w, declared.h, texture.w, texture.h
                ),
            ));
        }
    }
    result
}
