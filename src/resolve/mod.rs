//! Geometry resolution.
//!
//! Turns a canonical [`SpriteSheet`] into one [`ExtractionPlan`] per sprite.
//! Plans are independent of each other and computed in parallel; a sprite
//! with inconsistent geometry yields an error without affecting the rest.

mod crop;
mod restore;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, UnpxError};
use crate::types::{ExtractionPlan, NamedFrame, Size, SpriteSheet};

pub use crop::crop_rect;
pub use restore::restore_padding;

/// Compute the extraction plan for a single sprite.
pub fn resolve_frame(
    named: &NamedFrame,
    texture_height: impl FnOnce() -> Result<u32>,
) -> Result<ExtractionPlan> {
    let frame = &named.frame;
    let crop = crop_rect(&named.name, frame, texture_height)?;
    let padding = restore_padding(&named.name, frame)?;

    Ok(ExtractionPlan {
        name: named.name.clone(),
        crop_rect: crop,
        padding,
        rotated: frame.rotated,
        output_size: frame.natural_size(),
    })
}

/// Compute plans for every sprite in document order.
///
/// `texture_size` is called at most once, and only when a sprite's crop
/// rectangle depends on the texture height. When it fails, the size declared
/// by the metadata is used instead, if any.
pub fn resolve_sheet<F>(sheet: &SpriteSheet, texture_size: F) -> Vec<Result<ExtractionPlan>>
where
    F: FnOnce() -> Result<Size>,
{
    let height: std::result::Result<u32, String> = if sheet.needs_texture_size() {
        match texture_size() {
            Ok(size) => Ok(size.h),
            Err(err) => match sheet.canvas_size {
                Some(size) => {
                    debug!(error = %err, "using declared canvas size for texture height");
                    Ok(size.h)
                }
                None => Err(err.to_string()),
            },
        }
    } else {
        Err("texture height not loaded".to_string())
    };

    let plans: Vec<Result<ExtractionPlan>> = sheet
        .frames
        .par_iter()
        .map(|named| {
            resolve_frame(named, || {
                height.clone().map_err(|message| UnpxError::InvalidGeometry {
                    sprite: named.name.clone(),
                    message: format!("texture height unavailable: {}", message),
                })
            })
        })
        .collect();

    debug!(
        sprites = plans.len(),
        failed = plans.iter().filter(|p| p.is_err()).count(),
        "resolved extraction plans"
    );

    plans
}
