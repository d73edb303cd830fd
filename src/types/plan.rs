//! Per-sprite extraction plans.

use serde::Serialize;

use super::geometry::{Padding, Rect, Size};

/// Everything the pixel stage needs for one sprite.
///
/// Applied as: crop `crop_rect` from the texture, turn the pixels 90°
/// counter-clockwise when `rotated`, then pad by `padding` to reach
/// `output_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionPlan {
    pub name: String,
    /// Region of the texture to copy.
    pub crop_rect: Rect,
    /// Padding in the sprite's natural orientation.
    pub padding: Padding,
    pub rotated: bool,
    /// Final image size in the sprite's natural orientation.
    pub output_size: Size,
}

impl ExtractionPlan {
    /// Size of the cropped pixels after undoing the packing rotation.
    pub fn unrotated_crop_size(&self) -> Size {
        if self.rotated {
            self.crop_rect.size().swapped()
        } else {
            self.crop_rect.size()
        }
    }
}
