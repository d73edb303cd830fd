//! Pixel extraction: crop, unrotate, pad.

use image::{imageops, RgbaImage};

use crate::error::{Result, UnpxError};
use crate::types::{ExtractionPlan, Size};

/// Produce one sprite image from the packed texture.
///
/// The crop is turned 90° counter-clockwise when the sprite was packed
/// rotated, then placed on a transparent canvas of the original size.
pub fn extract_sprite(texture: &RgbaImage, plan: &ExtractionPlan) -> Result<RgbaImage> {
    let fail = |message: String| UnpxError::Extract {
        sprite: plan.name.clone(),
        message,
    };

    let bounds = Size::new(texture.width(), texture.height());
    let crop = plan.crop_rect;
    if !crop.fits_within(bounds) {
        return Err(fail(format!(
            "crop ({}, {}) {}x{} exceeds the {}x{} texture",
            crop.x, crop.y, crop.w, crop.h, bounds.w, bounds.h
        )));
    }

    let cropped = imageops::crop_imm(texture, crop.x, crop.y, crop.w, crop.h).to_image();
    let oriented = if plan.rotated {
        imageops::rotate270(&cropped)
    } else {
        cropped
    };

    let pad = plan.padding;
    if !pad.is_non_negative()
        || oriented.width() as i64 + pad.horizontal() != plan.output_size.w as i64
        || oriented.height() as i64 + pad.vertical() != plan.output_size.h as i64
    {
        return Err(fail(format!(
            "padding {:?} does not restore {}x{}",
            pad, plan.output_size.w, plan.output_size.h
        )));
    }

    if pad.is_zero() {
        return Ok(oriented);
    }

    let mut canvas = RgbaImage::new(plan.output_size.w, plan.output_size.h);
    imageops::replace(&mut canvas, &oriented, pad.left, pad.top);
    Ok(canvas)
}
