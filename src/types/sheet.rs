//! Canonical sprite sheet metadata.
//!
//! Every dialect normalizes into these types. Fields describe the sprite as
//! it lies on the texture: for rotated sprites `frame_rect` is the rotated
//! footprint and `source_size` / `sprite_source_rect` are expressed in the
//! correspondingly swapped canvas.

use serde::Serialize;

use super::geometry::{Rect, Size, SourceRect};

/// Where a frame's stored top-left corner is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum FrameOrigin {
    /// Stored coordinates are the footprint's corner on the texture.
    #[default]
    Packed,
    /// Stored coordinates are relative to the unrotated texture frame and
    /// need the texture height to be turned into a crop rectangle.
    UnrotatedTexture { stored_x: u32, stored_y: u32 },
}

/// One sprite after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteFrame {
    /// Footprint of the packed pixels on the texture.
    pub frame_rect: Rect,
    /// Pixels are stored turned 90° clockwise.
    pub rotated: bool,
    /// Transparent borders were removed before packing.
    pub trimmed: bool,
    /// Original canvas size (swapped when rotated).
    pub source_size: Size,
    /// Placement of the packed pixels within `source_size`.
    pub sprite_source_rect: SourceRect,
    #[serde(skip_serializing_if = "is_packed")]
    pub origin: FrameOrigin,
}

fn is_packed(origin: &FrameOrigin) -> bool {
    *origin == FrameOrigin::Packed
}

impl SpriteFrame {
    /// An untrimmed, unrotated sprite occupying `frame_rect`.
    pub fn untrimmed(frame_rect: Rect) -> Self {
        let size = frame_rect.size();
        Self {
            frame_rect,
            rotated: false,
            trimmed: false,
            source_size: size,
            sprite_source_rect: SourceRect::full(size),
            origin: FrameOrigin::Packed,
        }
    }

    /// Size of the restored sprite in its natural orientation.
    pub fn natural_size(&self) -> Size {
        if self.rotated {
            self.source_size.swapped()
        } else {
            self.source_size
        }
    }
}

/// A sprite frame with its name from the metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedFrame {
    pub name: String,
    #[serde(flatten)]
    pub frame: SpriteFrame,
}

/// A whole normalized sprite sheet document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSheet {
    /// Frames in document order. Names are unique.
    pub frames: Vec<NamedFrame>,
    /// Texture size declared by the metadata, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_size: Option<Size>,
    /// Texture file name declared by the metadata, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

impl SpriteSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Look up a frame by sprite name.
    pub fn get(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.frame)
    }

    /// Iterate over sprite names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    /// Whether any frame needs the texture size to compute its crop.
    pub fn needs_texture_size(&self) -> bool {
        self.frames
            .iter()
            .any(|f| f.frame.rotated && f.frame.origin != FrameOrigin::Packed)
    }
}
