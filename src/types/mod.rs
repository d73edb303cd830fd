//! Core domain types for unpx.
//!
//! - `Rect`, `Size`, `SourceRect`, `Padding` - pixel geometry
//! - `SpriteFrame`, `SpriteSheet` - the canonical, dialect-free metadata
//! - `ExtractionPlan` - what the pixel stage does for one sprite

mod geometry;
mod plan;
mod sheet;

pub use geometry::{Padding, Rect, Size, SourceRect};
pub use plan::ExtractionPlan;
pub use sheet::{FrameOrigin, NamedFrame, SpriteFrame, SpriteSheet};
