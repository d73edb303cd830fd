//! unpx - Sprite sheet unpacker
//!
//! Reads texture-atlas metadata (Apple plist formats 2 and 3, JSON array,
//! hash and multi-atlas layouts) and restores every packed sprite to its
//! own image at its original size, undoing trimming and rotation.
//!
//! The pipeline has three stages:
//!
//! 1. [`parser::normalize`] turns metadata bytes into a canonical [`SpriteSheet`].
//! 2. [`resolve::resolve_sheet`] computes one [`ExtractionPlan`] per sprite.
//! 3. [`render::unpack_sheet`] crops, unrotates, pads and writes the images.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod types;
pub mod validation;

pub use config::{JobConfig, RotatedOffsetSign, RotatedOrigin};
pub use discovery::{discover, discover_all, Discovery, Manifest, SheetJob};
pub use error::{Result, UnpxError};
pub use parser::{normalize, normalize_str, Dialect, Normalized, SyntaxKind};
pub use render::{extract_sprite, unpack_sheet, SheetReport};
pub use resolve::{resolve_frame, resolve_sheet};
pub use types::{
    ExtractionPlan, FrameOrigin, NamedFrame, Padding, Rect, Size, SourceRect, SpriteFrame,
    SpriteSheet,
};
pub use validation::{validate_sheet, Diagnostic, Severity, ValidationResult};
