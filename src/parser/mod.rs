//! Metadata normalization.
//!
//! Turns raw sprite sheet metadata in any supported dialect into a
//! canonical [`SpriteSheet`].
//!
//! # Usage
//!
//! ```ignore
//! use unpx::parser::{normalize, SyntaxKind};
//!
//! let bytes = std::fs::read("ui.plist")?;
//! let normalized = normalize(&bytes, SyntaxKind::Plist, &JobConfig::default())?;
//!
//! for frame in &normalized.sheet.frames {
//!     println!("{}: {:?}", frame.name, frame.frame.frame_rect);
//! }
//! ```

mod dialect;
mod frame;
mod json;
mod packed;
mod plist;
mod syntax;

use std::collections::HashSet;

use tracing::debug;

use crate::config::JobConfig;
use crate::error::{Result, UnpxError};
use crate::types::{NamedFrame, SpriteFrame, SpriteSheet};
use crate::validation::ValidationResult;

pub use dialect::{Dialect, PlistFields};
pub use packed::{parse_packed, parse_packed_pair, parse_packed_rect};
pub use syntax::SyntaxKind;

/// Output of a successful normalization.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub sheet: SpriteSheet,
    pub dialect: Dialect,
    /// Non-fatal findings made while reading the metadata.
    pub diagnostics: ValidationResult,
}

/// Normalize metadata bytes of the given syntax.
pub fn normalize(bytes: &[u8], syntax: SyntaxKind, config: &JobConfig) -> Result<Normalized> {
    let mut diagnostics = ValidationResult::new();

    let (dialect, sheet) = match syntax {
        SyntaxKind::Plist => plist::normalize_plist(bytes, config, &mut diagnostics)?,
        SyntaxKind::Json => json::normalize_json(bytes, config, &mut diagnostics)?,
    };

    debug!(%dialect, frames = sheet.len(), "normalized sprite sheet");

    Ok(Normalized {
        sheet,
        dialect,
        diagnostics,
    })
}

/// Normalize metadata whose syntax is given as a string (`"plist"`, `"json"`).
pub fn normalize_str(bytes: &[u8], syntax: &str, config: &JobConfig) -> Result<Normalized> {
    normalize(bytes, syntax.parse()?, config)
}

/// Collects frames in order while rejecting duplicate names.
pub(crate) struct SheetBuilder {
    frames: Vec<NamedFrame>,
    seen: HashSet<String>,
}

impl SheetBuilder {
    pub(crate) fn new() -> Self {
        Self {
            frames: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub(crate) fn push(&mut self, name: &str, frame: SpriteFrame) -> Result<()> {
        if !self.seen.insert(name.to_string()) {
            return Err(UnpxError::Parse {
                message: format!("Duplicate sprite name '{}'", name),
                help: Some("Sprite names must be unique within a sheet".to_string()),
            });
        }
        self.frames.push(NamedFrame {
            name: name.to_string(),
            frame,
        });
        Ok(())
    }

    pub(crate) fn finish(self) -> SpriteSheet {
        SpriteSheet {
            frames: self.frames,
            canvas_size: None,
            texture: None,
        }
    }
}
