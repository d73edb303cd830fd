//! Job configuration.
//!
//! A `JobConfig` is built once per invocation (manifest values overridden by
//! command-line flags) and passed explicitly to the normalizer, resolver and
//! extractor.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::parser::SyntaxKind;

/// Sign convention for the vertical offset of rotated legacy plist sprites.
///
/// Two conventions exist in the wild for the centered-offset encoding. Both
/// are measured in the packed orientation, where the stored offset's axes
/// are already swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RotatedOffsetSign {
    /// Rotated sprites add the vertical offset (non-rotated ones subtract it).
    #[default]
    Preserve,
    /// Rotated sprites subtract the vertical offset, like non-rotated ones.
    Negate,
}

/// How rotated plist frames store their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RotatedOrigin {
    /// The stored corner is the footprint's corner on the texture.
    #[default]
    Packed,
    /// The stored corner is measured in the unrotated texture frame.
    UnrotatedTexture,
}

pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Explicit configuration for one unpack run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Metadata syntax; `None` infers it per file.
    pub syntax: Option<SyntaxKind>,
    pub rotated_offset: RotatedOffsetSign,
    pub rotated_origin: RotatedOrigin,
    /// Extension of the texture file paired with each metadata file.
    pub texture_extension: String,
    /// Extension appended to sprite names that lack it.
    pub image_extension: String,
    /// Output root; `None` writes next to each metadata file.
    pub output: Option<PathBuf>,
    /// Prefixes removed from sprite file names.
    pub strip_prefixes: Vec<String>,
    /// Worker threads for the pixel stage; `None` uses all cores.
    pub threads: Option<usize>,
    /// Compute plans without writing images.
    pub dry_run: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            syntax: None,
            rotated_offset: RotatedOffsetSign::default(),
            rotated_origin: RotatedOrigin::default(),
            texture_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            output: None,
            strip_prefixes: vec![],
            threads: None,
            dry_run: false,
        }
    }
}

impl JobConfig {
    pub fn with_syntax(mut self, syntax: SyntaxKind) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn with_rotated_offset(mut self, sign: RotatedOffsetSign) -> Self {
        self.rotated_offset = sign;
        self
    }

    pub fn with_rotated_origin(mut self, origin: RotatedOrigin) -> Self {
        self.rotated_origin = origin;
        self
    }
}
