//! Dialect identification.
//!
//! Each metadata syntax has a small, ordered list of structural checks. The
//! first one that matches decides the dialect; extraction then goes through
//! that dialect's own function.

use std::fmt;

use serde::Serialize;

/// A known metadata schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "dialect", content = "format")]
pub enum Dialect {
    /// Plist with `metadata.format == 3` (`textureRect`, `spriteOffset`, ...).
    PlistFormat3,
    /// Plist with `metadata.format == 2` (`frame`, `offset`, ...).
    PlistFormat2,
    /// Plist with a missing or unexpected format number, read as format 2.
    PlistUnknownFormat(Option<i64>),
    /// JSON with `frames` as an array of entries carrying `filename`.
    JsonArray,
    /// JSON with `frames` as an object keyed by sprite name.
    JsonHash,
    /// JSON with a `textures` array of atlases.
    JsonMultiAtlas,
}

impl Dialect {
    /// Identify a plist dialect from its `metadata.format` value.
    pub fn from_plist_format(format: Option<i64>) -> Self {
        match format {
            Some(3) => Dialect::PlistFormat3,
            Some(2) => Dialect::PlistFormat2,
            other => Dialect::PlistUnknownFormat(other),
        }
    }

    pub fn is_plist(self) -> bool {
        matches!(
            self,
            Dialect::PlistFormat3 | Dialect::PlistFormat2 | Dialect::PlistUnknownFormat(_)
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::PlistFormat3 => write!(f, "plist (format 3)"),
            Dialect::PlistFormat2 => write!(f, "plist (format 2)"),
            Dialect::PlistUnknownFormat(Some(n)) => write!(f, "plist (format {}, read as 2)", n),
            Dialect::PlistUnknownFormat(None) => write!(f, "plist (no format, read as 2)"),
            Dialect::JsonArray => write!(f, "json (array)"),
            Dialect::JsonHash => write!(f, "json (hash)"),
            Dialect::JsonMultiAtlas => write!(f, "json (multi-atlas)"),
        }
    }
}

/// Field names used by the plist dialects for the same concepts.
#[derive(Debug, Clone, Copy)]
pub struct PlistFields {
    pub frame: &'static str,
    pub rotated: &'static str,
    pub source_size: &'static str,
    pub offset: &'static str,
}

impl PlistFields {
    pub const FORMAT_2: PlistFields = PlistFields {
        frame: "frame",
        rotated: "rotated",
        source_size: "sourceSize",
        offset: "offset",
    };

    pub const FORMAT_3: PlistFields = PlistFields {
        frame: "textureRect",
        rotated: "textureRotated",
        source_size: "spriteSourceSize",
        offset: "spriteOffset",
    };

    pub fn for_dialect(dialect: Dialect) -> PlistFields {
        match dialect {
            Dialect::PlistFormat3 => PlistFields::FORMAT_3,
            _ => PlistFields::FORMAT_2,
        }
    }
}
