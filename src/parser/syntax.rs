//! Metadata syntax kinds.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::UnpxError;

/// The outer encoding of a metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxKind {
    Plist,
    Json,
}

impl SyntaxKind {
    /// Order in which extensions are tried when none is given.
    pub const PREFERENCE: [SyntaxKind; 2] = [SyntaxKind::Json, SyntaxKind::Plist];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SyntaxKind::Plist => "plist",
            SyntaxKind::Json => "json",
        }
    }

    /// Infer the syntax from a metadata file's extension.
    pub fn from_path(path: &Path) -> Option<SyntaxKind> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for SyntaxKind {
    type Err = UnpxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        if trimmed.eq_ignore_ascii_case("plist") {
            Ok(SyntaxKind::Plist)
        } else if trimmed.eq_ignore_ascii_case("json") {
            Ok(SyntaxKind::Json)
        } else {
            Err(UnpxError::UnsupportedFormat {
                format: s.to_string(),
            })
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
