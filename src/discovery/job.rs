//! One unit of work: a metadata file and its texture.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::JobConfig;
use crate::error::{Result, UnpxError};
use crate::parser::{self, Normalized, SyntaxKind};
use crate::types::SpriteSheet;

/// A sprite sheet found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetJob {
    /// Metadata path without its extension.
    pub base: PathBuf,
    pub metadata: PathBuf,
    pub syntax: SyntaxKind,
}

impl SheetJob {
    pub fn new(metadata: impl Into<PathBuf>, syntax: SyntaxKind) -> Self {
        let metadata = metadata.into();
        Self {
            base: metadata.with_extension(""),
            metadata,
            syntax,
        }
    }

    /// Sheet name used for its output directory.
    pub fn name(&self) -> String {
        self.base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string())
    }

    /// Conventional texture path: `<base>.<texture_extension>`.
    pub fn texture_candidate(&self, config: &JobConfig) -> PathBuf {
        append_extension(&self.base, &config.texture_extension)
    }

    /// Directory the sprites of this sheet are written to.
    pub fn output_dir(&self, config: &JobConfig) -> PathBuf {
        match &config.output {
            Some(root) => root.join(self.name()),
            None => self.base.clone(),
        }
    }

    pub fn read_metadata(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.metadata).map_err(|e| UnpxError::Io {
            path: self.metadata.clone(),
            message: e.to_string(),
        })
    }

    pub fn normalize(&self, config: &JobConfig) -> Result<Normalized> {
        let bytes = self.read_metadata()?;
        parser::normalize(&bytes, self.syntax, config)
    }

    /// Parse the metadata as a sheet, unless it is not one.
    ///
    /// A file that fails to parse and has no conventional texture next to it
    /// is an unrelated document (`package.json`, settings) and reports
    /// `MissingCompanionFile` so callers skip it like any texture-less sheet.
    pub fn load(&self, config: &JobConfig) -> Result<Normalized> {
        match self.normalize(config) {
            Err(err @ (UnpxError::UnrecognizedSchema { .. } | UnpxError::Parse { .. }))
                if !self.texture_candidate(config).is_file() =>
            {
                debug!(metadata = %self.metadata.display(), %err, "not a sprite sheet");
                Err(self.missing_texture(config))
            }
            other => other,
        }
    }

    /// Find the texture for this sheet.
    ///
    /// The conventional companion path wins. Otherwise the texture file
    /// named inside the metadata is tried relative to the metadata file.
    pub fn locate_texture(&self, sheet: &SpriteSheet, config: &JobConfig) -> Result<PathBuf> {
        let candidate = self.texture_candidate(config);
        if candidate.is_file() {
            return Ok(candidate);
        }

        if let Some(declared) = &sheet.texture {
            let dir = self.metadata.parent().unwrap_or_else(|| Path::new(""));
            let path = dir.join(declared);
            if path.is_file() {
                return Ok(path);
            }
        }

        Err(self.missing_texture(config))
    }

    fn missing_texture(&self, config: &JobConfig) -> UnpxError {
        UnpxError::MissingCompanionFile {
            base: self.base.clone(),
            missing: self.texture_candidate(config),
        }
    }
}

/// `ui.v2` + `png` → `ui.v2.png`.
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}
