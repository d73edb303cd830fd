//! Project manifest (`unpx.yaml`).
//!
//! Holds per-project defaults for unpacking. Every field is optional;
//! command-line flags override whatever the manifest sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{JobConfig, RotatedOffsetSign, RotatedOrigin};
use crate::error::{Result, UnpxError};
use crate::parser::SyntaxKind;

/// Project manifest loaded from `unpx.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Paths scanned when none are given on the command line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Output root. Each sheet unpacks into a directory named after it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Force one metadata syntax instead of inferring it per file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SyntaxKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotated_offset: Option<RotatedOffsetSign>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotated_origin: Option<RotatedOrigin>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strip_prefixes: Vec<String>,

    /// Patterns to exclude from discovery.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| UnpxError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| UnpxError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check unpx.yaml syntax".to_string()),
        })
    }

    /// Build the job configuration these settings describe.
    pub fn job_config(&self) -> Result<JobConfig> {
        let mut config = JobConfig {
            syntax: self.format,
            output: self.output.clone(),
            strip_prefixes: self.strip_prefixes.clone(),
            threads: self.threads,
            ..JobConfig::default()
        };
        if let Some(sign) = self.rotated_offset {
            config.rotated_offset = sign;
        }
        if let Some(origin) = self.rotated_origin {
            config.rotated_origin = origin;
        }
        if let Some(ext) = &self.texture_extension {
            config.texture_extension = normalize_extension("texture_extension", ext)?;
        }
        if let Some(ext) = &self.image_extension {
            config.image_extension = normalize_extension("image_extension", ext)?;
        }
        Ok(config)
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }
}

/// Strip a leading dot and reject empty extensions.
pub fn normalize_extension(field: &str, ext: &str) -> Result<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(UnpxError::Config {
            message: format!("{} '{}' is not a file extension", field, ext),
            help: Some("Use a bare extension such as 'png'".to_string()),
        });
    }
    Ok(trimmed.to_string())
}

/// Simple glob matching: `*.bak`, `dir/*`, `**/dir/*`, or a substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix) || path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.job_config().unwrap(), JobConfig::default());
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
sources:
  - assets/atlases
output: build/sprites
format: plist
texture_extension: .webp
image_extension: png
rotated_offset: negate
rotated_origin: unrotated-texture
strip_prefixes:
  - gift_
excludes:
  - "*.bak"
  - "**/temp/*"
threads: 4
"#;
        let manifest = Manifest::parse(yaml).unwrap();
        assert_eq!(manifest.sources, vec!["assets/atlases"]);
        assert_eq!(manifest.format, Some(SyntaxKind::Plist));

        let config = manifest.job_config().unwrap();
        assert_eq!(config.syntax, Some(SyntaxKind::Plist));
        assert_eq!(config.output, Some(PathBuf::from("build/sprites")));
        assert_eq!(config.texture_extension, "webp");
        assert_eq!(config.rotated_offset, RotatedOffsetSign::Negate);
        assert_eq!(config.rotated_origin, RotatedOrigin::UnrotatedTexture);
        assert_eq!(config.strip_prefixes, vec!["gift_"]);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_unknown_format_is_config_error() {
        let err = Manifest::parse("format: xml").unwrap_err();
        assert!(matches!(err, UnpxError::Config { .. }));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let manifest = Manifest {
            texture_extension: Some(".".to_string()),
            ..Default::default()
        };
        assert!(manifest.job_config().is_err());
    }

    #[test]
    fn test_is_excluded() {
        let manifest = Manifest {
            excludes: vec![
                "*.bak".to_string(),
                "**/node_modules/*".to_string(),
                "vendor/*".to_string(),
            ],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("path/to/file.bak")));
        assert!(manifest.is_excluded(Path::new("node_modules/a.json")));
        assert!(manifest.is_excluded(Path::new("web/node_modules/a.json")));
        assert!(manifest.is_excluded(Path::new("vendor/ui.plist")));
        assert!(!manifest.is_excluded(Path::new("src/ui.plist")));
    }

    #[test]
    fn test_effective_sources() {
        let mut manifest = Manifest::default();
        assert_eq!(manifest.effective_sources(), vec!["."]);
        manifest.sources = vec!["atlases".to_string()];
        assert_eq!(manifest.effective_sources(), vec!["atlases"]);
    }
}
