//! Finding sprite sheets on disk.
//!
//! A path may name a metadata file, a sheet base without extension
//! (`atlases/ui` finds `atlases/ui.json` or `atlases/ui.plist`), or a
//! directory that is scanned recursively. An optional `unpx.yaml` manifest
//! supplies defaults and exclude patterns.

mod job;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, UnpxError};
use crate::parser::SyntaxKind;

pub use job::{append_extension, SheetJob};
pub use manifest::{normalize_extension, Manifest};
pub use scanner::scan_directory;

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "unpx.yaml";

/// Sheets found for a set of input paths.
#[derive(Debug, Default)]
pub struct Discovery {
    pub jobs: Vec<SheetJob>,
    /// Inputs that could not be paired with metadata. Reported, then skipped.
    pub missing: Vec<UnpxError>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn merge(&mut self, other: Discovery) {
        for job in other.jobs {
            if !self.jobs.contains(&job) {
                self.jobs.push(job);
            }
        }
        self.missing.extend(other.missing);
    }
}

/// Look for `unpx.yaml` next to the first input, then in the working directory.
pub fn find_manifest(paths: &[PathBuf]) -> Result<Option<(PathBuf, Manifest)>> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(first) = paths.first() {
        if first.is_dir() {
            dirs.push(first.clone());
        } else if let Some(parent) = first.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    dirs.push(PathBuf::from("."));

    for dir in dirs {
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        let candidate = dir.join(MANIFEST_FILENAME);
        if candidate.is_file() {
            let manifest = Manifest::load(&candidate)?;
            debug!(path = %candidate.display(), "loaded manifest");
            return Ok(Some((candidate, manifest)));
        }
    }
    Ok(None)
}

/// Discover sheets for every input path, in order, without duplicates.
pub fn discover_all(
    paths: &[PathBuf],
    manifest: &Manifest,
    syntax: Option<SyntaxKind>,
) -> Discovery {
    let mut result = Discovery::default();
    for path in paths {
        result.merge(discover(path, manifest, syntax));
    }
    debug!(
        sheets = result.jobs.len(),
        missing = result.missing.len(),
        "discovery finished"
    );
    result
}

/// Discover sheets for one input path.
pub fn discover(path: &Path, manifest: &Manifest, syntax: Option<SyntaxKind>) -> Discovery {
    if path.is_dir() {
        let jobs = scan_directory(path, manifest, syntax)
            .into_iter()
            .map(|(metadata, kind)| SheetJob::new(metadata, syntax.unwrap_or(kind)))
            .collect();
        return Discovery {
            jobs,
            missing: vec![],
        };
    }

    if path.is_file() {
        match (SyntaxKind::from_path(path), syntax) {
            (_, Some(forced)) => return single(SheetJob::new(path, forced)),
            (Some(kind), None) => return single(SheetJob::new(path, kind)),
            // Probably the texture itself; look for metadata beside it.
            (None, None) => return resolve_base(&path.with_extension(""), None),
        }
    }

    resolve_base(path, syntax)
}

fn single(job: SheetJob) -> Discovery {
    Discovery {
        jobs: vec![job],
        missing: vec![],
    }
}

/// Pair an extension-less base with its metadata file.
fn resolve_base(base: &Path, syntax: Option<SyntaxKind>) -> Discovery {
    let candidates: Vec<SyntaxKind> = match syntax {
        Some(kind) => vec![kind],
        None => SyntaxKind::PREFERENCE.to_vec(),
    };

    for kind in &candidates {
        let metadata = append_extension(base, kind.extension());
        if metadata.is_file() {
            return single(SheetJob {
                base: base.to_path_buf(),
                metadata,
                syntax: *kind,
            });
        }
    }

    Discovery {
        jobs: vec![],
        missing: vec![UnpxError::MissingCompanionFile {
            base: base.to_path_buf(),
            missing: append_extension(base, candidates[0].extension()),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_metadata_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ui.plist");
        fs::write(&path, "").unwrap();

        let found = discover(&path, &Manifest::default(), None);
        assert_eq!(found.jobs, vec![SheetJob::new(&path, SyntaxKind::Plist)]);
        assert!(found.missing.is_empty());
    }

    #[test]
    fn test_discover_base_prefers_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ui.plist"), "").unwrap();
        fs::write(dir.path().join("ui.json"), "{}").unwrap();

        let found = discover(&dir.path().join("ui"), &Manifest::default(), None);
        assert_eq!(found.jobs.len(), 1);
        assert_eq!(found.jobs[0].syntax, SyntaxKind::Json);
        assert_eq!(found.jobs[0].base, dir.path().join("ui"));

        let forced = discover(&dir.path().join("ui"), &Manifest::default(), Some(SyntaxKind::Plist));
        assert_eq!(forced.jobs[0].metadata, dir.path().join("ui.plist"));
    }

    #[test]
    fn test_discover_from_texture_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ui.plist"), "").unwrap();
        fs::write(dir.path().join("ui.png"), "").unwrap();

        let found = discover(&dir.path().join("ui.png"), &Manifest::default(), None);
        assert_eq!(found.jobs.len(), 1);
        assert_eq!(found.jobs[0].metadata, dir.path().join("ui.plist"));
    }

    #[test]
    fn test_discover_missing_base() {
        let dir = tempdir().unwrap();
        let found = discover(&dir.path().join("nothing"), &Manifest::default(), None);
        assert!(found.is_empty());
        assert!(matches!(
            found.missing[0],
            UnpxError::MissingCompanionFile { ref missing, .. } if missing.ends_with("nothing.json")
        ));
    }

    #[test]
    fn test_discover_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("sub/b.plist"), "").unwrap();

        let found = discover(dir.path(), &Manifest::default(), None);
        assert_eq!(found.jobs.len(), 2);
        assert_eq!(found.jobs[1].syntax, SyntaxKind::Plist);
    }

    #[test]
    fn test_discover_all_deduplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, "{}").unwrap();

        let found = discover_all(
            &[path.clone(), dir.path().join("a"), dir.path().to_path_buf()],
            &Manifest::default(),
            None,
        );
        assert_eq!(found.jobs.len(), 1);
    }

    #[test]
    fn test_find_manifest_next_to_input() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "threads: 2\n").unwrap();

        let (path, manifest) = find_manifest(&[dir.path().to_path_buf()]).unwrap().unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILENAME));
        assert_eq!(manifest.threads, Some(2));
    }
}
