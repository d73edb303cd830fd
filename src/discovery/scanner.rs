//! Recursive scan for sprite sheet metadata files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::parser::SyntaxKind;

use super::manifest::Manifest;

/// Find metadata files under `root`, sorted by path.
///
/// With `syntax` set only that extension is collected; otherwise both
/// `.json` and `.plist` files are.
pub fn scan_directory(
    root: &Path,
    manifest: &Manifest,
    syntax: Option<SyntaxKind>,
) -> Vec<(PathBuf, SyntaxKind)> {
    if !root.exists() {
        return vec![];
    }

    let mut found: Vec<(PathBuf, SyntaxKind)> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !manifest.is_excluded(e.path()))
        .filter_map(|e| {
            let kind = SyntaxKind::from_path(e.path())?;
            match syntax {
                Some(wanted) if wanted != kind => None,
                _ => Some((e.into_path(), kind)),
            }
        })
        .collect();

    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_recursive_and_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ui/menus")).unwrap();
        fs::write(dir.path().join("ui/menus/main.plist"), "").unwrap();
        fs::write(dir.path().join("chars.json"), "{}").unwrap();
        fs::write(dir.path().join("chars.png"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = scan_directory(dir.path(), &Manifest::default(), None);
        assert_eq!(
            found,
            vec![
                (dir.path().join("chars.json"), SyntaxKind::Json),
                (dir.path().join("ui/menus/main.plist"), SyntaxKind::Plist),
            ]
        );
    }

    #[test]
    fn test_scan_with_syntax_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("b.plist"), "").unwrap();

        let found = scan_directory(dir.path(), &Manifest::default(), Some(SyntaxKind::Plist));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, SyntaxKind::Plist);
    }

    #[test]
    fn test_scan_with_excludes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("backup")).unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("backup/old.json"), "{}").unwrap();

        let manifest = Manifest {
            excludes: vec!["**/backup/*".to_string()],
            ..Default::default()
        };
        let found = scan_directory(dir.path(), &manifest, None);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        assert!(scan_directory(Path::new("/nonexistent/path"), &Manifest::default(), None).is_empty());
    }
}
