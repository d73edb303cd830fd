//! Output paths for extracted sprites.

use std::path::{Path, PathBuf};

use crate::config::JobConfig;
use crate::error::{Result, UnpxError};

/// Where a sprite is written under `root`.
///
/// Slashes in the sprite name become subdirectories. The configured image
/// extension is appended unless the name already ends with it, and any
/// configured prefix is stripped from the file name.
pub fn sprite_output_path(root: &Path, sprite: &str, config: &JobConfig) -> Result<PathBuf> {
    let invalid = |message: &str| UnpxError::Extract {
        sprite: sprite.to_string(),
        message: message.to_string(),
    };

    if sprite.starts_with('/') {
        return Err(invalid("absolute sprite names are not allowed"));
    }

    let components: Vec<&str> = sprite.split('/').collect();
    let (file, dirs) = components
        .split_last()
        .ok_or_else(|| invalid("empty sprite name"))?;

    let mut path = root.to_path_buf();
    for dir in dirs {
        check_component(dir).map_err(invalid)?;
        path.push(dir);
    }

    let file = strip_prefix(file, &config.strip_prefixes);
    check_component(file).map_err(invalid)?;

    let suffix = format!(".{}", config.image_extension);
    if file.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        path.push(file);
    } else {
        path.push(format!("{}{}", file, suffix));
    }

    Ok(path)
}

fn strip_prefix<'a>(file: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| file.strip_prefix(p.as_str()))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(file)
}

fn check_component(component: &str) -> std::result::Result<(), &'static str> {
    match component {
        "" => Err("sprite name has an empty path component"),
        "." | ".." => Err("sprite name may not contain '.' or '..' components"),
        c if c.contains('\\') || c.contains(':') => {
            Err("sprite name may not contain '\\' or ':'")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(sprite: &str) -> Result<PathBuf> {
        sprite_output_path(Path::new("out"), sprite, &JobConfig::default())
    }

    #[test]
    fn test_appends_extension() {
        assert_eq!(path("hero").unwrap(), PathBuf::from("out/hero.png"));
    }

    #[test]
    fn test_keeps_existing_extension() {
        assert_eq!(path("hero.png").unwrap(), PathBuf::from("out/hero.png"));
        assert_eq!(path("hero.PNG").unwrap(), PathBuf::from("out/hero.PNG"));
    }

    #[test]
    fn test_other_extension_gets_png() {
        assert_eq!(path("hero.jpg").unwrap(), PathBuf::from("out/hero.jpg.png"));
    }

    #[test]
    fn test_slashes_nest() {
        assert_eq!(
            path("chars/hero/idle_0.png").unwrap(),
            PathBuf::from("out/chars/hero/idle_0.png")
        );
    }

    #[test]
    fn test_rejects_escapes() {
        assert!(path("../evil.png").is_err());
        assert!(path("a/../../evil").is_err());
        assert!(path("/etc/passwd").is_err());
        assert!(path("a//b").is_err());
        assert!(path("").is_err());
        assert!(path("C:\\x").is_err());
    }

    #[test]
    fn test_strip_prefix() {
        let config = JobConfig {
            strip_prefixes: vec!["gift_".to_string()],
            ..Default::default()
        };
        assert_eq!(
            sprite_output_path(Path::new("out"), "items/gift_box.png", &config).unwrap(),
            PathBuf::from("out/items/box.png")
        );
        // A name that is only the prefix is kept.
        assert_eq!(
            sprite_output_path(Path::new("out"), "gift_", &config).unwrap(),
            PathBuf::from("out/gift_.png")
        );
    }
}
