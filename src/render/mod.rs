//! Pixel stage: turns extraction plans into image files.

mod extract;
mod path;

pub use extract::extract_sprite;
pub use path::sprite_output_path;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::JobConfig;
use crate::error::{Result, UnpxError};
use crate::types::{ExtractionPlan, Size};

/// Outcome of one sprite in the pixel stage.
#[derive(Debug)]
pub struct SpriteOutput {
    pub name: String,
    pub result: Result<PathBuf>,
}

/// Outcome of unpacking one sheet.
#[derive(Debug, Default)]
pub struct SheetReport {
    pub sprites: Vec<SpriteOutput>,
}

impl SheetReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.sprites
            .iter()
            .filter_map(|s| s.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &UnpxError)> {
        self.sprites
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.name.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.written().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Decode a texture into RGBA.
pub fn load_texture(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|e| UnpxError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to decode texture: {}", e),
    })?;
    Ok(image.to_rgba8())
}

/// Texture dimensions read from the file header without decoding pixels.
pub fn texture_size(path: &Path) -> Result<Size> {
    let (w, h) = image::image_dimensions(path).map_err(|e| UnpxError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read texture size: {}", e),
    })?;
    Ok(Size::new(w, h))
}

/// Extract and write every planned sprite under `root`.
///
/// `texture` is `None` only for dry runs, which report the target paths
/// without touching the filesystem. Output keeps the order of `plans`.
/// A sprite whose output path was already claimed by an earlier sprite
/// fails; paths are compared case-insensitively.
pub fn unpack_sheet(
    texture: Option<&RgbaImage>,
    plans: Vec<(String, Result<ExtractionPlan>)>,
    root: &Path,
    config: &JobConfig,
) -> Result<SheetReport> {
    let pool = build_thread_pool(config.threads)?;
    let targets = claim_output_paths(plans, root, config);
    let sprites = pool.install(|| {
        targets
            .into_par_iter()
            .map(|(name, target)| {
                let result =
                    target.and_then(|(plan, path)| write_sprite(texture, &plan, path));
                SpriteOutput { name, result }
            })
            .collect::<Vec<_>>()
    });

    debug!(
        root = %root.display(),
        sprites = sprites.len(),
        "pixel stage finished"
    );
    Ok(SheetReport { sprites })
}

type Target = Result<(ExtractionPlan, PathBuf)>;

fn claim_output_paths(
    plans: Vec<(String, Result<ExtractionPlan>)>,
    root: &Path,
    config: &JobConfig,
) -> Vec<(String, Target)> {
    let mut claimed: HashMap<String, String> = HashMap::new();
    plans
        .into_iter()
        .map(|(name, plan)| {
            let target = plan.and_then(|plan| {
                let path = sprite_output_path(root, &plan.name, config)?;
                let key = path.to_string_lossy().to_lowercase();
                if let Some(first) = claimed.get(&key) {
                    return Err(UnpxError::Extract {
                        sprite: plan.name.clone(),
                        message: format!(
                            "output {} is already taken by sprite '{}'",
                            path.display(),
                            first
                        ),
                    });
                }
                claimed.insert(key, plan.name.clone());
                Ok((plan, path))
            });
            (name, target)
        })
        .collect()
}

fn write_sprite(texture: Option<&RgbaImage>, plan: &ExtractionPlan, path: PathBuf) -> Result<PathBuf> {
    let Some(texture) = texture else {
        return Ok(path);
    };

    let image = extract_sprite(texture, plan)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| UnpxError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    image.save(&path).map_err(|e| UnpxError::Extract {
        sprite: plan.name.clone(),
        message: format!("cannot write {}: {}", path.display(), e),
    })?;

    trace!(sprite = %plan.name, path = %path.display(), "wrote sprite");
    Ok(path)
}

fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        if n == 0 {
            return Err(UnpxError::Config {
                message: "threads must be at least 1".to_string(),
                help: Some("Omit the setting to use every core".to_string()),
            });
        }
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| UnpxError::Config {
        message: format!("cannot start worker pool: {}", e),
        help: None,
    })
}
