//! Init command implementation.
//!
//! Generates an `unpx.yaml` manifest for a directory of sprite sheets.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{RotatedOffsetSign, RotatedOrigin};
use crate::discovery::{discover, Manifest, MANIFEST_FILENAME};
use crate::error::{Result, UnpxError};
use crate::output::{display_path, plural, Printer};

/// Initialize a project by generating an unpx.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output root written to the manifest
    #[arg(long, default_value = "sprites")]
    pub output: PathBuf,

    /// Overwrite an existing unpx.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(UnpxError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let discovery = discover(&args.path, &Manifest::default(), None);

    let mut source_dirs = BTreeSet::new();
    let mut formats = BTreeSet::new();
    for job in &discovery.jobs {
        formats.insert(job.syntax.extension());
        if let Some(parent) = job.metadata.parent() {
            source_dirs.insert(relative_dir(parent, &args.path));
        }
    }

    let manifest = Manifest {
        sources: if source_dirs.len() == 1 && source_dirs.contains(".") {
            vec![]
        } else {
            source_dirs.iter().cloned().collect()
        },
        output: Some(args.output.clone()),
        ..Manifest::default()
    };

    let yaml = render_manifest(&manifest)?;
    fs::write(&manifest_path, yaml).map_err(|e| UnpxError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !formats.is_empty() {
        let list: Vec<&str> = formats.into_iter().collect();
        printer.info("Formats", &list.join(", "));
    }
    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(discovery.jobs.len(), "sprite sheet", "sprite sheets")
        ),
    );

    Ok(())
}

fn relative_dir(dir: &Path, root: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        format!("{}/", relative.display())
    }
}

/// Manifest YAML followed by commented-out geometry options.
fn render_manifest(manifest: &Manifest) -> Result<String> {
    let mut yaml = serde_yaml::to_string(manifest).map_err(|e| UnpxError::Config {
        message: format!("Failed to encode manifest: {}", e),
        help: None,
    })?;

    yaml.push_str(&format!(
        "# texture_extension: png\n# rotated_offset: {}\n# rotated_origin: {}\n# strip_prefixes: []\n# excludes: []\n",
        option_name(RotatedOffsetSign::Negate),
        option_name(RotatedOrigin::UnrotatedTexture),
    ));
    Ok(yaml)
}

fn option_name<T: clap::ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}
