pub mod completions;
pub mod init;
pub mod inspect;
pub mod list;
pub mod unpack;
pub mod validate;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{JobConfig, RotatedOffsetSign, RotatedOrigin};
use crate::discovery::{
    discover_all, find_manifest, normalize_extension, Discovery, Manifest,
};
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::parser::SyntaxKind;

/// unpx - Sprite sheet unpacker
#[derive(Parser, Debug)]
#[command(name = "unpx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// More output (-v per-sprite lines, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract every sprite of one or more sheets into image files
    Unpack(unpack::UnpackArgs),

    /// Print normalized frames and extraction plans as JSON
    Inspect(inspect::InspectArgs),

    /// Check sheets for inconsistent geometry without extracting
    Validate(validate::ValidateArgs),

    /// List discovered sprite sheets
    List(list::ListArgs),

    /// Initialize a project (generates unpx.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Inputs and geometry options shared by the sheet commands.
#[derive(Args, Debug, Default)]
pub struct SheetArgs {
    /// Metadata files, sheet bases without extension, or directories
    /// (default: manifest sources, or the current directory)
    pub paths: Vec<PathBuf>,

    /// Metadata syntax (inferred from the file extension by default)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<SyntaxKind>,

    /// Texture extension paired with each metadata file
    #[arg(long, value_name = "EXT")]
    pub texture_ext: Option<String>,

    /// Vertical offset sign for rotated centered-offset sprites
    #[arg(long, value_enum)]
    pub rotated_offset: Option<RotatedOffsetSign>,

    /// How rotated plist frames store their corner
    #[arg(long, value_enum)]
    pub rotated_origin: Option<RotatedOrigin>,
}

/// Resolved inputs for one command invocation.
#[derive(Debug)]
pub struct SheetContext {
    pub config: JobConfig,
    pub manifest: Manifest,
    pub paths: Vec<PathBuf>,
}

impl SheetArgs {
    /// Load the manifest (if any) and apply command-line overrides.
    pub fn context(&self, printer: &Printer) -> Result<SheetContext> {
        let (manifest_dir, manifest) = match find_manifest(&self.paths)? {
            Some((path, manifest)) => {
                printer.detail("Manifest", &display_path(&path));
                let dir = path.parent().map(PathBuf::from).unwrap_or_default();
                (dir, manifest)
            }
            None => (PathBuf::new(), Manifest::default()),
        };

        let mut config = manifest.job_config()?;
        config.output = config.output.map(|out| manifest_dir.join(out));
        if let Some(format) = self.format {
            config.syntax = Some(format);
        }
        if let Some(ext) = &self.texture_ext {
            config.texture_extension = normalize_extension("--texture-ext", ext)?;
        }
        if let Some(sign) = self.rotated_offset {
            config.rotated_offset = sign;
        }
        if let Some(origin) = self.rotated_origin {
            config.rotated_origin = origin;
        }

        let paths = if self.paths.is_empty() {
            manifest
                .effective_sources()
                .into_iter()
                .map(|source| manifest_dir.join(source))
                .collect()
        } else {
            self.paths.clone()
        };

        Ok(SheetContext {
            config,
            manifest,
            paths,
        })
    }
}

impl SheetContext {
    /// Discover sheets and report inputs that could not be paired.
    pub fn discover(&self, printer: &Printer) -> Discovery {
        let discovery = discover_all(&self.paths, &self.manifest, self.config.syntax);
        for missing in &discovery.missing {
            printer.warning("Skipping", &missing.to_string());
        }
        if discovery.is_empty() && discovery.missing.is_empty() {
            printer.warning("Nothing", "no sprite sheets found");
        }
        discovery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_unpack_flags() {
        let cli = Cli::parse_from([
            "unpx",
            "-vv",
            "unpack",
            "atlases/ui",
            "--format",
            "plist",
            "--rotated-offset",
            "negate",
            "--rotated-origin",
            "unrotated-texture",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Unpack(args) = cli.command else {
            panic!("expected unpack");
        };
        assert_eq!(args.sheet.paths, vec![PathBuf::from("atlases/ui")]);
        assert_eq!(args.sheet.format, Some(SyntaxKind::Plist));
        assert_eq!(args.sheet.rotated_offset, Some(RotatedOffsetSign::Negate));
        assert_eq!(args.sheet.rotated_origin, Some(RotatedOrigin::UnrotatedTexture));
        assert!(args.dry_run);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["unpx", "unpack", "x", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = SheetArgs {
            paths: vec![PathBuf::from("/nonexistent/sheet.plist")],
            texture_ext: Some(".webp".to_string()),
            rotated_offset: Some(RotatedOffsetSign::Negate),
            ..Default::default()
        };
        let ctx = args.context(&Printer::new()).unwrap();
        assert_eq!(ctx.config.texture_extension, "webp");
        assert_eq!(ctx.config.rotated_offset, RotatedOffsetSign::Negate);
        assert_eq!(ctx.paths, args.paths);
    }
}
