//! Unpack command implementation.
//!
//! Runs each discovered sheet through normalize, resolve and extract.
//! A failing sheet or sprite is reported and the batch continues.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use super::SheetArgs;
use crate::config::JobConfig;
use crate::discovery::{normalize_extension, SheetJob};
use crate::error::{Result, UnpxError};
use crate::output::{display_path, plural, Printer};
use crate::render::{self, SheetReport};
use crate::resolve::resolve_sheet;
use crate::types::{ExtractionPlan, Size};
use crate::validation::{print_warnings, validate_sheet};

/// Extract every sprite of one or more sheets into image files
#[derive(Args, Debug)]
pub struct UnpackArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Output root (default: a directory next to each metadata file)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Prefix removed from sprite file names (repeatable)
    #[arg(long = "strip-prefix", value_name = "PREFIX")]
    pub strip_prefixes: Vec<String>,

    /// Extension for sprite names that lack one
    #[arg(long, value_name = "EXT")]
    pub image_ext: Option<String>,

    /// Worker threads for extraction (default: all cores)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Resolve geometry and report output paths without writing files
    #[arg(long)]
    pub dry_run: bool,
}

/// Totals across a batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    pub sheets: usize,
    pub skipped: usize,
    pub failed_sheets: usize,
    pub sprites: usize,
    pub failed_sprites: usize,
    /// Sheets that unpacked with at least one failed sprite.
    pub partial_sheets: usize,
}

pub fn run(args: UnpackArgs, printer: &Printer) -> Result<()> {
    let summary = unpack(&args, printer)?;
    let total = summary.sheets + summary.skipped + summary.failed_sheets;

    let verb = if args.dry_run { "Planned" } else { "Finished" };
    printer.success(
        verb,
        &format!(
            "{} from {}",
            plural(summary.sprites, "sprite", "sprites"),
            plural(summary.sheets, "sheet", "sheets")
        ),
    );

    if summary.failed_sheets > 0 || summary.failed_sprites > 0 {
        return Err(UnpxError::Batch {
            failed: summary.failed_sheets + summary.partial_sheets,
            total,
        });
    }
    Ok(())
}

/// Unpack every discovered sheet, returning batch totals.
pub fn unpack(args: &UnpackArgs, printer: &Printer) -> Result<UnpackSummary> {
    let ctx = args.sheet.context(printer)?;
    let mut config = ctx.config.clone();
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if !args.strip_prefixes.is_empty() {
        config.strip_prefixes = args.strip_prefixes.clone();
    }
    if let Some(ext) = &args.image_ext {
        config.image_extension = normalize_extension("--image-ext", ext)?;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    config.dry_run = args.dry_run;

    let discovery = ctx.discover(printer);
    let mut summary = UnpackSummary {
        failed_sheets: discovery.missing.len(),
        ..Default::default()
    };

    for job in &discovery.jobs {
        match unpack_job(job, &config, printer) {
            Ok(Some(report)) => {
                summary.sheets += 1;
                summary.sprites += report.success_count();
                summary.failed_sprites += report.failure_count();
                if report.failure_count() > 0 {
                    summary.partial_sheets += 1;
                }
            }
            Ok(None) => summary.skipped += 1,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                summary.failed_sheets += 1;
                printer.error(
                    "Failed",
                    &format!("{}: {}", display_path(&job.metadata), err),
                );
            }
        }
    }

    debug!(?summary, "unpack finished");
    Ok(summary)
}

/// Unpack one sheet. `Ok(None)` means the texture was missing and the
/// sheet was skipped.
fn unpack_job(job: &SheetJob, config: &JobConfig, printer: &Printer) -> Result<Option<SheetReport>> {
    let located = job
        .load(config)
        .and_then(|normalized| {
            let path = job.locate_texture(&normalized.sheet, config)?;
            Ok((normalized, path))
        });
    let (normalized, texture_path) = match located {
        Ok(found) => found,
        Err(err @ UnpxError::MissingCompanionFile { .. }) => {
            printer.warning("Skipping", &err.to_string());
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    let sheet = &normalized.sheet;

    printer.status(
        "Unpacking",
        &format!(
            "{} ({}, {})",
            display_path(&job.metadata),
            normalized.dialect,
            plural(sheet.len(), "sprite", "sprites")
        ),
    );

    let texture = if config.dry_run {
        None
    } else {
        Some(render::load_texture(&texture_path)?)
    };
    let decoded_size = texture.as_ref().map(|t| Size::new(t.width(), t.height()));

    let mut diagnostics = normalized.diagnostics.clone();
    diagnostics.merge(validate_sheet(sheet, decoded_size));
    print_warnings(&diagnostics, printer);

    let plans = resolve_sheet(sheet, || match decoded_size {
        Some(size) => Ok(size),
        None => render::texture_size(&texture_path),
    });
    let named: Vec<(String, Result<ExtractionPlan>)> = sheet
        .frames
        .iter()
        .map(|f| f.name.clone())
        .zip(plans)
        .collect();

    let output_dir = job.output_dir(config);
    let report = render::unpack_sheet(texture.as_ref(), named, &output_dir, config)?;

    let verb = if config.dry_run { "Would write" } else { "Wrote" };
    for path in report.written() {
        printer.detail(verb, &display_path(path));
    }
    for (_, err) in report.failures() {
        printer.error("Failed", &err.to_string());
    }

    Ok(Some(report))
}
