//! Validate command implementation.
//!
//! Checks each sheet's metadata against itself and its texture without
//! extracting anything.

use clap::Args;

use super::SheetArgs;
use crate::config::JobConfig;
use crate::discovery::SheetJob;
use crate::error::{Result, UnpxError};
use crate::output::{display_path, plural, Printer};
use crate::render;
use crate::resolve::resolve_sheet;
use crate::validation::{print_diagnostics, validate_sheet, Diagnostic, ValidationResult};

/// Check sheets for inconsistent geometry without extracting
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let ctx = args.sheet.context(printer)?;
    let discovery = ctx.discover(printer);

    let total = discovery.jobs.len() + discovery.missing.len();
    let mut failed = discovery.missing.len();
    let mut errors = 0;
    let mut warnings = 0;

    for job in &discovery.jobs {
        printer.status("Checking", &display_path(&job.metadata));
        let result = match validate_job(job, &ctx.config) {
            Ok(result) => result,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let mut result = ValidationResult::new();
                result.push(Diagnostic::error(code_of(&err), err.to_string()));
                result
            }
        };

        print_diagnostics(&result, printer);
        errors += result.error_count();
        warnings += result.warning_count();
        if result.has_errors() || (args.strict && result.has_warnings()) {
            failed += 1;
        }
    }

    let summary = format!(
        "{}: {}, {}",
        plural(discovery.jobs.len(), "sheet", "sheets"),
        plural(errors, "error", "errors"),
        plural(warnings, "warning", "warnings")
    );
    if failed > 0 {
        printer.error("Finished", &summary);
        return Err(UnpxError::Batch { failed, total });
    }
    printer.success("Finished", &summary);
    Ok(())
}

/// All diagnostics for one sheet.
///
/// A missing texture is a warning: geometry that needs no texture is still
/// checked. Per-sprite resolution failures become errors.
pub fn validate_job(job: &SheetJob, config: &JobConfig) -> Result<ValidationResult> {
    let normalized = match job.load(config) {
        Ok(normalized) => normalized,
        Err(err @ UnpxError::MissingCompanionFile { .. }) => {
            let mut result = ValidationResult::new();
            result.push(
                Diagnostic::warning("unpx::missing_companion", err.to_string())
                    .with_help("Not a sprite sheet, or its texture is missing"),
            );
            return Ok(result);
        }
        Err(err) => return Err(err),
    };
    let sheet = &normalized.sheet;
    let mut result = normalized.diagnostics.clone();

    let texture = match job.locate_texture(sheet, config) {
        Ok(path) => Some(path),
        Err(err) => {
            result.push(
                Diagnostic::warning("unpx::missing_companion", err.to_string())
                    .with_help("Texture bounds were not checked"),
            );
            None
        }
    };
    let texture_size = match &texture {
        Some(path) => Some(render::texture_size(path)?),
        None => None,
    };

    result.merge(validate_sheet(sheet, texture_size));

    if let Some(size) = texture_size {
        let plans = resolve_sheet(sheet, || Ok(size));
        for (plan, frame) in plans.into_iter().zip(&sheet.frames) {
            if let Err(err) = plan {
                if result.for_sprite(&frame.name).next().is_none() {
                    result.push(
                        Diagnostic::error(code_of(&err), err.to_string())
                            .for_sprite(&frame.name),
                    );
                }
            }
        }
    }

    Ok(result)
}

fn code_of(err: &UnpxError) -> String {
    use miette::Diagnostic as _;
    err.code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unpx::error".to_string())
}
