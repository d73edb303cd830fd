//! Inspect command implementation.
//!
//! Prints the canonical frames and extraction plans of each sheet as JSON
//! on stdout. Nothing is written to disk.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use super::SheetArgs;
use crate::config::JobConfig;
use crate::discovery::SheetJob;
use crate::error::{Result, UnpxError};
use crate::output::{display_path, Printer};
use crate::parser::SyntaxKind;
use crate::render;
use crate::resolve::resolve_sheet;
use crate::types::{ExtractionPlan, Size, SpriteSheet};
use crate::validation::{validate_sheet, ValidationResult};

/// Print normalized frames and extraction plans as JSON
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Everything unpx knows about one sheet.
#[derive(Debug, Serialize)]
pub struct SheetInspection {
    pub metadata: String,
    pub syntax: SyntaxKind,
    pub dialect: String,
    pub texture: Option<String>,
    pub texture_size: Option<Size>,
    pub sheet: SpriteSheet,
    pub plans: Vec<PlanEntry>,
    pub diagnostics: ValidationResult,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlanEntry {
    Plan(ExtractionPlan),
    Failed { name: String, error: String },
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let ctx = args.sheet.context(printer)?;
    let discovery = ctx.discover(printer);

    let mut reports = Vec::new();
    for job in &discovery.jobs {
        match inspect_job(job, &ctx.config) {
            Ok(report) => reports.push(report),
            Err(err @ UnpxError::MissingCompanionFile { .. }) => {
                printer.warning("Skipping", &err.to_string())
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => printer.error(
                "Failed",
                &format!("{}: {}", display_path(&job.metadata), err),
            ),
        }
    }

    let json = if args.compact {
        serde_json::to_string(&reports)
    } else {
        serde_json::to_string_pretty(&reports)
    }
    .map_err(|e| UnpxError::parse(format!("Failed to encode report: {}", e)))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

/// Normalize, validate and resolve one sheet.
pub fn inspect_job(job: &SheetJob, config: &JobConfig) -> Result<SheetInspection> {
    let normalized = job.load(config)?;
    let texture = job.locate_texture(&normalized.sheet, config).ok();
    let texture_size = texture.as_deref().and_then(|p| render::texture_size(p).ok());

    let mut diagnostics = normalized.diagnostics;
    diagnostics.merge(validate_sheet(&normalized.sheet, texture_size));

    let plans = resolve_sheet(&normalized.sheet, || match &texture {
        Some(path) => render::texture_size(path),
        None => Err(UnpxError::MissingCompanionFile {
            base: job.base.clone(),
            missing: job.texture_candidate(config),
        }),
    })
    .into_iter()
    .zip(&normalized.sheet.frames)
    .map(|(plan, frame)| match plan {
        Ok(plan) => PlanEntry::Plan(plan),
        Err(err) => PlanEntry::Failed {
            name: frame.name.clone(),
            error: err.to_string(),
        },
    })
    .collect();

    Ok(SheetInspection {
        metadata: job.metadata.display().to_string(),
        syntax: job.syntax,
        dialect: normalized.dialect.to_string(),
        texture: texture.map(|p| p.display().to_string()),
        texture_size,
        sheet: normalized.sheet,
        plans,
        diagnostics,
    })
}
