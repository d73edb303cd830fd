//! List command implementation.
//!
//! Prints discovered sheets with their textures, and optionally the
//! sprite names each one holds.

use clap::Args;

use super::SheetArgs;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};

/// List discovered sprite sheets
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Also read each sheet and list its sprite names
    #[arg(long)]
    pub sprites: bool,
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let ctx = args.sheet.context(printer)?;
    let discovery = ctx.discover(printer);

    for job in &discovery.jobs {
        let texture = job.texture_candidate(&ctx.config);
        let texture_label = if texture.is_file() {
            printer.cyan(&display_path(&texture))
        } else {
            printer.dim("(no texture)")
        };
        printer.info(
            job.syntax.extension(),
            &format!("{} -> {}", display_path(&job.metadata), texture_label),
        );

        if !args.sprites {
            continue;
        }
        match job.normalize(&ctx.config) {
            Ok(normalized) => {
                let names: Vec<&str> = normalized.sheet.names().collect();
                printer.info(
                    &normalized.dialect.to_string(),
                    &format!(
                        "{}: {}",
                        plural(names.len(), "sprite", "sprites"),
                        names.join(", ")
                    ),
                );
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => printer.error("Failed", &err.to_string()),
        }
    }

    printer.success(
        "Found",
        &plural(discovery.jobs.len(), "sprite sheet", "sprite sheets"),
    );
    Ok(())
}
