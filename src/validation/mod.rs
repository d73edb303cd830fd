//! Validation for normalized sprite sheets.
//!
//! Runs a suite of checks against a sheet (and, when known, its texture
//! size) and reports errors and warnings. Used by `unpx validate` and before
//! every unpack.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::output::Printer;
use crate::types::{Size, SpriteSheet};

/// Run all validation checks against a sheet.
pub fn validate_sheet(sheet: &SpriteSheet, texture: Option<Size>) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_empty_sheet(sheet));
    result.merge(checks::check_source_placement(sheet));

    if let Some(texture) = texture {
        result.merge(checks::check_canvas_size(sheet, texture));
        result.merge(checks::check_frame_bounds(sheet, texture));
    }

    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    print_filtered(result, printer, |_| true);
}

/// Print only the warnings of a result.
pub fn print_warnings(result: &ValidationResult, printer: &Printer) {
    print_filtered(result, printer, |d| d.severity == Severity::Warning);
}

fn print_filtered(result: &ValidationResult, printer: &Printer, keep: impl Fn(&Diagnostic) -> bool) {
    for d in result.iter().filter(|d| keep(d)) {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        let subject = match &d.sprite {
            Some(sprite) => format!("{} ", printer.cyan(sprite)),
            None => String::new(),
        };
        eprintln!("  {}[{}]: {}{}", label, d.code, subject, d.message);
        if let Some(help) = &d.help {
            eprintln!("    {} {}", printer.dim("help:"), help);
        }
    }
}
