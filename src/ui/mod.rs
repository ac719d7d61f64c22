//! User interface module - styled terminal output.
//!
//! Commands never prompt: they run in hooks and CI, so every decision comes
//! from flags.

pub mod formatter;

pub use formatter::{
    display_coverage_report, display_dry_run, display_error, display_staged_check,
    display_status, display_success, display_validation_report, display_warning,
    format_todo_hint,
};
