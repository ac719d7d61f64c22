//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are tested directly; `display_*`
//! functions print it.

use crate::changelog::ValidationReport;
use crate::coverage::CoverageReport;
use crate::staged::StagedCheck;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Lines for a validation report: errors first, then warnings, then a verdict
pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.errors.is_empty() {
        lines.push(format!("{} error(s):", report.errors.len()));
        lines.extend(report.errors.iter().map(|d| format!("  - {}", d)));
    }
    if !report.warnings.is_empty() {
        lines.push(format!("{} warning(s):", report.warnings.len()));
        lines.extend(report.warnings.iter().map(|d| format!("  - {}", d)));
    }

    lines.push(if report.passed() {
        "CHANGELOG.md is valid".to_string()
    } else {
        "CHANGELOG.md validation failed".to_string()
    });
    lines
}

/// Print a validation report
pub fn display_validation_report(report: &ValidationReport) {
    let lines = format_validation_report(report);
    let Some((verdict, details)) = lines.split_last() else {
        return;
    };

    for line in details {
        eprintln!("{}", line);
    }
    if report.passed() {
        display_success(verdict);
    } else {
        display_error(verdict);
    }
}

/// Print a coverage report
pub fn display_coverage_report(report: &CoverageReport) {
    for line in report.errors() {
        eprintln!("{}", style(line).red());
    }
    for line in report.warnings() {
        eprintln!("{}", style(line).yellow());
    }

    if report.passed() {
        display_success(&report.message());
    } else {
        display_error(&report.message());
    }
}

/// Print the outcome of the staged-file check
pub fn display_staged_check(check: &StagedCheck) {
    if check.passed() {
        display_success(&check.to_string());
        return;
    }

    display_error(&check.to_string());
    for line in check.errors() {
        eprintln!("  {}", line);
    }
}

/// Hint shown when generated output contains TODO markers
pub fn format_todo_hint(todo_count: usize) -> Option<String> {
    (todo_count > 0).then(|| {
        format!(
            "Entries needing attention: {}. Search for \"<!-- TODO:\" in the output to find them.",
            todo_count
        )
    })
}

/// Print generated markdown instead of writing it
pub fn display_dry_run(markdown: &str) {
    println!("\n{}\n", style("--- DRY RUN OUTPUT ---").bold());
    print!("{}", markdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostic;

    #[test]
    fn test_format_validation_report_passed() {
        let report = ValidationReport::default();
        assert_eq!(format_validation_report(&report), vec!["CHANGELOG.md is valid"]);
    }

    #[test]
    fn test_format_validation_report_lists_diagnostics() {
        let mut report = ValidationReport::default();
        report.push(Diagnostic::MissingHeader);
        report.push(Diagnostic::UnreleasedNotFirst);

        let lines = format_validation_report(&report);
        assert_eq!(lines[0], "1 error(s):");
        assert!(lines[1].starts_with("  - CHANGELOG.md must start with"));
        assert_eq!(lines[2], "1 warning(s):");
        assert_eq!(lines.last().map(String::as_str), Some("CHANGELOG.md validation failed"));
    }

    #[test]
    fn test_format_todo_hint() {
        assert_eq!(format_todo_hint(0), None);
        assert!(format_todo_hint(3).unwrap().starts_with("Entries needing attention: 3."));
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_warning("test warning");
        display_success("test success");
        display_status("test status");
    }
}
