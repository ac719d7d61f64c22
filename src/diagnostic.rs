use crate::domain::Category;
use std::fmt;

/// Characters of change text quoted in a missing-reference error
pub const TRUNCATE_LENGTH: usize = 50;

/// Characters of change text quoted in an imperative-mood warning
pub const TRUNCATE_LENGTH_SHORT: usize = 30;

/// Shorten `text` to `length` characters, appending `...` when cut
pub fn truncate(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

/// How much a diagnostic blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Issues found while validating a changelog.
/// Errors fail validation; warnings are advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Document does not begin with `# Changelog`
    MissingHeader,
    /// No release sections at all
    NoReleases,
    /// Release label is not a valid semver string
    InvalidVersion { version: String },
    /// Versioned release without a date
    MissingDate { version: String },
    /// Date present but not `YYYY-MM-DD`
    InvalidDate { version: String, date: String },
    /// Group heading is not one of the canonical categories
    InvalidCategory { heading: String },
    /// Group appears after a category that should follow it
    CategoryOutOfOrder { category: Category },
    /// Change in a versioned release without any reference
    MissingReference { text: String },
    /// Change text does not start with a known imperative verb
    ImperativeMoodSuspect { text: String },
    /// Versioned releases are not newest-first
    ReleasesNotSorted { found: Vec<String> },
    /// The same version appears more than once
    DuplicateVersion { versions: Vec<String> },
    /// Unreleased section exists but is not the first release
    UnreleasedNotFirst,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::ImperativeMoodSuspect { .. } | Diagnostic::UnreleasedNotFirst => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingHeader => {
                write!(f, "CHANGELOG.md must start with \"# Changelog\" header")
            }
            Diagnostic::NoReleases => write!(
                f,
                "CHANGELOG.md must have at least one release entry or Unreleased section"
            ),
            Diagnostic::InvalidVersion { version } => write!(
                f,
                "Invalid version \"{}\". Must be valid semver without 'v' prefix (e.g., \"2.0.0\")",
                version
            ),
            Diagnostic::MissingDate { version } => {
                write!(f, "Release {} is missing date", version)
            }
            Diagnostic::InvalidDate { version, date } => write!(
                f,
                "Invalid date format \"{}\" for version {}. Must be YYYY-MM-DD",
                date, version
            ),
            Diagnostic::InvalidCategory { heading } => write!(
                f,
                "Invalid category \"{}\". Must be one of: {}",
                heading,
                Category::canonical_list(", ")
            ),
            Diagnostic::CategoryOutOfOrder { category } => write!(
                f,
                "Category \"{}\" is out of order. Expected order: {}",
                category,
                Category::canonical_list(" > ")
            ),
            Diagnostic::MissingReference { text } => write!(
                f,
                "Change \"{}\" has no reference (PR or commit required)",
                truncate(text, TRUNCATE_LENGTH)
            ),
            Diagnostic::ImperativeMoodSuspect { text } => write!(
                f,
                "Change \"{}\" may not use imperative mood (should start with verb like \"Add\", \"Fix\", etc.)",
                truncate(text, TRUNCATE_LENGTH_SHORT)
            ),
            Diagnostic::ReleasesNotSorted { found } => write!(
                f,
                "Releases are not sorted newest-first. Found order: {}",
                found.join(", ")
            ),
            Diagnostic::DuplicateVersion { versions } => {
                write!(f, "Duplicate versions found: {}", versions.join(", "))
            }
            Diagnostic::UnreleasedNotFirst => write!(
                f,
                "Unreleased section should be at the top of the changelog"
            ),
        }
    }
}
