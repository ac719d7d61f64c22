//! Changelog validation.
//!
//! Validation never fails: every problem is collected as a [`Diagnostic`]
//! in a [`ValidationReport`], split into blocking errors and advisory
//! warnings.

use crate::changelog::model::{Change, ChangeGroup, Release};
use crate::changelog::parser::parse_changelog;
use crate::config::Rules;
use crate::diagnostic::Diagnostic;
use crate::domain::version::{are_versions_sorted, is_valid_version};
use crate::domain::Category;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("iso date regex"));

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// True when no blocking errors were found
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// File a diagnostic under errors or warnings by its severity
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Whether a group is checked against the categories that precede it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCheck {
    Enforce,
    Skip,
}

/// Validate a single change.
///
/// References are required outside the Unreleased section.
pub fn validate_change(change: &Change, unreleased: bool, rules: &Rules) -> ValidationReport {
    let mut report = ValidationReport::default();

    if change.references.is_empty() && !unreleased {
        report.push(Diagnostic::MissingReference {
            text: change.text.clone(),
        });
    }

    if !change.text.is_empty() && !rules.starts_with_imperative_verb(&change.text) {
        report.push(Diagnostic::ImperativeMoodSuspect {
            text: change.text.clone(),
        });
    }

    report
}

/// Validate one change group.
///
/// `previous` holds the categories already seen in the release. A heading
/// that is not canonical is reported and its changes are not inspected.
pub fn validate_change_group(
    group: &ChangeGroup,
    previous: &[Category],
    order: OrderCheck,
    unreleased: bool,
    rules: &Rules,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(category) = Category::from_canonical(&group.heading) else {
        report.push(Diagnostic::InvalidCategory {
            heading: group.heading.clone(),
        });
        return report;
    };

    if order == OrderCheck::Enforce && previous.iter().any(|prev| *prev > category) {
        report.push(Diagnostic::CategoryOutOfOrder { category });
    }

    for change in &group.changes {
        report.merge(validate_change(change, unreleased, rules));
    }

    report
}

fn validate_groups(groups: &[ChangeGroup], unreleased: bool, rules: &Rules) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut previous: Vec<Category> = Vec::new();

    for group in groups {
        report.merge(validate_change_group(
            group,
            &previous,
            OrderCheck::Enforce,
            unreleased,
            rules,
        ));
        previous.push(group.category);
    }

    report
}

/// Validate a release: version, date and its groups
pub fn validate_release(release: &Release, rules: &Rules) -> ValidationReport {
    if release.is_unreleased() {
        return validate_groups(&release.groups, true, rules);
    }

    let mut report = ValidationReport::default();

    if !is_valid_version(&release.version) {
        report.push(Diagnostic::InvalidVersion {
            version: release.version.clone(),
        });
    }

    match &release.date {
        None => report.push(Diagnostic::MissingDate {
            version: release.version.clone(),
        }),
        Some(date) if !ISO_DATE_RE.is_match(date) => report.push(Diagnostic::InvalidDate {
            version: release.version.clone(),
            date: date.clone(),
        }),
        Some(_) => {}
    }

    report.merge(validate_groups(&release.groups, false, rules));
    report
}

/// Versions that appear more than once, in first-seen order
fn find_duplicates(versions: &[&str]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for version in versions {
        *counts.entry(version).or_default() += 1;
    }

    let mut duplicates: Vec<String> = Vec::new();
    for version in versions {
        if counts[version] > 1 && !duplicates.iter().any(|d| d == version) {
            duplicates.push(version.to_string());
        }
    }
    duplicates
}

/// Validate changelog content
pub fn validate_changelog(content: &str, rules: &Rules) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !content.trim().starts_with("# Changelog") {
        report.push(Diagnostic::MissingHeader);
    }

    let changelog = parse_changelog(content, rules);

    if changelog.releases.is_empty() {
        report.push(Diagnostic::NoReleases);
    }

    for release in &changelog.releases {
        report.merge(validate_release(release, rules));
    }

    let versions = changelog.versions();

    if versions.len() > 1 && !are_versions_sorted(&versions) {
        report.push(Diagnostic::ReleasesNotSorted {
            found: versions.iter().map(|v| v.to_string()).collect(),
        });
    }

    let duplicates = find_duplicates(&versions);
    if !duplicates.is_empty() {
        report.push(Diagnostic::DuplicateVersion {
            versions: duplicates,
        });
    }

    let unreleased_first = changelog
        .releases
        .first()
        .is_some_and(|r| r.is_unreleased());
    if !unreleased_first && changelog.unreleased().is_some() {
        report.push(Diagnostic::UnreleasedNotFirst);
    }

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated changelog"
    );

    report
}
