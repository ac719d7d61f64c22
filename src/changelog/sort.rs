//! Reordering of release sections without touching their contents.

use crate::changelog::line::Line;
use crate::changelog::parser::parse_changelog;
use crate::config::Rules;
use crate::domain::version::{are_versions_sorted, compare_versions};

/// Raw lines of one release section, heading included
struct Section<'a> {
    label: &'a str,
    lines: Vec<&'a str>,
}

impl Section<'_> {
    fn is_unreleased(&self) -> bool {
        self.label == crate::changelog::model::UNRELEASED
    }
}

/// Check if the versioned releases in `content` are newest-first
pub fn check_releases_are_sorted(content: &str, rules: &Rules) -> bool {
    let changelog = parse_changelog(content, rules);
    let versions = changelog.versions();
    versions.len() <= 1 || are_versions_sorted(&versions)
}

/// Rewrite `content` with Unreleased first and versioned releases
/// newest-first.
///
/// Lines before the first release heading are kept as the header, and each
/// section's lines are carried over verbatim.
pub fn sort_releases(content: &str) -> String {
    let mut header: Vec<&str> = Vec::new();
    let mut sections: Vec<Section<'_>> = Vec::new();

    for raw in content.split('\n') {
        match Line::classify(raw) {
            Line::VersionHeading { label, .. } => sections.push(Section {
                label,
                lines: vec![raw],
            }),
            _ => match sections.last_mut() {
                Some(section) => section.lines.push(raw),
                None => header.push(raw),
            },
        }
    }

    let (unreleased, mut versioned): (Vec<Section<'_>>, Vec<Section<'_>>) =
        sections.into_iter().partition(Section::is_unreleased);
    versioned.sort_by(|a, b| compare_versions(a.label, b.label));

    let mut lines = header;
    for section in unreleased.into_iter().chain(versioned) {
        lines.extend(section.lines);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSORTED: &str = "# Changelog

## [1.0.0] - 2024-01-01

### Added

- Add API (#1)

## [Unreleased]

### Fixed

- Fix typo

## [2.0.0] - 2024-03-01

### Changed

- **Breaking:** Drop Node 16 (#5)

## [1.1.0] - 2024-02-01

### Fixed

- Fix crash (#3)
";

    #[test]
    fn test_sort_releases() {
        let rules = Rules::default();
        assert!(!check_releases_are_sorted(UNSORTED, &rules));

        let sorted = sort_releases(UNSORTED);
        assert!(check_releases_are_sorted(&sorted, &rules));

        let changelog = parse_changelog(&sorted, &rules);
        let labels: Vec<&str> = changelog.releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(labels, vec!["Unreleased", "2.0.0", "1.1.0", "1.0.0"]);
    }

    #[test]
    fn test_sort_preserves_lines() {
        let sorted = sort_releases(UNSORTED);
        let mut before: Vec<&str> = UNSORTED.split('\n').collect();
        let mut after: Vec<&str> = sorted.split('\n').collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(sorted.starts_with("# Changelog\n\n## [Unreleased]"));
    }

    #[test]
    fn test_sorted_input_is_unchanged() {
        let content = "# Changelog\n\n## [2.0.0] - 2024-02-01\n\n## [1.0.0] - 2024-01-01\n";
        assert_eq!(sort_releases(content), content);
    }

    #[test]
    fn test_single_release_counts_as_sorted() {
        assert!(check_releases_are_sorted("# Changelog\n\n## [1.0.0] - 2024-01-01\n", &Rules::default()));
        assert!(check_releases_are_sorted("", &Rules::default()));
    }
}
