//! Pre-commit check that `CHANGELOG.md` is updated alongside significant files.

use crate::config::ExclusionsConfig;
use crate::git::Repository;
use std::fmt;

const CHANGELOG_FILE: &str = "CHANGELOG.md";
const MAX_FILES_SHOWN: usize = 10;

/// Inputs for [`check_changelog_updated`]
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Paths to check instead of asking git for the staged set
    pub staged: Option<Vec<String>>,
    /// Do not accept an earlier changelog update on this branch
    pub skip_branch_check: bool,
}

/// Result of the staged-file check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedCheck {
    NoStagedFiles,
    ChangelogStaged,
    UpdatedInBranch,
    OnlyExcluded,
    /// Significant files are staged without a changelog update
    Missing { significant: Vec<String> },
}

impl StagedCheck {
    pub fn passed(&self) -> bool {
        !matches!(self, StagedCheck::Missing { .. })
    }

    /// Explanation printed when the check fails
    pub fn errors(&self) -> Vec<String> {
        let StagedCheck::Missing { significant } = self else {
            return Vec::new();
        };

        let mut lines = vec![
            "CHANGELOG.md must be updated when modifying significant files.".to_string(),
            "Staged files requiring changelog update:".to_string(),
        ];
        lines.extend(
            significant
                .iter()
                .take(MAX_FILES_SHOWN)
                .map(|file| format!("  - {}", file)),
        );
        if significant.len() > MAX_FILES_SHOWN {
            lines.push(format!("  ... and {} more", significant.len() - MAX_FILES_SHOWN));
        }
        lines.push(String::new());
        lines.push("Add your changes to the [Unreleased] section in CHANGELOG.md".to_string());
        lines
    }
}

impl fmt::Display for StagedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            StagedCheck::NoStagedFiles => "No staged files",
            StagedCheck::ChangelogStaged => "CHANGELOG.md is updated",
            StagedCheck::UpdatedInBranch => "CHANGELOG.md already updated in this branch",
            StagedCheck::OnlyExcluded => {
                "Only excluded files staged (no changelog update required)"
            }
            StagedCheck::Missing { .. } => "CHANGELOG.md not updated",
        };
        f.write_str(message)
    }
}

/// Check a path against the exclusion patterns.
///
/// Patterns ending in `/` are directories and match as a prefix or as a
/// nested directory; any other pattern matches the whole path or a suffix.
pub fn is_excluded_path(path: &str, exclusions: &ExclusionsConfig) -> bool {
    exclusions.all_patterns().any(|pattern| {
        if pattern.ends_with('/') {
            path.starts_with(pattern) || path.contains(&format!("/{}", pattern))
        } else {
            path == pattern || path.ends_with(pattern)
        }
    })
}

fn is_changelog_file(path: &str) -> bool {
    path == CHANGELOG_FILE || path.ends_with(&format!("/{}", CHANGELOG_FILE))
}

/// Decide whether the pending commit needs a changelog update
pub fn check_changelog_updated<R: Repository + ?Sized>(
    repo: &R,
    options: CheckOptions,
    exclusions: &ExclusionsConfig,
) -> StagedCheck {
    let staged = options.staged.unwrap_or_else(|| repo.staged_files());
    tracing::debug!(staged = staged.len(), "checking staged files");

    if staged.is_empty() {
        return StagedCheck::NoStagedFiles;
    }

    if staged.iter().any(|path| is_changelog_file(path)) {
        return StagedCheck::ChangelogStaged;
    }

    if !options.skip_branch_check
        && repo
            .changed_files_in_branch()
            .iter()
            .any(|path| path == CHANGELOG_FILE)
    {
        return StagedCheck::UpdatedInBranch;
    }

    let significant: Vec<String> = staged
        .into_iter()
        .filter(|path| !is_excluded_path(path, exclusions))
        .collect();

    if significant.is_empty() {
        StagedCheck::OnlyExcluded
    } else {
        StagedCheck::Missing { significant }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn staged(paths: &[&str]) -> CheckOptions {
        CheckOptions {
            staged: Some(paths.iter().map(|p| p.to_string()).collect()),
            skip_branch_check: false,
        }
    }

    #[test]
    fn test_is_excluded_path() {
        let exclusions = ExclusionsConfig::default();
        assert!(is_excluded_path(".github/workflows/ci.yml", &exclusions));
        assert!(is_excluded_path("packages/api/tests/unit.rs", &exclusions));
        assert!(is_excluded_path("pnpm-lock.yaml", &exclusions));
        assert!(is_excluded_path("apps/web/pnpm-lock.yaml", &exclusions));
        assert!(!is_excluded_path("src/main.rs", &exclusions));
    }

    #[test]
    fn test_no_staged_files_passes() {
        let repo = MockRepository::new();
        let result = check_changelog_updated(&repo, CheckOptions::default(), &ExclusionsConfig::default());
        assert_eq!(result, StagedCheck::NoStagedFiles);
        assert!(result.passed());
    }

    #[test]
    fn test_staged_changelog_passes() {
        let repo = MockRepository::new();
        let result = check_changelog_updated(
            &repo,
            staged(&["src/lib.rs", "docs/CHANGELOG.md"]),
            &ExclusionsConfig::default(),
        );
        assert_eq!(result, StagedCheck::ChangelogStaged);
    }

    #[test]
    fn test_branch_update_passes_unless_skipped() {
        let mut repo = MockRepository::new();
        repo.set_branch_changes("origin/main", &["CHANGELOG.md", "src/a.rs"]);

        let result = check_changelog_updated(&repo, staged(&["src/lib.rs"]), &ExclusionsConfig::default());
        assert_eq!(result, StagedCheck::UpdatedInBranch);

        let mut options = staged(&["src/lib.rs"]);
        options.skip_branch_check = true;
        let result = check_changelog_updated(&repo, options, &ExclusionsConfig::default());
        assert!(!result.passed());
    }

    #[test]
    fn test_only_excluded_files_pass() {
        let repo = MockRepository::new();
        let result = check_changelog_updated(
            &repo,
            staged(&[".github/workflows/ci.yml", "tests/it.rs"]),
            &ExclusionsConfig::default(),
        );
        assert_eq!(result, StagedCheck::OnlyExcluded);
        assert_eq!(
            result.to_string(),
            "Only excluded files staged (no changelog update required)"
        );
    }

    #[test]
    fn test_staged_files_come_from_repository() {
        let mut repo = MockRepository::new();
        repo.stage("src/lib.rs").stage(".gitignore");

        let result = check_changelog_updated(&repo, CheckOptions::default(), &ExclusionsConfig::default());
        assert_eq!(
            result,
            StagedCheck::Missing {
                significant: vec!["src/lib.rs".to_string()]
            }
        );
        assert_eq!(result.to_string(), "CHANGELOG.md not updated");
    }

    #[test]
    fn test_missing_errors_truncate_file_list() {
        let files: Vec<String> = (0..12).map(|i| format!("src/file{}.rs", i)).collect();
        let result = StagedCheck::Missing { significant: files };
        let errors = result.errors();

        assert_eq!(errors[0], "CHANGELOG.md must be updated when modifying significant files.");
        assert_eq!(errors[2], "  - src/file0.rs");
        assert_eq!(errors[12], "  ... and 2 more");
        assert_eq!(errors[13], "");
        assert_eq!(
            errors.last().map(String::as_str),
            Some("Add your changes to the [Unreleased] section in CHANGELOG.md")
        );
    }
}
