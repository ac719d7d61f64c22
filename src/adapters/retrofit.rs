//! Building a first changelog from merged-PR commits.

use crate::adapters::text::{clean_pr_title, looks_breaking, remove_emojis, strip_leading_ticket};
use crate::changelog::model::{Change, Changelog, Reference, Release};
use crate::changelog::render::{render_changelog, RenderOptions, COMMON_CHANGELOG_INTRO};
use crate::config::Rules;
use crate::domain::{Category, GitLogEntry, ParsedCommit};
use regex::Regex;
use std::cmp::Reverse;
use std::sync::LazyLock;

/// Notice written under the retrofitted release
pub const RETROFIT_NOTICE: &str =
    "Initial versioned release. Retroactively documents all changes since repository creation.";

static PR_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("pr number regex"));

static TRAILING_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(#\d+\)\s*$").expect("trailing pr regex"));

/// Category, breaking flag and entry text derived from a commit subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedCommit {
    pub category: Category,
    pub breaking: bool,
    pub text: String,
}

/// Input for [`retrofit_changelog`]
#[derive(Debug, Clone)]
pub struct RetrofitOptions<'a> {
    pub version: &'a str,
    pub date: &'a str,
    pub repo_url: Option<&'a str>,
}

/// Output of [`retrofit_changelog`]
#[derive(Debug, Clone)]
pub struct RetrofitResult {
    pub changelog: Changelog,
    pub markdown: String,
    pub pr_count: usize,
}

/// Categorize a commit subject by conventional prefix, else by its verbs
pub fn categorize_commit(subject: &str, rules: &Rules) -> CategorizedCommit {
    let subject_clean = strip_leading_ticket(&remove_emojis(subject));
    let breaking = looks_breaking(&subject_clean);

    if let Some(commit) = ParsedCommit::parse(&subject_clean) {
        return CategorizedCommit {
            category: commit.category(&rules.categories),
            breaking: breaking || commit.is_breaking_change,
            text: clean_pr_title(&commit.description),
        };
    }

    let text = clean_pr_title(subject);
    let lower = text.to_lowercase();
    let category = [
        ("add", Category::Added),
        ("fix", Category::Fixed),
        ("remove", Category::Removed),
    ]
    .into_iter()
    .find(|(word, _)| lower.starts_with(word) || lower.contains(&format!(" {} ", word)))
    .map(|(_, category)| category)
    .unwrap_or(Category::Changed);

    CategorizedCommit {
        category,
        breaking,
        text,
    }
}

/// Commits that merged a PR, excluding automation accounts
pub fn extract_pr_commits<'a>(log: &'a [GitLogEntry], rules: &Rules) -> Vec<&'a GitLogEntry> {
    log.iter()
        .filter(|commit| !rules.is_automation_author(&commit.author))
        .filter(|commit| PR_NUMBER_RE.is_match(&commit.subject))
        .collect()
}

/// PR number from a `(#N)` in the subject
pub fn extract_pr_number(subject: &str) -> Option<u64> {
    PR_NUMBER_RE
        .captures(subject)
        .and_then(|c| c[1].parse().ok())
}

/// Generate a changelog from git history.
///
/// Produces an empty Unreleased section and one dated release holding
/// every PR commit. Inside each category breaking entries come first, then
/// newest first.
pub fn retrofit_changelog(
    log: &[GitLogEntry],
    options: &RetrofitOptions<'_>,
    rules: &Rules,
) -> RetrofitResult {
    let commits = extract_pr_commits(log, rules);
    tracing::info!(total = log.len(), prs = commits.len(), "collected PR commits");

    let mut entries: Vec<(Category, Option<&str>, Change)> = Vec::new();
    for commit in &commits {
        let categorized = categorize_commit(&commit.subject, rules);
        let text = TRAILING_PR_RE.replace(&categorized.text, "").trim().to_string();

        let mut change = Change::new(text).breaking(categorized.breaking);
        if let Some(number) = extract_pr_number(&commit.subject) {
            let url = options
                .repo_url
                .map(|repo| format!("{}/pull/{}", repo, number))
                .unwrap_or_default();
            change = change.with_reference(Reference::pull_request(number, url));
        }
        entries.push((categorized.category, commit.date.as_deref(), change));
    }

    // Stable: equal keys keep history order
    entries.sort_by_key(|(_, date, change)| (!change.breaking, Reverse(*date)));

    let mut release = Release::new(options.version, Some(options.date.to_string()));
    release.notice = Some(RETROFIT_NOTICE.to_string());
    for (category, _, change) in entries {
        release.group_mut(category).changes.push(change);
    }

    let changelog = Changelog {
        releases: vec![Release::unreleased(), release],
        ..Changelog::default()
    };

    let markdown = render_changelog(
        &changelog,
        &RenderOptions {
            intro: COMMON_CHANGELOG_INTRO,
            preface: None,
            repo_url: options.repo_url,
        },
    );

    RetrofitResult {
        changelog,
        markdown,
        pr_count: commits.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hash: &str, subject: &str, author: &str, date: &str) -> GitLogEntry {
        GitLogEntry {
            hash: hash.to_string(),
            subject: subject.to_string(),
            author: author.to_string(),
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn test_categorize_conventional_commit() {
        let rules = Rules::default();
        let commit = categorize_commit("feat(api): add search endpoint (#12)", &rules);
        assert_eq!(commit.category, Category::Added);
        assert!(!commit.breaking);
        assert_eq!(commit.text, "Add search endpoint");

        let commit = categorize_commit("🐛 [ENG-9] fix!: drop legacy auth (#13)", &rules);
        assert_eq!(commit.category, Category::Fixed);
        assert!(commit.breaking);
        assert_eq!(commit.text, "Drop legacy auth");
    }

    #[test]
    fn test_categorize_by_verbs() {
        let rules = Rules::default();
        assert_eq!(categorize_commit("Add dark mode (#1)", &rules).category, Category::Added);
        assert_eq!(
            categorize_commit("Quick fix for login (#2)", &rules).category,
            Category::Fixed
        );
        assert_eq!(
            categorize_commit("Remove old flags (#3)", &rules).category,
            Category::Removed
        );
        assert_eq!(
            categorize_commit("Bump deps (#4)", &rules).category,
            Category::Changed
        );
    }

    #[test]
    fn test_extract_pr_commits_skips_automation() {
        let log = vec![
            entry("a", "fix: bug (#10)", "dev", "2024-01-01"),
            entry("b", "chore: release (#11)", "estate-catalog[bot]", "2024-01-02"),
            entry("c", "wip without pr", "dev", "2024-01-03"),
        ];
        let commits = extract_pr_commits(&log, &Rules::default());
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, "a");
    }

    #[test]
    fn test_retrofit_changelog() {
        let log = vec![
            entry("a", "feat: add login (#1)", "dev", "2024-01-01T10:00:00Z"),
            entry("b", "feat: add logout (#2)", "dev", "2024-01-05T10:00:00Z"),
            entry("c", "feat!: replace session store (#3)", "dev", "2024-01-03T10:00:00Z"),
            entry("d", "fix: handle empty token (#4)", "dev", "2024-01-04T10:00:00Z"),
        ];
        let result = retrofit_changelog(
            &log,
            &RetrofitOptions {
                version: "1.0.0",
                date: "2024-02-01",
                repo_url: Some("https://github.com/o/r"),
            },
            &Rules::default(),
        );

        assert_eq!(result.pr_count, 4);
        let release = &result.changelog.releases[1];
        assert_eq!(release.notice.as_deref(), Some(RETROFIT_NOTICE));

        let added: Vec<&str> = release.groups[0].changes.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(added, vec!["Replace session store", "Add logout", "Add login"]);

        assert!(result.markdown.contains("## [Unreleased]\n\n## [1.0.0] - 2024-02-01"));
        assert!(result
            .markdown
            .contains("- **Breaking:** Replace session store ([#3](https://github.com/o/r/pull/3))"));
        assert!(result
            .markdown
            .contains("[Unreleased]: https://github.com/o/r/compare/v1.0.0...HEAD"));
    }
}
