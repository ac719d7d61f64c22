//! PR coverage: every merged PR in git history should appear in the changelog.

use crate::config::Rules;
use crate::domain::GitLogEntry;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const MAX_MISSING_SHOWN: usize = 20;
const MAX_EXTRA_SHOWN: usize = 10;

static SUBJECT_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("subject pr regex"));

static LINKED_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[#(\d+)\]").expect("linked pr regex"));

/// `(#N)`; skipped when directly followed by `]`
static BARE_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("bare pr regex"));

/// Outcome of comparing git history PRs with changelog PRs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Number of PRs found in git history
    pub git_total: usize,
    /// In git history but not in the changelog
    pub missing: Vec<u64>,
    /// In the changelog but not in git history
    pub extra: Vec<u64>,
}

impl CoverageReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    /// One-line summary
    pub fn message(&self) -> String {
        if self.git_total == 0 && self.extra.is_empty() {
            "No PRs found in repository".to_string()
        } else if self.passed() {
            format!("All {} PR(s) are documented in CHANGELOG.md", self.git_total)
        } else {
            format!("{} PR(s) missing from CHANGELOG.md", self.missing.len())
        }
    }

    /// Error lines listing missing PRs; empty when coverage passed
    pub fn errors(&self) -> Vec<String> {
        if self.missing.is_empty() {
            return Vec::new();
        }
        let header = format!(
            "{} PR(s) from git history are missing from CHANGELOG.md:",
            self.missing.len()
        );
        listing(header, &self.missing, MAX_MISSING_SHOWN)
    }

    /// Warning lines listing PRs the history does not know about
    pub fn warnings(&self) -> Vec<String> {
        if self.extra.is_empty() {
            return Vec::new();
        }
        let header = format!(
            "{} PR(s) in CHANGELOG.md not found in git history:",
            self.extra.len()
        );
        listing(header, &self.extra, MAX_EXTRA_SHOWN)
    }
}

fn listing(header: String, prs: &[u64], limit: usize) -> Vec<String> {
    let mut lines = vec![header];
    lines.extend(prs.iter().take(limit).map(|pr| format!("  - #{}", pr)));
    if prs.len() > limit {
        lines.push(format!("  ... and {} more", prs.len() - limit));
    }
    lines
}

/// Sorted unique PR numbers referenced by non-automation commit subjects
pub fn extract_prs_from_git_history(log: &[GitLogEntry], rules: &Rules) -> Vec<u64> {
    log.iter()
        .filter(|commit| !rules.is_automation_author(&commit.author))
        .flat_map(|commit| SUBJECT_PR_RE.captures_iter(&commit.subject))
        .filter_map(|captures| captures[1].parse().ok())
        .collect::<BTreeSet<u64>>()
        .into_iter()
        .collect()
}

/// Sorted unique PR numbers written as `[#N]` or a bare `(#N)`
pub fn extract_prs_from_changelog(content: &str) -> Vec<u64> {
    let mut prs = BTreeSet::<u64>::new();

    for captures in LINKED_PR_RE.captures_iter(content) {
        if let Ok(number) = captures[1].parse() {
            prs.insert(number);
        }
    }

    for captures in BARE_PR_RE.captures_iter(content) {
        let end = captures.get(0).map_or(0, |m| m.end());
        if content[end..].starts_with(']') {
            continue;
        }
        if let Ok(number) = captures[1].parse() {
            prs.insert(number);
        }
    }

    prs.into_iter().collect()
}

/// Compare PRs from git history with PRs from the changelog
pub fn check_coverage(git_prs: &[u64], changelog_prs: &[u64]) -> CoverageReport {
    let git: BTreeSet<u64> = git_prs.iter().copied().collect();
    let changelog: BTreeSet<u64> = changelog_prs.iter().copied().collect();

    let report = CoverageReport {
        git_total: git.len(),
        missing: git.difference(&changelog).copied().collect(),
        extra: changelog.difference(&git).copied().collect(),
    };

    tracing::debug!(
        git = report.git_total,
        missing = report.missing.len(),
        extra = report.extra.len(),
        "checked PR coverage"
    );
    report
}
