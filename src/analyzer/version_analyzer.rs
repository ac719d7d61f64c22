use crate::changelog::model::{Changelog, Release};
use crate::config::Rules;
use crate::domain::version::suggest_next_version;
use crate::domain::{Category, CategoryMap, ChangeSummary, GitLogEntry, ParsedCommit, ParsedVersion};
use crate::error::{ChangelogError, Result};

/// Suggested version for the pending changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    /// Latest released version the suggestion builds on
    pub current: String,
    pub summary: ChangeSummary,
    pub next: ParsedVersion,
}

/// Summarises pending changes to decide the next version
pub struct VersionAnalyzer {
    categories: CategoryMap,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(rules: &Rules) -> Self {
        VersionAnalyzer {
            categories: rules.categories.clone(),
        }
    }

    /// Summarise a changelog section: breaking entries, Added entries, anything else
    pub fn summarize_release(&self, release: &Release) -> ChangeSummary {
        let mut summary = ChangeSummary::default();

        for group in release.groups.iter().filter(|g| !g.changes.is_empty()) {
            if group.changes.iter().any(|c| c.breaking) {
                summary.has_breaking = true;
            }
            match group.category {
                Category::Added => summary.has_features = true,
                _ => summary.has_fixes = true,
            }
        }

        summary
    }

    /// Summarise conventional commit messages; other messages are ignored
    pub fn summarize_messages<S: AsRef<str>>(&self, messages: &[S]) -> ChangeSummary {
        let mut summary = ChangeSummary::default();

        for parsed in messages.iter().filter_map(|m| ParsedCommit::parse(m.as_ref())) {
            if parsed.is_breaking_change {
                summary.has_breaking = true;
            }
            match parsed.category(&self.categories) {
                Category::Added => summary.has_features = true,
                _ => summary.has_fixes = true,
            }
        }

        summary
    }

    /// Suggest the next version from the changelog's Unreleased section.
    ///
    /// When that section is missing or empty, commits dated after the latest
    /// release are summarised instead. Returns `Ok(None)` when nothing is
    /// pending.
    ///
    /// # Returns
    /// * `Err` - If the changelog has no valid released version to build on
    pub fn next_version(
        &self,
        changelog: &Changelog,
        history: &[GitLogEntry],
    ) -> Result<Option<NextVersion>> {
        let latest = changelog
            .latest_release()
            .ok_or_else(|| ChangelogError::changelog("No released version found"))?;

        let summary = match changelog.unreleased().filter(|r| r.changes().next().is_some()) {
            Some(unreleased) => self.summarize_release(unreleased),
            None => {
                let subjects: Vec<&str> = commits_since(history, latest.date.as_deref())
                    .map(|c| c.subject.as_str())
                    .collect();
                tracing::debug!(commits = subjects.len(), "Unreleased is empty, using git history");
                self.summarize_messages(&subjects)
            }
        };

        if summary == ChangeSummary::default() {
            return Ok(None);
        }

        let next = suggest_next_version(&latest.version, summary)?;
        Ok(Some(NextVersion {
            current: latest.version.clone(),
            summary,
            next,
        }))
    }
}

/// Commits whose date falls after `date` (`YYYY-MM-DD`); every commit when undated
fn commits_since<'a>(
    history: &'a [GitLogEntry],
    date: Option<&'a str>,
) -> impl Iterator<Item = &'a GitLogEntry> {
    history.iter().filter(move |commit| match (date, commit.date.as_deref()) {
        (Some(release), Some(committed)) => committed.get(..10).unwrap_or(committed) > release,
        _ => true,
    })
}
