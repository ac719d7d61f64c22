//! Conversion of legacy changelogs into Common Changelog.

use crate::adapters::text::{to_imperative_mood, TODO_REFERENCE_MARKER};
use crate::changelog::model::{Change, Changelog, Release, UNRELEASED};
use crate::changelog::reference::{extract_references, has_reference_hint, strip_references};
use crate::changelog::render::{render_changelog, RenderOptions, COMMON_CHANGELOG_INTRO};
use crate::config::Rules;
use crate::domain::version::is_valid_version;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `## [label]`, `## 1.2.3`, `## v1.2` with an optional ` - YYYY-MM-DD`
static LEGACY_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^##\s*(?:\[(.+?)\]|(v?\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.-]+)?))(?:\s*-\s*(\d{4}-\d{2}-\d{2}))?",
    )
    .expect("legacy version regex")
});

static LEGACY_CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s*(\w+)").expect("legacy category regex"));

static LEGACY_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").expect("legacy entry regex"));

static DEPRECATED_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^deprecate[ds]?\s+").expect("deprecated prefix regex"));

static BREAKING_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*?\*?breaking:?\*?\*?\s*").expect("breaking word regex"));

static CONVENTIONAL_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^#{1,3}\s*(feat|fix|chore|refactor)\s*[:(]").expect("conventional heading regex")
});

static SEMVER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,2}\s*\[?\d+\.\d+").expect("semver heading regex"));

/// Changelog dialect recognised in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    CommonChangelog,
    KeepAChangelog,
    Conventional,
    SemverMarkdown,
    Custom,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::CommonChangelog => "common-changelog",
            SourceFormat::KeepAChangelog => "keep-a-changelog",
            SourceFormat::Conventional => "conventional",
            SourceFormat::SemverMarkdown => "semver-markdown",
            SourceFormat::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Summary of a completed migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub format: SourceFormat,
    pub release_count: usize,
    /// Entries that received the TODO reference marker
    pub todo_count: usize,
    pub output: String,
}

/// Result of [`migrate_changelog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Input is already Common Changelog; nothing to do
    AlreadyCommonChangelog,
    Migrated(MigrationReport),
}

/// Guess the dialect of an existing changelog
pub fn detect_format(content: &str) -> SourceFormat {
    let lower = content.to_lowercase();

    if lower.contains("common-changelog") && lower.contains(".org") {
        return SourceFormat::CommonChangelog;
    }

    if (lower.contains("keepachangelog") && lower.contains(".com"))
        || lower.contains("keep a changelog")
    {
        return SourceFormat::KeepAChangelog;
    }

    if CONVENTIONAL_HEADING_RE.is_match(content) {
        return SourceFormat::Conventional;
    }

    if SEMVER_HEADING_RE.is_match(content) {
        return SourceFormat::SemverMarkdown;
    }

    SourceFormat::Custom
}

/// Normalise a legacy heading label: `unreleased` in any case, and a `v`
/// prefix dropped when the rest is valid semver
fn normalize_label(label: &str) -> String {
    let label = label.trim();
    if label.eq_ignore_ascii_case(UNRELEASED) {
        return UNRELEASED.to_string();
    }
    match label.strip_prefix('v') {
        Some(rest) if is_valid_version(rest) => rest.to_string(),
        _ => label.to_string(),
    }
}

/// Convert one legacy entry into a change
fn convert_entry(raw: &str) -> (Change, bool) {
    let lower = raw.to_lowercase();
    let mut text = raw.to_string();

    if lower.contains("deprecat") && !lower.starts_with("deprecate ") {
        text = format!("Deprecate {}", DEPRECATED_PREFIX_RE.replace(&text, ""));
    }

    let breaking = lower.contains("breaking");
    if breaking {
        text = BREAKING_WORD_RE.replace(&text, "").into_owned();
    }

    text = to_imperative_mood(&text);

    let needs_todo = !has_reference_hint(&text);
    let references = extract_references(&text);
    let mut text = strip_references(&text);
    if needs_todo {
        text.push(' ');
        text.push_str(TODO_REFERENCE_MARKER);
    }

    let change = Change {
        text,
        references,
        breaking,
    };
    (change, needs_todo)
}

/// Parse a legacy changelog into the release tree.
///
/// Returns the tree and the number of entries missing a reference.
pub fn parse_legacy(content: &str, rules: &Rules) -> (Changelog, usize) {
    let mut changelog = Changelog::default();
    let mut todo_count = 0;
    let mut current = None;

    for line in content.split('\n') {
        if let Some(captures) = LEGACY_VERSION_RE.captures(line) {
            let label = captures
                .get(1)
                .or_else(|| captures.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let date = captures.get(3).map(|m| m.as_str().to_string());
            changelog.releases.push(Release::new(normalize_label(label), date));
            current = None;
            continue;
        }

        let Some(release) = changelog.releases.last_mut() else {
            continue;
        };

        if let Some(captures) = LEGACY_CATEGORY_RE.captures(line) {
            current = Some(rules.categories.normalize(&captures[1]));
            continue;
        }

        if let (Some(category), Some(captures)) = (current, LEGACY_ENTRY_RE.captures(line)) {
            let (change, needs_todo) = convert_entry(&captures[1]);
            if needs_todo {
                todo_count += 1;
            }
            release.group_mut(category).changes.push(change);
        }
    }

    (changelog, todo_count)
}

/// Migrate legacy changelog text to Common Changelog
pub fn migrate_changelog(content: &str, repo_url: Option<&str>, rules: &Rules) -> MigrationOutcome {
    let format = detect_format(content);
    tracing::info!(%format, "detected changelog format");

    if format == SourceFormat::CommonChangelog {
        return MigrationOutcome::AlreadyCommonChangelog;
    }

    let (changelog, todo_count) = parse_legacy(content, rules);
    let output = render_changelog(
        &changelog,
        &RenderOptions {
            intro: COMMON_CHANGELOG_INTRO,
            preface: None,
            repo_url,
        },
    );

    MigrationOutcome::Migrated(MigrationReport {
        format,
        release_count: changelog.releases.len(),
        todo_count,
        output,
    })
}
