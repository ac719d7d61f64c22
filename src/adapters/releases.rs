//! Conversion of GitHub Releases into a changelog.

use crate::adapters::text::{capitalize_first, TODO_REFERENCE_MARKER};
use crate::changelog::model::{Change, Changelog, Reference, Release};
use crate::changelog::reference::strip_references;
use crate::changelog::render::{render_changelog, RenderOptions, COMMON_CHANGELOG_INTRO};
use crate::diagnostic::truncate;
use crate::domain::Category;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Paragraph written under the intro of imported changelogs
pub const IMPORT_PREFACE: &str = "_Imported from GitHub releases._";

/// Prefix of every TODO marker the adapters emit
const TODO_PREFIX: &str = "<!-- TODO:";

/// Keyword lists checked in this order
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Added,
        &["add", "new", "feature", "implement", "create", "introduce", "support"],
    ),
    (
        Category::Fixed,
        &["fix", "bug", "patch", "resolve", "correct", "repair", "security"],
    ),
    (
        Category::Removed,
        &["remove", "delete", "drop", "deprecate", "eliminate"],
    ),
    (
        Category::Changed,
        &["change", "update", "modify", "refactor", "improve", "enhance", "upgrade"],
    ),
];

/// Longest prose line kept as an entry
const PROSE_LIMIT: usize = 100;

static CONVENTIONAL_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|chore|refactor|docs|style|perf|test|build|ci)[\s(:]")
        .expect("conventional prefix regex")
});

static CONVENTIONAL_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(feat|fix|chore|refactor|docs|style|perf|test|build|ci)(\([^)]*\))?!?:\s*")
        .expect("conventional strip regex")
});

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s*(\w+)").expect("release header regex"));

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s+(.+)$").expect("list item regex"));

static TRAILING_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(#\d+\)\s*$").expect("trailing pr regex"));

/// ` in https://github.com/o/r/pull/12` from generated release notes
static PR_URL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+in\s+https?://\S+/pull/(\d+)\s*$").expect("pr url suffix regex")
});

static AUTHOR_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*by\s+@[\w-]+\s*$").expect("author suffix regex"));

static PR_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("pr number regex"));

static TAG_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^version[-_]?").expect("tag prefix regex"));

/// A release as returned by the GitHub REST API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
}

/// Conversion settings
#[derive(Debug, Clone, Default)]
pub struct ImportOptions<'a> {
    pub repo_url: Option<&'a str>,
    pub include_prerelease: bool,
}

/// Output of [`convert_releases`]
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub changelog: Changelog,
    pub markdown: String,
    /// Releases written (after prerelease filtering)
    pub release_count: usize,
    /// TODO markers left for a human
    pub todo_count: usize,
}

/// Version label from a tag: `v1.2.0` and `version-1.2.0` become `1.2.0`
pub fn version_from_tag(tag: &str) -> String {
    let tag = TAG_PREFIX_RE.replace(tag, "").into_owned();
    tag.strip_prefix('v').unwrap_or(tag.as_str()).to_string()
}

/// Calendar date part of an ISO-8601 timestamp
pub fn date_from_published(published_at: Option<&str>) -> Option<String> {
    published_at
        .and_then(|p| p.split('T').next())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Category implied by a heading word, if any keyword matches
fn category_from_header(word: &str) -> Option<Category> {
    let lower = word.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}

/// Categorize a release-note line by conventional prefix, then keywords
pub fn categorize_entry(text: &str) -> Category {
    let lower = text.to_lowercase();

    if let Some(captures) = CONVENTIONAL_PREFIX_RE.captures(&lower) {
        return match &captures[1] {
            "feat" => Category::Added,
            "fix" => Category::Fixed,
            _ => Category::Changed,
        };
    }

    let body = lower.trim_start_matches(['-', '*', '•']).trim_start();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| body.starts_with(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Changed)
}

fn pr_reference(number: u64, repo_url: Option<&str>) -> Reference {
    let url = repo_url
        .map(|repo| format!("{}/pull/{}", repo, number))
        .unwrap_or_default();
    Reference::pull_request(number, url)
}

/// Convert one list item into a change
fn parse_list_item(text: &str, repo_url: Option<&str>) -> Change {
    let mut number = None;
    let mut clean = text.to_string();

    if let Some(captures) = PR_URL_SUFFIX_RE.captures(text) {
        number = captures[1].parse::<u64>().ok();
        clean = PR_URL_SUFFIX_RE.replace(&clean, "").into_owned();
    }

    clean = TRAILING_PR_RE.replace(&clean, "").into_owned();
    clean = AUTHOR_SUFFIX_RE.replace(&clean, "").into_owned();
    clean = CONVENTIONAL_STRIP_RE.replace(&clean, "").trim().to_string();
    // the number becomes a reference, so it must not stay in the text
    clean = capitalize_first(&strip_references(&clean));

    if number.is_none() {
        number = PR_NUMBER_RE
            .captures(text)
            .and_then(|c| c[1].parse::<u64>().ok());
    }

    match number {
        Some(number) => Change::new(clean).with_reference(pr_reference(number, repo_url)),
        None => Change::new(format!("{} {}", clean, TODO_REFERENCE_MARKER)),
    }
}

/// Parse a release body into categorized changes.
///
/// Headings switch the category for the list items under them; lists
/// outside a recognised heading and longer prose lines are categorized one
/// by one.
pub fn parse_release_body(body: &str, repo_url: Option<&str>) -> Vec<(Category, Change)> {
    let mut entries = Vec::new();
    let mut current: Option<Category> = None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(captures) = HEADER_RE.captures(line) {
            if let Some(category) = category_from_header(&captures[1]) {
                current = Some(category);
            }
            continue;
        }

        if let Some(captures) = LIST_ITEM_RE.captures(line) {
            let text = &captures[1];
            let category = current.unwrap_or_else(|| categorize_entry(text));
            entries.push((category, parse_list_item(text, repo_url)));
            continue;
        }

        if line.chars().count() > 20 && !line.starts_with('#') {
            let text = format!("{} {}", truncate(line, PROSE_LIMIT), TODO_REFERENCE_MARKER);
            entries.push((categorize_entry(line), Change::new(text)));
        }
    }

    entries
}

/// Release section for one GitHub release
fn convert_release(release: &GitHubRelease, repo_url: Option<&str>) -> Release {
    let mut section = Release::new(
        version_from_tag(&release.tag_name),
        date_from_published(release.published_at.as_deref()),
    );

    let entries = parse_release_body(release.body.as_deref().unwrap_or_default(), repo_url);

    if entries.is_empty() {
        let name = release.name.as_deref().unwrap_or(&release.tag_name);
        section.group_mut(Category::Changed).changes.push(Change::new(format!(
            "Release {} <!-- TODO: Add details from git history -->",
            name
        )));
        return section;
    }

    for (category, change) in entries {
        section.group_mut(category).changes.push(change);
    }
    section
}

/// Convert GitHub releases into a Common Changelog document
pub fn convert_releases(releases: &[GitHubRelease], options: &ImportOptions<'_>) -> ImportResult {
    let mut selected: Vec<&GitHubRelease> = releases
        .iter()
        .filter(|r| options.include_prerelease || !r.prerelease)
        .collect();
    selected.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    tracing::info!(
        fetched = releases.len(),
        selected = selected.len(),
        "converting releases"
    );

    let mut changelog = Changelog::default();
    changelog.releases.push(Release::unreleased());
    changelog
        .releases
        .extend(selected.iter().map(|r| convert_release(r, options.repo_url)));

    let markdown = render_changelog(
        &changelog,
        &RenderOptions {
            intro: COMMON_CHANGELOG_INTRO,
            preface: Some(IMPORT_PREFACE),
            repo_url: options.repo_url,
        },
    );
    let todo_count = markdown.matches(TODO_PREFIX).count();

    ImportResult {
        changelog,
        markdown,
        release_count: selected.len(),
        todo_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, body: Option<&str>, published_at: Option<&str>, prerelease: bool) -> GitHubRelease {
        GitHubRelease {
            tag_name: tag.to_string(),
            name: None,
            body: body.map(str::to_string),
            published_at: published_at.map(str::to_string),
            prerelease,
        }
    }

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v1.2.0"), "1.2.0");
        assert_eq!(version_from_tag("version-2.0.0"), "2.0.0");
        assert_eq!(version_from_tag("Version_3.1.0"), "3.1.0");
        assert_eq!(version_from_tag("1.0.0"), "1.0.0");
    }

    #[test]
    fn test_date_from_published() {
        assert_eq!(
            date_from_published(Some("2024-03-01T12:00:00Z")),
            Some("2024-03-01".to_string())
        );
        assert_eq!(date_from_published(None), None);
        assert_eq!(date_from_published(Some("")), None);
    }

    #[test]
    fn test_categorize_entry() {
        assert_eq!(categorize_entry("feat: add search"), Category::Added);
        assert_eq!(categorize_entry("fix(ui): button"), Category::Fixed);
        assert_eq!(categorize_entry("chore: bump deps"), Category::Changed);
        assert_eq!(categorize_entry("New export format"), Category::Added);
        assert_eq!(categorize_entry("Resolve race in cache"), Category::Fixed);
        assert_eq!(categorize_entry("Drop Node 16"), Category::Removed);
        assert_eq!(categorize_entry("Tweak wording"), Category::Changed);
    }

    #[test]
    fn test_parse_release_body_with_headings() {
        let body = "## Features\n- feat(api): add search (#12)\n\n## Bug Fixes\n* fix crash by @octocat\n";
        let entries = parse_release_body(body, Some("https://github.com/o/r"));
        assert_eq!(entries.len(), 2);

        let (category, change) = &entries[0];
        assert_eq!(*category, Category::Added);
        assert_eq!(change.text, "Add search");
        assert_eq!(
            change.references,
            vec![Reference::pull_request(12, "https://github.com/o/r/pull/12")]
        );

        let (category, change) = &entries[1];
        assert_eq!(*category, Category::Fixed);
        assert_eq!(change.text, "Fix crash <!-- TODO: Add PR/commit reference -->");
    }

    #[test]
    fn test_mid_line_pr_number_is_not_duplicated() {
        let entries = parse_release_body("- Fix retry loop (#31) in the uploader\n", None);
        let change = &entries[0].1;
        assert_eq!(change.text, "Fix retry loop in the uploader");
        assert_eq!(change.references, vec![Reference::pull_request(31, "")]);
    }

    #[test]
    fn test_parse_generated_release_notes() {
        let body = "## What's Changed\n* Add retries by @dev in https://github.com/o/r/pull/7\n";
        let entries = parse_release_body(body, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1.text, "Add retries");
        assert_eq!(entries[0].1.references, vec![Reference::pull_request(7, "")]);
    }

    #[test]
    fn test_parse_prose_lines() {
        let entries = parse_release_body("This version improves startup time considerably.", None);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].1.text.ends_with(TODO_REFERENCE_MARKER));
        assert!(parse_release_body("Short note", None).is_empty());
    }

    #[test]
    fn test_convert_releases() {
        let releases = vec![
            release("v1.0.0", Some("- Add API (#1)"), Some("2024-01-01T00:00:00Z"), false),
            release("v1.1.0-rc.1", Some("- Add beta (#2)"), Some("2024-01-15T00:00:00Z"), true),
            release("v1.1.0", None, Some("2024-02-01T00:00:00Z"), false),
        ];

        let result = convert_releases(&releases, &ImportOptions::default());
        let labels: Vec<&str> = result.changelog.releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(labels, vec!["Unreleased", "1.1.0", "1.0.0"]);
        assert_eq!(result.release_count, 2);
        assert_eq!(result.todo_count, 1);
        assert!(result.markdown.contains(IMPORT_PREFACE));
        assert!(result
            .markdown
            .contains("- Release v1.1.0 <!-- TODO: Add details from git history -->"));

        let with_pre = convert_releases(
            &releases,
            &ImportOptions {
                repo_url: None,
                include_prerelease: true,
            },
        );
        assert_eq!(with_pre.release_count, 3);
        assert_eq!(with_pre.changelog.releases[2].version, "1.1.0-rc.1");
    }

    #[test]
    fn test_deserialize_release() {
        let json = r#"{"tag_name":"v2.0.0","name":null,"body":"- Fix x (#3)","published_at":"2024-05-01T00:00:00Z","prerelease":false}"#;
        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v2.0.0");
        assert_eq!(release.name, None);
        assert!(!release.prerelease);
    }
}
