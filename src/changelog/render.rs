//! Canonical Common Changelog rendering.

use crate::changelog::model::{Change, Changelog, Release};
use crate::changelog::reference::render_reference;

/// Marker for the breaking-change prefix
pub const BREAKING_MARKER: &str = "**Breaking:**";

/// Blockquote placed under the title of generated changelogs
pub const COMMON_CHANGELOG_INTRO: &[&str] = &[
    "This project follows [Common Changelog](https://common-changelog.org/) with an",
    "[Unreleased section extension](.skills/changelog/references/unreleased-extension.md).",
];

/// Rendering knobs
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// Lines written as a `> ` blockquote under the title
    pub intro: &'a [&'a str],
    /// Extra paragraph (usually `_..._`) written after the intro
    pub preface: Option<&'a str>,
    /// Repository URL; when set, link definitions are appended
    pub repo_url: Option<&'a str>,
}

/// Render one change as a list item
pub fn render_change(change: &Change) -> String {
    let mut line = String::from("- ");
    if change.breaking {
        line.push_str(BREAKING_MARKER);
        line.push(' ');
    }
    line.push_str(&change.text);
    for reference in &change.references {
        line.push(' ');
        line.push_str(&render_reference(reference));
    }
    line
}

/// Render a release heading
pub fn render_heading(release: &Release) -> String {
    match &release.date {
        Some(date) if !release.is_unreleased() => format!("## [{}] - {}", release.version, date),
        _ => format!("## [{}]", release.version),
    }
}

fn render_release(release: &Release, lines: &mut Vec<String>) {
    lines.push(render_heading(release));
    lines.push(String::new());

    if let Some(notice) = &release.notice {
        lines.push(format!("_{}_", notice));
        lines.push(String::new());
    }

    for group in &release.groups {
        lines.push(format!("### {}", group.category));
        lines.push(String::new());
        for change in &group.changes {
            lines.push(render_change(change));
        }
        lines.push(String::new());
    }
}

/// Link definitions for release headings
fn render_links(changelog: &Changelog, repo_url: &str, lines: &mut Vec<String>) {
    let latest = changelog.latest_release().map(|r| r.version.as_str());

    for release in &changelog.releases {
        if release.is_unreleased() {
            if let Some(latest) = latest {
                lines.push(format!(
                    "[Unreleased]: {}/compare/v{}...HEAD",
                    repo_url, latest
                ));
            }
        } else {
            lines.push(format!(
                "[{}]: {}/releases/tag/v{}",
                release.version, repo_url, release.version
            ));
        }
    }
}

/// Render a changelog in the canonical format.
///
/// Groups are written in stored order under their canonical category name;
/// parsing the output yields the same tree.
pub fn render_changelog(changelog: &Changelog, options: &RenderOptions<'_>) -> String {
    let mut lines = vec![format!("# {}", changelog.title), String::new()];

    if !options.intro.is_empty() {
        lines.extend(options.intro.iter().map(|l| format!("> {}", l)));
        lines.push(String::new());
    }

    if let Some(preface) = options.preface {
        lines.push(preface.to_string());
        lines.push(String::new());
    }

    for release in &changelog.releases {
        render_release(release, &mut lines);
    }

    if let Some(repo_url) = options.repo_url {
        if !changelog.releases.is_empty() {
            render_links(changelog, repo_url, &mut lines);
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
