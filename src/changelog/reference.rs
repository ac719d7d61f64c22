//! Reference extraction and cleanup for changelog entry lines.
//!
//! Accepted forms: `[#123](url)`, bare `(#123)` and ``[`abc1234`](url)``.

use crate::changelog::model::{Reference, ReferenceKind};
use regex::Regex;
use std::sync::LazyLock;

static PR_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[#(\d+)\]\(([^)]+)\)").expect("pr link regex"));

static PR_STANDALONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("standalone pr regex"));

static COMMIT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[`([a-f0-9]{7,40})`\]\(([^)]+)\)").expect("commit link regex"));

static BREAKING_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Breaking:\*\*\s*").expect("breaking prefix regex"));

/// Wrapped forms first so their parentheses go with them
static CLEANUP_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\s*\(\[#\d+\]\([^)]+\)\)",
        r"\s*\(\[`[a-f0-9]{7,40}`\]\([^)]+\)\)",
        r"\s*\(#\d+\)",
        r"\s*\[#\d+\]\([^)]+\)",
        r"\s*\[`[a-f0-9]{7,40}`\]\([^)]+\)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("reference cleanup regex"))
    .collect()
});

/// Looser reference shapes: `#12`, commit hashes, GitHub URLs, Jira keys
static REFERENCE_HINT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"#\d+",
        r"(?i)\b[a-f0-9]{7,40}\b",
        r"https?://github\.com/[^/]+/[^/]+/(pull|issues|commit)",
        r"\b[A-Z]{2,}-\d+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("reference hint regex"))
    .collect()
});

/// Extract references (PR, issue, commit) from a change line.
///
/// Bare `(#N)` references are skipped when the same number was already seen
/// as a link.
pub fn extract_references(line: &str) -> Vec<Reference> {
    let mut references: Vec<Reference> = Vec::new();

    for captures in PR_LINK_RE.captures_iter(line) {
        let Ok(number) = captures[1].parse::<u64>() else {
            continue;
        };
        let url = captures[2].to_string();
        if url.contains("/issues/") {
            references.push(Reference::issue(number, url));
        } else {
            references.push(Reference::pull_request(number, url));
        }
    }

    for captures in PR_STANDALONE_RE.captures_iter(line) {
        let whole = captures.get(0).map(|m| m.end()).unwrap_or(0);
        // `(#1)]` is the inside of a link label, not a bare reference
        if line[whole..].starts_with(']') {
            continue;
        }
        let Ok(number) = captures[1].parse::<u64>() else {
            continue;
        };
        if references.iter().any(|r| r.number() == Some(number)) {
            continue;
        }
        references.push(Reference::pull_request(number, ""));
    }

    for captures in COMMIT_LINK_RE.captures_iter(line) {
        references.push(Reference::commit(&captures[1], &captures[2]));
    }

    references
}

/// Check if a line carries the `**Breaking:**` marker
pub fn is_breaking(text: &str) -> bool {
    BREAKING_PREFIX_RE.is_match(text)
}

/// Remove every reference form from the text
pub fn strip_references(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in CLEANUP_RES.iter() {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result.trim().to_string()
}

/// Display text of an entry: breaking marker and references removed
pub fn clean_change_text(text: &str) -> String {
    strip_references(&BREAKING_PREFIX_RE.replace(text, ""))
}

/// Check if text mentions anything that looks like a reference
pub fn has_reference_hint(text: &str) -> bool {
    REFERENCE_HINT_RES.iter().any(|re| re.is_match(text))
}

/// Render a reference the way the canonical format writes it
pub fn render_reference(reference: &Reference) -> String {
    match &reference.kind {
        ReferenceKind::PullRequest { number } | ReferenceKind::Issue { number } => {
            if reference.url.is_empty() {
                format!("(#{})", number)
            } else {
                format!("([#{}]({}))", number, reference.url)
            }
        }
        ReferenceKind::Commit { hash } => format!("([`{}`]({}))", hash, reference.url),
    }
}
