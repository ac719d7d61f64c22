use crate::domain::category::{Category, CategoryMap};
use regex::Regex;
use std::sync::LazyLock;

/// `type(scope)!: description`
static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\(([^)]*)\))?(!)?:\s*(.+)$").expect("conventional commit regex")
});

/// One commit from the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLogEntry {
    pub hash: String,
    /// First line of the message
    pub subject: String,
    pub author: String,
    /// ISO-8601 author date
    pub date: Option<String>,
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message according to the conventional commits spec.
    ///
    /// Only the first line is matched against `type(scope)!: description`;
    /// a `BREAKING CHANGE:` footer anywhere in the message also marks the
    /// commit as breaking. Returns `None` for non-conventional messages.
    pub fn parse(message: &str) -> Option<Self> {
        let subject = message.lines().next().unwrap_or("").trim();
        let captures = CONVENTIONAL_RE.captures(subject)?;

        let r#type = captures.get(1)?.as_str().to_string();
        let scope = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());
        let has_exclamation = captures.get(3).is_some();
        let description = captures.get(4)?.as_str().trim().to_string();

        let is_breaking_change = has_exclamation
            || message.contains("BREAKING CHANGE:")
            || message.contains("BREAKING-CHANGE:");

        Some(ParsedCommit {
            r#type,
            scope,
            description,
            is_breaking_change,
        })
    }

    /// Changelog category implied by the commit type
    pub fn category(&self, categories: &CategoryMap) -> Category {
        categories.normalize(&self.r#type)
    }
}

/// Strip a conventional prefix if present, returning the description
pub fn strip_conventional_prefix(text: &str) -> &str {
    CONVENTIONAL_RE
        .captures(text)
        .and_then(|c| c.get(4))
        .map(|m| m.as_str())
        .unwrap_or(text)
}
