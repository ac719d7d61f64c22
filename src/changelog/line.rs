//! Classification of single changelog lines.

use regex::Regex;
use std::sync::LazyLock;

/// `## [VERSION]` or `## [VERSION] - DATE`; any token after the dash is
/// captured as the date so the validator can report malformed ones.
static VERSION_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+\[([^\]]+)\](?:\s+-\s+(\S+))?").expect("version heading regex")
});

/// A changelog line, classified by its Markdown role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `# Title`
    Title(&'a str),
    /// `## [label] - date`
    VersionHeading { label: &'a str, date: Option<&'a str> },
    /// A `## ` heading without a bracketed label
    MalformedVersionHeading(&'a str),
    /// `### Heading`
    CategoryHeading(&'a str),
    /// `_italic notice_`
    Notice(&'a str),
    /// `- entry` or `* entry`
    Entry(&'a str),
    Blank,
    Text(&'a str),
}

impl<'a> Line<'a> {
    /// Classify one line; surrounding whitespace is ignored
    pub fn classify(raw: &'a str) -> Self {
        let line = raw.trim();

        if line.is_empty() {
            return Line::Blank;
        }

        if let Some(rest) = line.strip_prefix("# ") {
            return Line::Title(rest.trim());
        }

        if line.starts_with("## ") {
            return match VERSION_HEADING_RE.captures(line) {
                Some(captures) => {
                    let label = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                    let date = captures.get(2).map(|m| m.as_str());
                    Line::VersionHeading { label, date }
                }
                None => Line::MalformedVersionHeading(line),
            };
        }

        if let Some(rest) = line.strip_prefix("### ") {
            return Line::CategoryHeading(rest.trim());
        }

        if line.len() >= 2 && line.starts_with('_') && line.ends_with('_') {
            return Line::Notice(line[1..line.len() - 1].trim());
        }

        if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            return Line::Entry(rest.trim());
        }

        Line::Text(line)
    }
}
