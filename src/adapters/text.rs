//! Text heuristics shared by the adapters: emoji and ticket removal,
//! imperative-mood rewriting and PR title cleanup.

use crate::domain::commit::strip_conventional_prefix;
use regex::Regex;
use std::sync::LazyLock;

/// Appended to entries that carry no reference at all
pub const TODO_REFERENCE_MARKER: &str = "<!-- TODO: Add PR/commit reference -->";

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\x{1F300}-\x{1F9FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{1F600}-\x{1F64F}",
        r"\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{FE00}-\x{FE0F}\x{200D}\x{2B50}",
        r"\x{2705}\x{2728}\x{2764}\x{1FA00}-\x{1FAFF}]"
    ))
    .expect("emoji regex")
});

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i):[a-z_]+:").expect("shortcode regex"));

/// `[EN-123]` or `(EN-123)` anywhere, `EN-123:` or `EN-123 -` at the start;
/// keys are upper case only so tokens like `UTF-8` mid-title survive
static TICKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(][A-Z]{2,}-\d+[\])][:\s-]*|^[A-Z]{2,}-\d+\s*[:-]\s*").expect("ticket regex")
});

static LEADING_TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?[A-Z]{2,}-\d+\]?[:\s-]*").expect("leading ticket regex"));

/// `Part 1/4 -`, `PR 2/3:`, `(1/2)`
static PR_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?(?:Part|PR)?\s*\d+/\d+\)?[:\s-]*").expect("pr part regex")
});

static TRAILING_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(?(?:PR\s*)?#\d+\)?$").expect("trailing pr regex"));

static INLINE_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(#\d+\)").expect("inline pr regex"));

static NOISE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(wip|draft|tmp|temp)[:\s-]*").expect("noise word regex"));

static EDGE_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s\-:\[\]()]+|[\s\-:\[\]()]+$").expect("edge noise regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Past-tense and narrative openings rewritten to the imperative
static IMPERATIVE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)^Added\s+", "Add "),
        (r"(?i)^Fixed\s+", "Fix "),
        (r"(?i)^Removed\s+", "Remove "),
        (r"(?i)^Changed\s+", "Change "),
        (r"(?i)^Updated\s+", "Update "),
        (r"(?i)^The\s+(\w+)\s+now\s+", "Make ${1} "),
        (r"(?i)^We\s+have\s+added\s+", "Add "),
        (r"(?i)^This\s+release\s+includes\s+", ""),
    ]
    .iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("imperative regex"), *replacement))
    .collect()
});

/// Remove emoji characters and trim
pub fn remove_emojis(text: &str) -> String {
    EMOJI_RE.replace_all(text, "").trim().to_string()
}

/// Upper-case the first character
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove a leading ticket key such as `[ENG-12]` or `ENG-12:`
pub fn strip_leading_ticket(text: &str) -> String {
    LEADING_TICKET_RE.replace(text, "").trim().to_string()
}

/// Rewrite common past-tense openings into the imperative mood
pub fn to_imperative_mood(text: &str) -> String {
    let mut result = text.to_string();
    for (pattern, replacement) in IMPERATIVE_RULES.iter() {
        result = pattern.replace(&result, *replacement).into_owned();
    }
    capitalize_first(&result)
}

/// Check for breaking-change indicators in a commit subject
pub fn looks_breaking(text: &str) -> bool {
    text.contains("!:") || text.contains("BREAKING") || text.to_lowercase().contains("breaking change")
}

/// Turn a PR or commit title into changelog entry text.
///
/// Strips emoji, shortcodes, PR numbers, ticket keys, part markers, a
/// conventional prefix and leading noise words. Falls back to the trimmed
/// input when nothing is left.
pub fn clean_pr_title(text: &str) -> String {
    let mut cleaned = remove_emojis(text);
    cleaned = SHORTCODE_RE.replace_all(&cleaned, "").into_owned();
    cleaned = TRAILING_PR_RE.replace_all(&cleaned, "").into_owned();
    cleaned = INLINE_PR_RE.replace_all(&cleaned, "").into_owned();
    cleaned = TICKET_RE.replace_all(&cleaned, "").into_owned();
    cleaned = PR_PART_RE.replace_all(&cleaned, "").into_owned();
    cleaned = strip_conventional_prefix(&cleaned).to_string();
    cleaned = NOISE_WORD_RE.replace(&cleaned, "").into_owned();
    cleaned = EDGE_NOISE_RE.replace_all(&cleaned, "").into_owned();
    cleaned = WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string();

    if cleaned.is_empty() {
        text.trim().to_string()
    } else {
        capitalize_first(&cleaned)
    }
}
