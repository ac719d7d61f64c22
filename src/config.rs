use crate::domain::category::{default_aliases, Category, CategoryMap};
use crate::error::{ChangelogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "changelog-kit.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".changelog-kit.toml";

/// Represents the complete configuration for changelog-kit.
///
/// Holds the lookup tables used by the parser, validator and adapters, plus
/// where the changelog lives and which repository it documents.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_changelog_path")]
    pub changelog_path: String,

    /// Repository URL used to build PR and release links (e.g. https://github.com/org/repo)
    #[serde(default)]
    pub repo_url: Option<String>,

    #[serde(default)]
    pub categories: CategoriesConfig,

    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub automation: AutomationConfig,

    #[serde(default)]
    pub exclusions: ExclusionsConfig,
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

/// Category alias table (source name → canonical category).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoriesConfig {
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, Category>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        CategoriesConfig {
            aliases: default_aliases(),
        }
    }
}

/// Returns the default vocabulary of imperative verbs accepted at the start of an entry.
fn default_imperative_verbs() -> Vec<String> {
    [
        "Add", "Remove", "Fix", "Update", "Change", "Refactor", "Improve", "Implement",
        "Support", "Enable", "Disable", "Create", "Delete", "Rename", "Move", "Merge", "Split",
        "Deprecate", "Drop", "Bump", "Document", "Clarify", "Simplify", "Optimize", "Migrate",
        "Convert", "Introduce", "Extract", "Inline", "Replace", "Revert", "Restore", "Enhance",
        "Extend", "Reduce", "Increase", "Decrease", "Allow", "Prevent", "Ensure", "Validate",
        "Normalize", "Standardize", "Use", "Set", "Get", "Make", "Handle", "Process", "Parse",
        "Generate", "Build", "Run", "Execute", "Load", "Save", "Read", "Write", "Show", "Hide",
        "Display", "Render", "Format", "Transform", "Include", "Exclude", "Filter", "Sort",
        "Group", "Aggregate", "Initialize", "Configure", "Setup", "Install", "Uninstall",
        "Upgrade", "Downgrade", "Pin", "Unpin", "Lock", "Unlock", "Expose", "Protect", "Secure",
        "Encrypt", "Decrypt", "Sign", "Verify", "Authenticate", "Authorize", "Grant", "Revoke",
        "Start", "Stop", "Pause", "Resume", "Restart", "Reset", "Clean", "Clear", "Flush",
        "Purge", "Prune", "Trim", "Check", "Test", "Assert", "Confirm", "Reject", "Accept",
        "Apply", "Reapply", "Undo", "Redo", "Cancel", "Abort", "Skip", "Ignore", "Override",
        "Bypass", "Force", "Require", "Recommend", "Suggest", "Prefer", "Default", "Fallback",
    ]
    .iter()
    .map(|v| v.to_string())
    .collect()
}

/// Style rules for entry text.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StyleConfig {
    #[serde(default = "default_imperative_verbs")]
    pub imperative_verbs: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            imperative_verbs: default_imperative_verbs(),
        }
    }
}

/// Returns the default list of automation accounts whose commits are ignored.
fn default_automation_authors() -> Vec<String> {
    vec!["estate-catalog[bot]".to_string()]
}

/// Commit authors that never produce changelog entries.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AutomationConfig {
    #[serde(default = "default_automation_authors")]
    pub authors: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        AutomationConfig {
            authors: default_automation_authors(),
        }
    }
}

/// Returns the default path patterns that do not require a changelog update.
fn default_exclusion_patterns() -> BTreeMap<String, Vec<String>> {
    let group = |patterns: &[&str]| patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>();

    let mut map = BTreeMap::new();
    map.insert(
        "infrastructure".to_string(),
        group(&[".github/", ".gitignore", ".nvmrc", "pnpm-lock.yaml"]),
    );
    map.insert("tests".to_string(), group(&["tests/"]));
    map.insert(
        "generated".to_string(),
        group(&[
            ".tmp/",
            ".stryker-tmp/",
            "coverage/",
            "reports/",
            "output/",
            ".claude/skills/",
            ".cursor/",
        ]),
    );
    map.insert(
        "config".to_string(),
        group(&[
            ".c8rc.json",
            ".coderabbit.yaml",
            ".doclinterrc.yml",
            "vitest.config.js",
            "eslint.config.js",
        ]),
    );
    map
}

/// Staged paths that never require a changelog update, grouped by purpose.
///
/// Read from `[exclusions.patterns]`, one array per group:
///
/// ```toml
/// [exclusions.patterns]
/// docs = ["docs/", "README.md"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExclusionsConfig {
    #[serde(default = "default_exclusion_patterns")]
    pub patterns: BTreeMap<String, Vec<String>>,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        ExclusionsConfig {
            patterns: default_exclusion_patterns(),
        }
    }
}

impl ExclusionsConfig {
    /// Every pattern across all groups
    pub fn all_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.values().flatten().map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            changelog_path: default_changelog_path(),
            repo_url: None,
            categories: CategoriesConfig::default(),
            style: StyleConfig::default(),
            automation: AutomationConfig::default(),
            exclusions: ExclusionsConfig::default(),
        }
    }
}

impl Config {
    /// Build the lookup tables shared by the parser, validator and adapters
    pub fn rules(&self) -> Rules {
        Rules {
            categories: CategoryMap::new(&self.categories.aliases),
            imperative_verbs: self
                .style
                .imperative_verbs
                .iter()
                .map(|v| v.to_lowercase())
                .collect(),
            automation_authors: self.automation.authors.clone(),
        }
    }

    /// Repository URL without a trailing slash, if configured
    pub fn repo_url(&self) -> Option<&str> {
        self.repo_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}

/// Immutable lookup tables built once from [`Config`] and passed explicitly.
#[derive(Debug, Clone)]
pub struct Rules {
    pub categories: CategoryMap,
    imperative_verbs: HashSet<String>,
    automation_authors: Vec<String>,
}

impl Rules {
    /// Check if text starts with a known imperative verb
    pub fn starts_with_imperative_verb(&self, text: &str) -> bool {
        text.split_whitespace()
            .next()
            .map(|word| self.imperative_verbs.contains(&word.to_lowercase()))
            .unwrap_or(false)
    }

    /// Check if a commit author is an automation account
    pub fn is_automation_author(&self, author: &str) -> bool {
        self.automation_authors.iter().any(|a| a == author)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Config::default().rules()
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog-kit.toml` in `root`
/// 3. `.changelog-kit.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, root: &Path) -> Result<Config> {
    let local = root.join(LOCAL_CONFIG_FILE);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| ChangelogError::config(e.to_string()))
}
