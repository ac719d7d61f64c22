//! Common Changelog categories and the alias table that maps other
//! vocabularies (Keep a Changelog headings, conventional commit prefixes)
//! onto them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One of the four Common Changelog categories.
///
/// The derived ordering is the canonical order in which categories must
/// appear inside a release: Changed, Added, Removed, Fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Changed,
    Added,
    Removed,
    Fixed,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 4] = [
        Category::Changed,
        Category::Added,
        Category::Removed,
        Category::Fixed,
    ];

    /// Parse a canonical category name (exact, case-sensitive)
    pub fn from_canonical(name: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Changed => "Changed",
            Category::Added => "Added",
            Category::Removed => "Removed",
            Category::Fixed => "Fixed",
        }
    }

    /// Canonical names joined with `separator`, used in diagnostics
    pub fn canonical_list(separator: &str) -> String {
        Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the built-in alias table (source name → canonical category).
pub fn default_aliases() -> BTreeMap<String, Category> {
    use Category::*;

    let table: &[(&str, Category)] = &[
        // Keep a Changelog headings
        ("added", Added),
        ("changed", Changed),
        ("deprecated", Changed),
        ("removed", Removed),
        ("fixed", Fixed),
        ("security", Fixed),
        // Conventional commit prefixes
        ("feat", Added),
        ("feature", Added),
        ("add", Added),
        ("fix", Fixed),
        ("bugfix", Fixed),
        ("hotfix", Fixed),
        ("refactor", Changed),
        ("chore", Changed),
        ("docs", Changed),
        ("style", Changed),
        ("perf", Changed),
        ("build", Changed),
        ("ci", Changed),
        ("test", Changed),
        ("revert", Changed),
        ("remove", Removed),
        ("deprecate", Removed),
        ("breaking", Changed),
    ];

    table
        .iter()
        .map(|(name, category)| (name.to_string(), *category))
        .collect()
}

/// Case-insensitive lookup over an alias table.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    aliases: HashMap<String, Category>,
}

impl CategoryMap {
    pub fn new(aliases: &BTreeMap<String, Category>) -> Self {
        CategoryMap {
            aliases: aliases
                .iter()
                .map(|(name, category)| (name.to_lowercase(), *category))
                .collect(),
        }
    }

    /// Map any heading or prefix to a canonical category, defaulting to `Changed`.
    pub fn normalize(&self, name: &str) -> Category {
        self.lookup(name).unwrap_or(Category::Changed)
    }

    /// Map a name only if the table knows it
    pub fn lookup(&self, name: &str) -> Option<Category> {
        self.aliases.get(&name.trim().to_lowercase()).copied()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        CategoryMap::new(&default_aliases())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        assert!(Category::Changed < Category::Added);
        assert!(Category::Added < Category::Removed);
        assert!(Category::Removed < Category::Fixed);
    }

    #[test]
    fn test_from_canonical_is_exact() {
        assert_eq!(Category::from_canonical("Fixed"), Some(Category::Fixed));
        assert_eq!(Category::from_canonical("fixed"), None);
        assert_eq!(Category::from_canonical("Security"), None);
    }

    #[test]
    fn test_normalize_keep_a_changelog_headings() {
        let map = CategoryMap::default();
        assert_eq!(map.normalize("Deprecated"), Category::Changed);
        assert_eq!(map.normalize("Security"), Category::Fixed);
        assert_eq!(map.normalize("Removed"), Category::Removed);
    }

    #[test]
    fn test_normalize_conventional_prefixes() {
        let map = CategoryMap::default();
        assert_eq!(map.normalize("feat"), Category::Added);
        assert_eq!(map.normalize("hotfix"), Category::Fixed);
        assert_eq!(map.normalize("ci"), Category::Changed);
        assert_eq!(map.normalize("deprecate"), Category::Removed);
        assert_eq!(map.normalize("BREAKING"), Category::Changed);
    }

    #[test]
    fn test_normalize_unknown_defaults_to_changed() {
        let map = CategoryMap::default();
        assert_eq!(map.normalize("Miscellaneous"), Category::Changed);
        assert_eq!(map.lookup("Miscellaneous"), None);
    }

    #[test]
    fn test_canonical_list() {
        assert_eq!(
            Category::canonical_list(" > "),
            "Changed > Added > Removed > Fixed"
        );
    }
}
