use crate::domain::Category;

/// Label of the in-progress release section
pub const UNRELEASED: &str = "Unreleased";

/// Title used when a document has no `# ` heading
pub const DEFAULT_TITLE: &str = "Changelog";

/// A parsed changelog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    pub title: String,
    pub releases: Vec<Release>,
}

impl Default for Changelog {
    fn default() -> Self {
        Changelog {
            title: DEFAULT_TITLE.to_string(),
            releases: Vec::new(),
        }
    }
}

impl Changelog {
    /// The Unreleased section, if present
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.is_unreleased())
    }

    /// Labels of every versioned (non-Unreleased) release, in document order
    pub fn versions(&self) -> Vec<&str> {
        self.releases
            .iter()
            .filter(|r| !r.is_unreleased())
            .map(|r| r.version.as_str())
            .collect()
    }

    /// The first versioned release in document order
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().find(|r| !r.is_unreleased())
    }
}

/// One version section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// `Unreleased` or a semver string (not validated here)
    pub version: String,
    pub date: Option<String>,
    pub notice: Option<String>,
    pub groups: Vec<ChangeGroup>,
}

impl Release {
    pub fn new(version: impl Into<String>, date: Option<String>) -> Self {
        Release {
            version: version.into(),
            date,
            notice: None,
            groups: Vec::new(),
        }
    }

    pub fn unreleased() -> Self {
        Release::new(UNRELEASED, None)
    }

    pub fn is_unreleased(&self) -> bool {
        self.version == UNRELEASED
    }

    /// Every change across all groups
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.groups.iter().flat_map(|g| g.changes.iter())
    }

    /// Group for `category`, creating it in canonical position if missing
    pub fn group_mut(&mut self, category: Category) -> &mut ChangeGroup {
        let index = match self.groups.iter().position(|g| g.category == category) {
            Some(index) => index,
            None => {
                let index = self
                    .groups
                    .iter()
                    .position(|g| g.category > category)
                    .unwrap_or(self.groups.len());
                self.groups.insert(index, ChangeGroup::new(category));
                index
            }
        };
        &mut self.groups[index]
    }
}

/// A named bucket of changes within a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGroup {
    /// Canonical category the heading maps to
    pub category: Category,
    /// Heading text as written in the document
    pub heading: String,
    pub changes: Vec<Change>,
}

impl ChangeGroup {
    pub fn new(category: Category) -> Self {
        ChangeGroup {
            category,
            heading: category.as_str().to_string(),
            changes: Vec::new(),
        }
    }
}

/// A single changelog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub text: String,
    pub references: Vec<Reference>,
    pub breaking: bool,
}

impl Change {
    pub fn new(text: impl Into<String>) -> Self {
        Change {
            text: text.into(),
            references: Vec::new(),
            breaking: false,
        }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    /// Pull request numbers referenced by this change
    pub fn pull_requests(&self) -> impl Iterator<Item = u64> + '_ {
        self.references.iter().filter_map(|r| match r.kind {
            ReferenceKind::PullRequest { number } => Some(number),
            _ => None,
        })
    }
}

/// What an external pointer points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    PullRequest { number: u64 },
    Issue { number: u64 },
    Commit { hash: String },
}

/// An external pointer attached to a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Link target; empty for bare `(#N)` references
    pub url: String,
}

impl Reference {
    pub fn pull_request(number: u64, url: impl Into<String>) -> Self {
        Reference {
            kind: ReferenceKind::PullRequest { number },
            url: url.into(),
        }
    }

    pub fn issue(number: u64, url: impl Into<String>) -> Self {
        Reference {
            kind: ReferenceKind::Issue { number },
            url: url.into(),
        }
    }

    pub fn commit(hash: impl Into<String>, url: impl Into<String>) -> Self {
        Reference {
            kind: ReferenceKind::Commit { hash: hash.into() },
            url: url.into(),
        }
    }

    /// PR or issue number, if this reference has one
    pub fn number(&self) -> Option<u64> {
        match self.kind {
            ReferenceKind::PullRequest { number } | ReferenceKind::Issue { number } => Some(number),
            ReferenceKind::Commit { .. } => None,
        }
    }
}
