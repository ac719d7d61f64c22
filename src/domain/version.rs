//! Semantic version parsing, precedence and bumping.
//!
//! Versions follow semver 2.0.0 without a `v` prefix, which is what Common
//! Changelog requires for release headings. Sorting helpers order versions
//! newest-first, the order releases appear in a changelog.

use crate::error::{ChangelogError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
    /// Text the version was parsed from
    pub raw: String,
}

impl ParsedVersion {
    /// Create a plain release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ParsedVersion {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
            raw: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// Parse a version string (e.g., "2.0.0-rc.1+build.5").
    ///
    /// Leading `v` prefixes and leading zeros in numeric identifiers are
    /// rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let version = semver::Version::parse(text).map_err(|e| {
            ChangelogError::invalid_version(format!(
                "'{}' is not valid semver without a 'v' prefix ({})",
                text, e
            ))
        })?;

        Ok(ParsedVersion {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            prerelease: (!version.pre.is_empty()).then(|| version.pre.to_string()),
            build: (!version.build.is_empty()).then(|| version.build.to_string()),
            raw: text.to_string(),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Alphabetic prefix of the prerelease ("rc" for "rc.1", "beta" for "beta3")
    pub fn prerelease_tag(&self) -> Option<&str> {
        let pre = self.prerelease.as_deref()?;
        let end = pre
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(pre.len());
        (end > 0).then(|| &pre[..end])
    }

    /// Bump version according to bump type.
    ///
    /// Prerelease and build metadata are always dropped. Fails when the
    /// bumped component would overflow `u64`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            ChangelogError::invalid_version(format!(
                "cannot apply {} bump to '{}': component overflows",
                bump_type, self
            ))
        };

        Ok(match bump_type {
            VersionBump::Major => {
                ParsedVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => {
                ParsedVersion::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            VersionBump::Patch => ParsedVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }

    /// Semver precedence: `Greater` when `self` is the higher version.
    ///
    /// Build metadata does not take part in precedence.
    pub fn precedence(&self, other: &ParsedVersion) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// What kinds of change a release contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub has_breaking: bool,
    pub has_features: bool,
    pub has_fixes: bool,
}

impl ChangeSummary {
    /// The bump this summary calls for; patch when nothing is flagged
    pub fn bump(&self) -> VersionBump {
        if self.has_breaking {
            VersionBump::Major
        } else if self.has_features {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }
}

/// Compare dot-separated prerelease identifiers by semver precedence.
///
/// Numeric identifiers compare as integers and rank below alphanumeric ones;
/// when one list is a prefix of the other the longer list ranks higher.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut a_ids = a.split('.');
    let mut b_ids = b.split('.');

    loop {
        let ordering = match (a_ids.next(), b_ids.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a_id), Some(b_id)) => compare_identifier(a_id, b_id),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    let a_numeric = !a.is_empty() && a.bytes().all(|c| c.is_ascii_digit());
    let b_numeric = !b.is_empty() && b.bytes().all(|c| c.is_ascii_digit());

    match (a_numeric, b_numeric) {
        // no leading zeros, so longer means larger
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Check if a version string is valid semver (no `v` prefix)
pub fn is_valid_version(version: &str) -> bool {
    ParsedVersion::parse(version).is_ok()
}

/// Check if a version string is a valid prerelease version
pub fn is_prerelease(version: &str) -> bool {
    ParsedVersion::parse(version)
        .map(|v| v.is_prerelease())
        .unwrap_or(false)
}

/// Compare two version strings in newest-first order.
///
/// * `Ordering::Less` - `a` is newer
/// * `Ordering::Greater` - `b` is newer
/// * `Ordering::Equal` - same precedence
///
/// Invalid versions sort after every valid one; two invalid versions are equal.
///
/// # Example
/// ```ignore
/// assert_eq!(compare_versions("2.0.0", "1.0.0"), Ordering::Less);
/// assert_eq!(compare_versions("1.0.0-rc.1", "1.0.0"), Ordering::Greater);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (ParsedVersion::parse(a).ok(), ParsedVersion::parse(b).ok()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(va), Some(vb)) => vb.precedence(&va),
    }
}

/// Bump a version string by type.
///
/// # Example
/// ```ignore
/// assert_eq!(bump_version("1.2.3", VersionBump::Minor)?.to_string(), "1.3.0");
/// assert_eq!(bump_version("1.0.0-rc.1", VersionBump::Patch)?.to_string(), "1.0.1");
/// ```
pub fn bump_version(version: &str, bump_type: VersionBump) -> Result<ParsedVersion> {
    ParsedVersion::parse(version)?.bump(bump_type)
}

/// Stable newest-first sort; invalid versions trail
pub fn sort_versions<S: AsRef<str>>(versions: &[S]) -> Vec<String> {
    let mut sorted: Vec<String> = versions.iter().map(|v| v.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| compare_versions(a, b));
    sorted
}

/// Check if versions are already sorted newest-first
pub fn are_versions_sorted<S: AsRef<str>>(versions: &[S]) -> bool {
    versions
        .windows(2)
        .all(|pair| compare_versions(pair[0].as_ref(), pair[1].as_ref()) != Ordering::Greater)
}

/// Suggest the version that should follow `version` given a change summary
pub fn suggest_next_version(version: &str, summary: ChangeSummary) -> Result<ParsedVersion> {
    bump_version(version, summary.bump())
}
