//! Changelog parser: an explicit state machine over classified lines.

use crate::changelog::line::Line;
use crate::changelog::model::{Change, ChangeGroup, Changelog, Release};
use crate::changelog::reference::{clean_change_text, extract_references, is_breaking};
use crate::config::Rules;

/// Where the parser is in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing but blank lines seen yet
    BeforeTitle,
    /// Past the title, no release yet
    InHeader,
    /// Inside a release, before its first category heading
    InRelease,
    /// Inside a category group
    InGroup,
    /// After a malformed `##` heading, until the next valid one
    Skipping,
}

struct Parser<'r> {
    rules: &'r Rules,
    state: State,
    changelog: Changelog,
    release: Option<Release>,
    group: Option<ChangeGroup>,
    notice: Vec<String>,
}

impl<'r> Parser<'r> {
    fn new(rules: &'r Rules) -> Self {
        Parser {
            rules,
            state: State::BeforeTitle,
            changelog: Changelog::default(),
            release: None,
            group: None,
            notice: Vec::new(),
        }
    }

    fn feed(&mut self, line: Line<'_>) {
        match (self.state, line) {
            (State::BeforeTitle | State::InHeader, Line::Title(title)) => {
                self.changelog.title = title.to_string();
                self.state = State::InHeader;
            }
            (_, Line::VersionHeading { label, date }) => {
                self.close_release();
                self.release = Some(Release::new(label, date.map(str::to_string)));
                self.state = State::InRelease;
            }
            (_, Line::MalformedVersionHeading(heading)) => {
                tracing::debug!(heading, "skipping malformed version heading");
                self.close_release();
                self.state = State::Skipping;
            }
            (State::InRelease | State::InGroup, Line::CategoryHeading(heading)) => {
                self.close_group();
                self.flush_notice();
                let category = self.rules.categories.normalize(heading);
                self.group = Some(ChangeGroup {
                    category,
                    heading: heading.to_string(),
                    changes: Vec::new(),
                });
                self.state = State::InGroup;
            }
            (State::InRelease, Line::Notice(text)) => {
                self.notice.push(text.to_string());
            }
            (State::InGroup, Line::Entry(text)) => {
                if let Some(group) = self.group.as_mut() {
                    group.changes.push(parse_change(text));
                }
            }
            _ => {}
        }
    }

    /// Keep the open group only if it collected changes
    fn close_group(&mut self) {
        if let Some(group) = self.group.take() {
            if group.changes.is_empty() {
                return;
            }
            if let Some(release) = self.release.as_mut() {
                release.groups.push(group);
            }
        }
    }

    fn flush_notice(&mut self) {
        if self.notice.is_empty() {
            return;
        }
        let text = self.notice.join(" ").trim().to_string();
        self.notice.clear();
        if let Some(release) = self.release.as_mut() {
            if release.notice.is_none() && !text.is_empty() {
                release.notice = Some(text);
            }
        }
    }

    fn close_release(&mut self) {
        self.close_group();
        self.flush_notice();
        if let Some(release) = self.release.take() {
            self.changelog.releases.push(release);
        }
    }

    fn finish(mut self) -> Changelog {
        self.close_release();
        self.changelog
    }
}

/// Parse one entry body (text after `- `) into a change
pub fn parse_change(text: &str) -> Change {
    Change {
        text: clean_change_text(text),
        references: extract_references(text),
        breaking: is_breaking(text),
    }
}

/// Parse changelog content into structured data.
///
/// Never fails: unrecognized lines are ignored, malformed version headings
/// and everything under them are skipped, and empty groups are dropped.
pub fn parse_changelog(content: &str, rules: &Rules) -> Changelog {
    let mut parser = Parser::new(rules);
    for raw in content.lines() {
        parser.feed(Line::classify(raw));
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::model::Reference;
    use crate::domain::Category;

    fn parse(content: &str) -> Changelog {
        parse_changelog(content, &Rules::default())
    }

    #[test]
    fn test_parse_empty_input() {
        let changelog = parse("");
        assert_eq!(changelog.title, "Changelog");
        assert!(changelog.releases.is_empty());

        let changelog = parse("  \n\n\t\n");
        assert_eq!(changelog.title, "Changelog");
        assert!(changelog.releases.is_empty());
    }

    #[test]
    fn test_parse_single_entry() {
        let changelog = parse("# Changelog\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Add support for X (#42)\n");
        let release = &changelog.releases[0];
        assert_eq!(release.version, "1.0.0");
        assert_eq!(release.date.as_deref(), Some("2024-01-01"));
        let change = &release.groups[0].changes[0];
        assert_eq!(change.text, "Add support for X");
        assert_eq!(change.references, vec![Reference::pull_request(42, "")]);
        assert!(!change.breaking);
    }

    #[test]
    fn test_parse_breaking_and_asterisk_entries() {
        let changelog = parse("## [2.0.0] - 2024-02-01\n### Changed\n* **Breaking:** Drop Node 16 (#7)\n- Update docs (#8)\n");
        let changes = &changelog.releases[0].groups[0].changes;
        assert_eq!(changes.len(), 2);
        assert!(changes[0].breaking);
        assert_eq!(changes[0].text, "Drop Node 16");
        assert!(!changes[1].breaking);
    }

    #[test]
    fn test_parse_notice_before_groups() {
        let changelog = parse(
            "## [1.0.0] - 2024-01-01\n\n_First stable_\n_release._\n\n### Fixed\n- Fix bug (#1)\n",
        );
        assert_eq!(
            changelog.releases[0].notice.as_deref(),
            Some("First stable release.")
        );
    }

    #[test]
    fn test_notice_without_groups_is_flushed() {
        let changelog = parse("## [1.0.0] - 2024-01-01\n_Yanked._\n## [0.9.0] - 2023-12-01\n");
        assert_eq!(changelog.releases[0].notice.as_deref(), Some("Yanked."));
        assert_eq!(changelog.releases[1].notice, None);
    }

    #[test]
    fn test_empty_groups_are_discarded() {
        let changelog = parse("## [Unreleased]\n\n### Added\n\n### Fixed\n- Fix it\n");
        let groups = &changelog.releases[0].groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, Category::Fixed);
    }

    #[test]
    fn test_category_heading_mapping_keeps_raw_heading() {
        let changelog = parse("## [1.0.0] - 2024-01-01\n### Security\n- Fix CVE (#3)\n### Misc\n- Tidy (#4)\n");
        let groups = &changelog.releases[0].groups;
        assert_eq!(groups[0].category, Category::Fixed);
        assert_eq!(groups[0].heading, "Security");
        assert_eq!(groups[1].category, Category::Changed);
        assert_eq!(groups[1].heading, "Misc");
    }

    #[test]
    fn test_malformed_heading_is_skipped() {
        let changelog = parse(
            "## [1.1.0] - 2024-02-01\n### Added\n- Add A (#2)\n## 1.0.0\n### Added\n- Add B (#1)\n## [0.9.0] - 2023-01-01\n### Fixed\n- Fix C (#0)\n",
        );
        let versions: Vec<&str> = changelog.releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.1.0", "0.9.0"]);
        assert_eq!(changelog.releases[0].groups[0].changes.len(), 1);
    }

    #[test]
    fn test_title_only_before_releases() {
        let changelog = parse("# Project History\n## [1.0.0] - 2024-01-01\n# Not a title\n");
        assert_eq!(changelog.title, "Project History");
    }

    #[test]
    fn test_entries_outside_groups_are_ignored() {
        let changelog = parse("- stray\n## [1.0.0] - 2024-01-01\n- also stray\n### Added\n- Add X (#1)\n");
        assert_eq!(changelog.releases[0].changes().count(), 1);
    }
}
