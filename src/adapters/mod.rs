//! Adapters that turn other sources into Common Changelog: legacy
//! changelogs, git history and GitHub Releases.

pub mod migrate;
pub mod releases;
pub mod retrofit;
pub mod text;

pub use migrate::{detect_format, migrate_changelog, MigrationOutcome, MigrationReport, SourceFormat};
pub use releases::{convert_releases, GitHubRelease, ImportOptions, ImportResult};
pub use retrofit::{retrofit_changelog, RetrofitOptions, RetrofitResult};
