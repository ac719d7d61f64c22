//! Analysis engine for suggesting the next version from pending changes

pub mod version_analyzer;

pub use version_analyzer::{NextVersion, VersionAnalyzer};
