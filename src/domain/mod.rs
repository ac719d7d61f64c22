//! Domain logic - pure rules independent of files, git and GitHub

pub mod category;
pub mod commit;
pub mod version;

pub use category::{Category, CategoryMap};
pub use commit::{GitLogEntry, ParsedCommit};
pub use version::{ChangeSummary, ParsedVersion, VersionBump};
