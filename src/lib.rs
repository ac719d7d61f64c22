pub mod adapters;
pub mod analyzer;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod diagnostic;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod staged;
pub mod ui;

pub use error::{ChangelogError, Result};
