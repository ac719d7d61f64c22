//! Common Changelog document model, parsing, rendering and validation.

pub mod line;
pub mod model;
pub mod parser;
pub mod reference;
pub mod render;
pub mod sort;
pub mod validator;

pub use model::{Change, ChangeGroup, Changelog, Reference, ReferenceKind, Release, UNRELEASED};
pub use parser::parse_changelog;
pub use render::{render_changelog, RenderOptions};
pub use sort::{check_releases_are_sorted, sort_releases};
pub use validator::{validate_changelog, OrderCheck, ValidationReport};
