//! Git operations abstraction layer
//!
//! The [Repository] trait lists the handful of read-only queries the
//! changelog checks need from git. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository opened with `git2`
//! - [mock::MockRepository]: canned answers for tests
//!
//! Code that only needs history or staged paths should take the trait, so
//! it can be exercised without a working tree.
//!
//! ```rust
//! # use changelog_kit::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let log = repo.commit_log()?;
//! let staged = repo.staged_files();
//! println!("{} commits, {} staged files", log.len(), staged.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::GitLogEntry;
use crate::error::Result;

/// Read-only git queries used by coverage, retrofit and the staged check
///
/// ## Error Handling
///
/// Only [Repository::commit_log] can fail: without history there is
/// nothing to check. Staged-file and branch lookups are best effort and
/// return an empty list when git cannot answer (no HEAD yet, no remote).
pub trait Repository {
    /// Every commit reachable from HEAD, oldest first
    ///
    /// # Returns
    /// * `Ok(Vec<GitLogEntry>)` - Commits in chronological order
    /// * `Err` - If HEAD cannot be resolved or a commit cannot be read
    fn commit_log(&self) -> Result<Vec<GitLogEntry>>;

    /// Paths staged for the next commit (added, copied, modified or renamed)
    fn staged_files(&self) -> Vec<String>;

    /// Remote-tracking name of the default branch, e.g. `origin/main`
    fn default_branch(&self) -> Option<String>;

    /// Paths changed on this branch since it forked from the default branch
    fn changed_files_in_branch(&self) -> Vec<String>;
}
