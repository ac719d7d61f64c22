use crate::domain::GitLogEntry;
use crate::error::Result;
use crate::git::Repository;

/// Mock repository for testing without actual git operations
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    log: Vec<GitLogEntry>,
    staged: Vec<String>,
    default_branch: Option<String>,
    branch_changes: Vec<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit to the history (oldest first)
    pub fn add_commit(&mut self, hash: &str, subject: &str, author: &str) -> &mut Self {
        self.log.push(GitLogEntry {
            hash: hash.to_string(),
            subject: subject.to_string(),
            author: author.to_string(),
            date: None,
        });
        self
    }

    /// Stage a path
    pub fn stage(&mut self, path: impl Into<String>) -> &mut Self {
        self.staged.push(path.into());
        self
    }

    /// Set the default branch and the files changed since forking from it
    pub fn set_branch_changes(
        &mut self,
        default_branch: impl Into<String>,
        changes: &[&str],
    ) -> &mut Self {
        self.default_branch = Some(default_branch.into());
        self.branch_changes = changes.iter().map(|c| c.to_string()).collect();
        self
    }
}

impl Repository for MockRepository {
    fn commit_log(&self) -> Result<Vec<GitLogEntry>> {
        Ok(self.log.clone())
    }

    fn staged_files(&self) -> Vec<String> {
        self.staged.clone()
    }

    fn default_branch(&self) -> Option<String> {
        self.default_branch.clone()
    }

    fn changed_files_in_branch(&self) -> Vec<String> {
        self.branch_changes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_commit_log_keeps_order() {
        let mut repo = MockRepository::new();
        repo.add_commit("abc123", "first commit", "Author 1")
            .add_commit("def456", "second commit", "Author 2");

        let log = repo.commit_log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].subject, "first commit");
        assert_eq!(log[1].author, "Author 2");
    }

    #[test]
    fn test_mock_repository_staged_and_branch() {
        let mut repo = MockRepository::new();
        repo.stage("src/lib.rs")
            .set_branch_changes("origin/main", &["CHANGELOG.md"]);

        assert_eq!(repo.staged_files(), vec!["src/lib.rs"]);
        assert_eq!(repo.default_branch().as_deref(), Some("origin/main"));
        assert_eq!(repo.changed_files_in_branch(), vec!["CHANGELOG.md"]);
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.commit_log().unwrap().is_empty());
        assert!(repo.staged_files().is_empty());
        assert_eq!(repo.default_branch(), None);
    }
}
