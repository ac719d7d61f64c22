use crate::domain::GitLogEntry;
use crate::error::{ChangelogError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use git2::{Delta, Diff, Oid, Repository as Git2Repo, Sort};
use std::path::Path;

const REMOTE_HEAD: &str = "refs/remotes/origin/HEAD";
const REMOTE_PREFIX: &str = "refs/remotes/";
const FALLBACK_BRANCHES: &[&str] = &["origin/main", "origin/master"];

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn try_staged_files(&self) -> Result<Vec<String>> {
        // Unborn HEAD: everything in the index counts as added
        let head_tree = self.repo.head().and_then(|head| head.peel_to_tree()).ok();
        let index = self.repo.index()?;
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;

        Ok(diff_paths(&diff, |status| {
            matches!(
                status,
                Delta::Added | Delta::Copied | Delta::Modified | Delta::Renamed
            )
        }))
    }

    fn branch_base(&self, head: Oid) -> Result<Oid> {
        match self.default_branch_name() {
            Some(branch) => {
                let target = self.repo.revparse_single(&branch)?.peel_to_commit()?.id();
                Ok(self.repo.merge_base(head, target)?)
            }
            None => {
                let commit = self.repo.find_commit(head)?;
                Ok(commit.parent_id(0)?)
            }
        }
    }

    fn try_changed_files_in_branch(&self) -> Result<Vec<String>> {
        let head = self.repo.head()?.peel_to_commit()?;
        let base = self.branch_base(head.id())?;
        let base_tree = self.repo.find_commit(base)?.tree()?;
        let head_tree = head.tree()?;
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)?;

        Ok(diff_paths(&diff, |_| true))
    }

    fn default_branch_name(&self) -> Option<String> {
        if let Ok(reference) = self.repo.find_reference(REMOTE_HEAD) {
            if let Some(target) = reference.symbolic_target() {
                return Some(target.trim_start_matches(REMOTE_PREFIX).to_string());
            }
        }

        FALLBACK_BRANCHES
            .iter()
            .find(|branch| {
                self.repo
                    .find_reference(&format!("{}{}", REMOTE_PREFIX, branch))
                    .is_ok()
            })
            .map(|branch| branch.to_string())
    }
}

impl super::Repository for Git2Repository {
    fn commit_log(&self) -> Result<Vec<GitLogEntry>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk
            .push_head()
            .map_err(|e| ChangelogError::changelog(format!("Cannot read git history: {}", e)))?;
        revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;

        let mut log = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let author = commit.author();
            let when = author.when();

            log.push(GitLogEntry {
                hash: oid.to_string(),
                subject: commit.summary().unwrap_or_default().to_string(),
                author: author.name().unwrap_or("unknown").to_string(),
                date: format_commit_date(when.seconds(), when.offset_minutes()),
            });
        }

        tracing::debug!(commits = log.len(), "read git history");
        Ok(log)
    }

    fn staged_files(&self) -> Vec<String> {
        self.try_staged_files().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "cannot list staged files");
            Vec::new()
        })
    }

    fn default_branch(&self) -> Option<String> {
        self.default_branch_name()
    }

    fn changed_files_in_branch(&self) -> Vec<String> {
        self.try_changed_files_in_branch().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "cannot diff branch against default branch");
            Vec::new()
        })
    }
}

/// New-side paths of the deltas accepted by `keep`
fn diff_paths(diff: &Diff<'_>, keep: impl Fn(Delta) -> bool) -> Vec<String> {
    diff.deltas()
        .filter(|delta| keep(delta.status()))
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .map(|path| path.to_string_lossy().replace('\\', "/"))
        })
        .collect()
}

/// ISO-8601 author date in the committer's own offset
fn format_commit_date(seconds: i64, offset_minutes: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_minutes * 60)?;
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&offset).to_rfc3339())
}
