//! Command workflows
//!
//! Each command takes a plain argument struct rather than clap types, so the
//! workflows can be driven programmatically. Every `run_*` function returns
//! the process exit code; `Err` is reserved for I/O and git failures.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::{
    convert_releases, migrate_changelog, retrofit_changelog, ImportOptions, MigrationOutcome,
    RetrofitOptions,
};
use crate::analyzer::VersionAnalyzer;
use crate::changelog::{
    check_releases_are_sorted, parse_changelog, sort_releases, validate_changelog,
};
use crate::config::{Config, Rules};
use crate::coverage::{check_coverage, extract_prs_from_changelog, extract_prs_from_git_history};
use crate::domain::version::bump_version;
use crate::domain::VersionBump;
use crate::git::{Git2Repository, Repository};
use crate::github::fetch_releases;
use crate::staged::{check_changelog_updated, CheckOptions};
use crate::ui;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Shared state for every command: the working root and loaded configuration
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    rules: Rules,
}

impl Context {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let rules = config.rules();
        Context {
            root: root.into(),
            config,
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Resolve `file` against the root, defaulting to the configured changelog
    pub fn changelog_path(&self, file: Option<&str>) -> PathBuf {
        self.resolve(file.unwrap_or(&self.config.changelog_path))
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn open_repository(&self) -> Result<Git2Repository> {
        Git2Repository::open(&self.root)
            .with_context(|| format!("Not a git repository: {}", self.root.display()))
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Print generated markdown or write it to `output`
fn emit(ctx: &Context, markdown: &str, output: Option<&str>, dry_run: bool) -> Result<i32> {
    if dry_run {
        ui::display_dry_run(markdown);
        return Ok(EXIT_SUCCESS);
    }

    let Some(output) = output else {
        ui::display_error("--output is required (or use --dry-run)");
        return Ok(EXIT_FAILURE);
    };

    let path = ctx.resolve(output);
    write_file(&path, markdown)?;
    ui::display_success(&format!("Output written to: {}", path.display()));
    Ok(EXIT_SUCCESS)
}

fn show_todo_hint(todo_count: usize) {
    if let Some(hint) = ui::format_todo_hint(todo_count) {
        ui::display_warning(&hint);
    }
}

/// `validate`: check the changelog against Common Changelog rules
pub fn run_validate(ctx: &Context, file: Option<&str>) -> Result<i32> {
    let path = ctx.changelog_path(file);
    if !path.exists() {
        ui::display_error(&format!("{} not found", path.display()));
        return Ok(EXIT_FAILURE);
    }

    let content = read_file(&path)?;
    let report = validate_changelog(&content, ctx.rules());
    ui::display_validation_report(&report);

    Ok(if report.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// Arguments for `sort`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortArgs {
    pub file: Option<String>,
    pub dry_run: bool,
}

/// `sort`: reorder releases newest-first, keeping Unreleased on top
pub fn run_sort(ctx: &Context, args: &SortArgs) -> Result<i32> {
    let path = ctx.changelog_path(args.file.as_deref());
    let content = read_file(&path)?;

    let sorted = sort_releases(&content);
    if sorted == content {
        ui::display_success("Releases are already in order (Unreleased first, then newest-first)");
        return Ok(EXIT_SUCCESS);
    }

    if check_releases_are_sorted(&content, ctx.rules()) {
        ui::display_status("Moving Unreleased to the top");
    } else {
        ui::display_status("Reordering releases newest-first");
    }

    if args.dry_run {
        ui::display_dry_run(&sorted);
    } else {
        write_file(&path, &sorted)?;
        ui::display_success(&format!("Sorted releases in {}", path.display()));
    }
    Ok(EXIT_SUCCESS)
}

/// Arguments for `check-updated`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckUpdatedArgs {
    pub skip_branch_check: bool,
    /// Paths to check instead of the git index
    pub staged: Vec<String>,
}

/// `check-updated`: require a changelog update when significant files are staged
pub fn run_check_updated(ctx: &Context, args: &CheckUpdatedArgs) -> Result<i32> {
    let repo = ctx.open_repository()?;
    let options = CheckOptions {
        staged: (!args.staged.is_empty()).then(|| args.staged.clone()),
        skip_branch_check: args.skip_branch_check,
    };

    let check = check_changelog_updated(&repo, options, &ctx.config.exclusions);
    ui::display_staged_check(&check);

    Ok(if check.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// `coverage`: every PR merged in git history must appear in the changelog
pub fn run_coverage(ctx: &Context, file: Option<&str>) -> Result<i32> {
    let repo = ctx.open_repository()?;
    let log = repo.commit_log().context("Failed to read git history")?;
    let git_prs = extract_prs_from_git_history(&log, ctx.rules());

    let path = ctx.changelog_path(file);
    let changelog_prs = if path.exists() {
        extract_prs_from_changelog(&read_file(&path)?)
    } else {
        Vec::new()
    };

    let report = check_coverage(&git_prs, &changelog_prs);
    ui::display_coverage_report(&report);

    Ok(if report.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// Arguments for `migrate`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrateArgs {
    pub input: String,
    /// Defaults to overwriting the input
    pub output: Option<String>,
    pub repo_url: Option<String>,
    pub dry_run: bool,
}

/// `migrate`: convert a legacy changelog to Common Changelog
pub fn run_migrate(ctx: &Context, args: &MigrateArgs) -> Result<i32> {
    let input = ctx.resolve(&args.input);
    if !input.exists() {
        ui::display_error(&format!("Input file not found: {}", input.display()));
        return Ok(EXIT_FAILURE);
    }

    ui::display_status(&format!("Migrating: {}", input.display()));
    let content = read_file(&input)?;
    let repo_url = args.repo_url.as_deref().or_else(|| ctx.config.repo_url());

    let report = match migrate_changelog(&content, repo_url, ctx.rules()) {
        MigrationOutcome::AlreadyCommonChangelog => {
            ui::display_success("Already in Common Changelog format, skipping.");
            return Ok(EXIT_SUCCESS);
        }
        MigrationOutcome::Migrated(report) => report,
    };

    ui::display_status(&format!("Original format: {}", report.format));
    ui::display_status(&format!("Releases converted: {}", report.release_count));
    show_todo_hint(report.todo_count);

    let output = args.output.as_deref().unwrap_or(&args.input);
    emit(ctx, &report.output, Some(output), args.dry_run)
}

/// Arguments for `retrofit`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrofitArgs {
    pub version: String,
    /// Defaults to today
    pub date: Option<String>,
    pub repo_url: Option<String>,
    pub output: Option<String>,
    pub dry_run: bool,
}

/// `retrofit`: build a first changelog from merged-PR commits
pub fn run_retrofit(ctx: &Context, args: &RetrofitArgs) -> Result<i32> {
    let repo = ctx.open_repository()?;
    let log = repo.commit_log().context("Failed to read git history")?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let options = RetrofitOptions {
        version: &args.version,
        date: args.date.as_deref().unwrap_or(&today),
        repo_url: args.repo_url.as_deref().or_else(|| ctx.config.repo_url()),
    };

    let result = retrofit_changelog(&log, &options, ctx.rules());
    ui::display_status(&format!("PRs documented: {}", result.pr_count));

    emit(ctx, &result.markdown, args.output.as_deref(), args.dry_run)
}

/// Arguments for `import`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportArgs {
    /// `owner/name`
    pub repo: String,
    pub output: Option<String>,
    pub include_prerelease: bool,
    pub dry_run: bool,
}

/// `import`: convert GitHub Releases into a changelog
pub fn run_import(ctx: &Context, args: &ImportArgs) -> Result<i32> {
    if args.output.is_none() && !args.dry_run {
        ui::display_error("--output is required (or use --dry-run)");
        return Ok(EXIT_FAILURE);
    }

    ui::display_status(&format!("Fetching releases from {}...", args.repo));
    let releases = fetch_releases(&args.repo)?;
    ui::display_status(&format!("Found {} releases", releases.len()));

    let default_url = format!("https://github.com/{}", args.repo);
    let options = ImportOptions {
        repo_url: Some(ctx.config.repo_url().unwrap_or(&default_url)),
        include_prerelease: args.include_prerelease,
    };

    let result = convert_releases(&releases, &options);
    ui::display_status(&format!("Releases imported: {}", result.release_count));
    show_todo_hint(result.todo_count);

    emit(ctx, &result.markdown, args.output.as_deref(), args.dry_run)
}

/// `next-version`: suggest the version for the pending changes
pub fn run_next_version(ctx: &Context, file: Option<&str>) -> Result<i32> {
    let path = ctx.changelog_path(file);
    let changelog = parse_changelog(&read_file(&path)?, ctx.rules());

    // History only matters when Unreleased is empty
    let history = match Git2Repository::open(&ctx.root) {
        Ok(repo) => repo.commit_log().unwrap_or_default(),
        Err(e) => {
            tracing::debug!(error = %e, "no git history available");
            Vec::new()
        }
    };

    let analyzer = VersionAnalyzer::new(ctx.rules());
    match analyzer.next_version(&changelog, &history) {
        Ok(Some(next)) => {
            ui::display_status(&format!("Latest release: {}", next.current));
            ui::display_success(&format!(
                "Suggested next version: {} ({})",
                next.next,
                next.summary.bump()
            ));
            Ok(EXIT_SUCCESS)
        }
        Ok(None) => {
            ui::display_status("No unreleased changes");
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            Ok(EXIT_FAILURE)
        }
    }
}

/// `bump`: print `version` bumped by `kind`
pub fn run_bump(version: &str, kind: VersionBump) -> i32 {
    match bump_version(version, kind) {
        Ok(next) => {
            println!("{}", next);
            EXIT_SUCCESS
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            EXIT_USAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_resolves_relative_paths() {
        let ctx = Context::new("/work", Config::default());
        assert_eq!(ctx.changelog_path(None), PathBuf::from("/work/CHANGELOG.md"));
        assert_eq!(ctx.changelog_path(Some("docs/CHANGES.md")), PathBuf::from("/work/docs/CHANGES.md"));
        assert_eq!(ctx.resolve("/tmp/out.md"), PathBuf::from("/tmp/out.md"));
    }

    #[test]
    fn test_run_bump() {
        assert_eq!(run_bump("1.2.3", VersionBump::Minor), EXIT_SUCCESS);
        assert_eq!(run_bump("v1.2.3", VersionBump::Minor), EXIT_USAGE);
        assert_eq!(run_bump("18446744073709551615.0.0", VersionBump::Major), EXIT_USAGE);
    }

    #[test]
    fn test_run_sort_moves_unreleased_to_top() {
        let root = tempfile::TempDir::new().unwrap();
        let path = root.path().join("CHANGELOG.md");
        let content = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Add API (#1)\n\n## [Unreleased]\n\n### Fixed\n\n- Fix typo\n";
        std::fs::write(&path, content).unwrap();

        let ctx = Context::new(root.path(), Config::default());
        assert!(check_releases_are_sorted(content, ctx.rules()));

        let args = SortArgs {
            file: None,
            dry_run: false,
        };
        assert_eq!(run_sort(&ctx, &args).unwrap(), EXIT_SUCCESS);

        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.find("## [Unreleased]").unwrap() < rewritten.find("## [1.0.0]").unwrap());
        assert_eq!(sort_releases(&rewritten), rewritten);
    }
}
