//! Command-line interface: clap definitions and dispatch to the workflows.

pub mod orchestration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::load_config;
use crate::domain::VersionBump;
use orchestration::{
    CheckUpdatedArgs, Context, ImportArgs, MigrateArgs, RetrofitArgs, SortArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "changelog-kit",
    version,
    about = "Validate, sort and generate Common Changelog files"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Repository root containing the changelog"
    )]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the changelog format
    Validate {
        #[arg(long, help = "Changelog file (defaults to the configured path)")]
        file: Option<String>,
    },

    /// Sort releases newest-first
    Sort {
        #[arg(long, help = "Changelog file (defaults to the configured path)")]
        file: Option<String>,

        #[arg(long, help = "Print output without writing file")]
        dry_run: bool,
    },

    /// Fail when significant files are staged without a changelog update
    CheckUpdated {
        #[arg(long, help = "Ignore changelog updates made earlier in this branch")]
        skip_branch_check: bool,

        #[arg(long, num_args = 1.., help = "Files to check instead of the git index")]
        staged: Vec<String>,
    },

    /// Check that every PR in git history is documented
    Coverage {
        #[arg(long, help = "Changelog file (defaults to the configured path)")]
        file: Option<String>,
    },

    /// Convert a legacy changelog to Common Changelog
    Migrate {
        #[arg(long, help = "Input changelog file path")]
        input: String,

        #[arg(long, help = "Output file path (defaults to input, overwrites)")]
        output: Option<String>,

        #[arg(long, help = "Repository URL for reference links")]
        repo_url: Option<String>,

        #[arg(long, help = "Print output without writing file")]
        dry_run: bool,
    },

    /// Generate a changelog from merged-PR commits
    Retrofit {
        #[arg(long = "version", default_value = "1.0.0", help = "Version of the retrofitted release")]
        release_version: String,

        #[arg(long, help = "Release date, YYYY-MM-DD (defaults to today)")]
        date: Option<String>,

        #[arg(long, help = "Repository URL for reference links")]
        repo_url: Option<String>,

        #[arg(long, help = "Output file path (required unless --dry-run)")]
        output: Option<String>,

        #[arg(long, help = "Print output without writing file")]
        dry_run: bool,
    },

    /// Import GitHub Releases as a changelog
    Import {
        #[arg(long, help = "Repository in \"owner/repo\" format")]
        repo: String,

        #[arg(long, help = "Output file path (required unless --dry-run)")]
        output: Option<String>,

        #[arg(long, help = "Include prerelease versions")]
        include_prerelease: bool,

        #[arg(long, help = "Print output without writing file")]
        dry_run: bool,
    },

    /// Suggest the next version from pending changes
    NextVersion {
        #[arg(long, help = "Changelog file (defaults to the configured path)")]
        file: Option<String>,
    },

    /// Print a version bumped by major, minor or patch
    Bump { version: String, kind: BumpKind },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl From<BumpKind> for VersionBump {
    fn from(kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => VersionBump::Major,
            BumpKind::Minor => VersionBump::Minor,
            BumpKind::Patch => VersionBump::Patch,
        }
    }
}

/// Run the parsed command and return the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref(), &cli.root)?;
    let ctx = Context::new(cli.root, config);
    tracing::debug!(root = %ctx.root.display(), "loaded configuration");

    match cli.command {
        Command::Validate { file } => orchestration::run_validate(&ctx, file.as_deref()),
        Command::Sort { file, dry_run } => {
            orchestration::run_sort(&ctx, &SortArgs { file, dry_run })
        }
        Command::CheckUpdated {
            skip_branch_check,
            staged,
        } => orchestration::run_check_updated(
            &ctx,
            &CheckUpdatedArgs {
                skip_branch_check,
                staged,
            },
        ),
        Command::Coverage { file } => orchestration::run_coverage(&ctx, file.as_deref()),
        Command::Migrate {
            input,
            output,
            repo_url,
            dry_run,
        } => orchestration::run_migrate(
            &ctx,
            &MigrateArgs {
                input,
                output,
                repo_url,
                dry_run,
            },
        ),
        Command::Retrofit {
            release_version,
            date,
            repo_url,
            output,
            dry_run,
        } => orchestration::run_retrofit(
            &ctx,
            &RetrofitArgs {
                version: release_version,
                date,
                repo_url,
                output,
                dry_run,
            },
        ),
        Command::Import {
            repo,
            output,
            include_prerelease,
            dry_run,
        } => orchestration::run_import(
            &ctx,
            &ImportArgs {
                repo,
                output,
                include_prerelease,
                dry_run,
            },
        ),
        Command::NextVersion { file } => orchestration::run_next_version(&ctx, file.as_deref()),
        Command::Bump { version, kind } => Ok(orchestration::run_bump(&version, kind.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_retrofit_version_flag() {
        let cli = Cli::parse_from(["changelog-kit", "retrofit", "--version", "2.0.0", "--dry-run"]);
        match cli.command {
            Command::Retrofit {
                release_version,
                dry_run,
                ..
            } => {
                assert_eq!(release_version, "2.0.0");
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["changelog-kit", "validate", "--root", "/tmp/x", "-c", "cfg.toml"]);
        assert_eq!(cli.root, PathBuf::from("/tmp/x"));
        assert_eq!(cli.config.as_deref(), Some("cfg.toml"));
    }

    #[test]
    fn test_bump_kind_into_version_bump() {
        assert_eq!(VersionBump::from(BumpKind::Major), VersionBump::Major);
        let cli = Cli::parse_from(["changelog-kit", "bump", "1.0.0", "patch"]);
        assert!(matches!(cli.command, Command::Bump { kind: BumpKind::Patch, .. }));
    }
}
