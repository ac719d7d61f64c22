use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changelog_kit::cli::{self, Cli};
use changelog_kit::ui;

fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(cli::orchestration::EXIT_FAILURE);
        }
    }
}
