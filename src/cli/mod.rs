//! Command-line interface for change-remote
//!
//! Parses arguments, sets up logging and the terminal, then hands a resolved
//! [`Invocation`] to the [`Workflow`]. The process exit code comes from the
//! workflow's [`Outcome`]; anything that escapes as an error is reported once
//! here and exits with 1.

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, Config};
use crate::git::{Git, ProcessCommandRunner};
use crate::render::{enable_terminal_colors, Palette, Reporter};

pub mod interrupt;
pub mod workflow;

pub use workflow::{Invocation, Outcome, Workflow};

const AFTER_HELP: &str = "\
Examples:
  change-remote MyProject
  change-remote MyProject https://github.com/username/
  change-remote --test MyProject
  change-remote --dry-run MyProject

Notes:
  - The remote repository is checked with `git ls-remote` before anything changes
  - If it does not exist or cannot be reached, nothing is changed (exit code 0)
  - Default host path: https://github.com/lzorn-lzorn/";

/// Point this working copy's origin remote at <GITHUB_PATH><REPO_NAME>.git
#[derive(Parser, Debug)]
#[command(name = "change-remote")]
#[command(author, version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Name of the repository to point the remote at (no scheme, no .git)
    #[arg(value_name = "REPO_NAME", value_parser = NonEmptyStringValueParser::new())]
    pub repo_name: String,

    /// Host path the repository lives under (default: https://github.com/lzorn-lzorn/)
    #[arg(value_name = "GITHUB_PATH")]
    pub github_path: Option<String>,

    /// Test the connection to the remote after changing it
    #[arg(long)]
    pub test: bool,

    /// Only show what would be done, without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to config file (change-remote.toml or change-remote.yml)
    #[arg(short = 'c', long, value_name = "FILE", env = "CHANGE_REMOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge arguments over the loaded config.
    pub fn invocation(&self, config: &Config) -> Invocation {
        let host_path = self.github_path.as_deref().unwrap_or(&config.host_path);
        Invocation::new(&self.repo_name, host_path, &config.remote_name)
            .test_connection(self.test)
            .dry_run(self.dry_run)
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    enable_terminal_colors();

    let palette = Palette::default();
    interrupt::install(palette.clone());

    let mut reporter = Reporter::stdout(palette);
    match execute(&cli, &mut reporter) {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            reporter.error(format_args!("Unexpected error: {error:#}"));
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, reporter: &mut Reporter<W>) -> Result<Outcome> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let config = load_config(&cwd, cli.config.as_deref())?;
    tracing::debug!(?config, "resolved configuration");

    let invocation = cli.invocation(&config);
    let runner = ProcessCommandRunner::new(config.timeout());
    let git = Git::new(&runner, config.git_binary.as_str());

    Ok(Workflow::new(git, reporter).run(&invocation))
}

fn init_tracing(verbose: bool) {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(verbose, rust_log.as_deref()))
        .try_init();
}

/// A usable `RUST_LOG` wins outright; otherwise `--verbose` picks DEBUG over WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let fallback = if verbose { Level::DEBUG } else { Level::WARN };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(fallback.into()))
}
