//! The `plint` command-line interface.

use std::path::{Path, PathBuf};

mod annotate;
mod check;
mod legend;
mod terminal;

use annotate::Annotate;
use check::Check;
use clap::ArgAction;
use legend::Legend;
use patlint::{Config, domain::CONFIG_FILE_NAME, parse::Diagnostic};
use terminal::Colorize;

/// Top-level argument parser.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file (defaults to .patlint.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration cannot be loaded or the
    /// subcommand fails.
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path).map_err(|e| anyhow::anyhow!(e)),
        None => {
            let default = Path::new(CONFIG_FILE_NAME);
            if default.exists() {
                Config::load(default).map_err(|e| anyhow::anyhow!(e))
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// The `plint` subcommands.
#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Parse and validate a figure legend
    Legend(Legend),

    /// Insert reference-numeral annotations into text
    Annotate(Annotate),

    /// Run the checker suite over a claims document
    Check(Check),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Legend(command) => command.run(),
            Self::Annotate(command) => command.run(config),
            Self::Check(command) => command.run(config),
        }
    }
}

/// Reads an input file, with `-` meaning stdin.
///
/// Empty input (after trimming) is a precondition failure: nothing
/// downstream is computed from it.
fn read_input(path: &Path) -> anyhow::Result<String> {
    let text = if path == Path::new("-") {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?
    };

    if text.trim().is_empty() {
        anyhow::bail!("input is empty");
    }
    Ok(text)
}

/// Renders a fatal legend diagnostic as a titled detail block and exits.
///
/// This is the CLI analog of the blocking dialog the diagnostics are written
/// for: title line, full detail with suggested corrections, exit code 1.
fn fail_with_diagnostic(diagnostic: &Diagnostic) -> ! {
    eprintln!("{}", diagnostic.title().error());
    eprintln!("{}", "─".repeat(terminal::rule_width()).dim());
    eprintln!("{}", diagnostic.detail());
    std::process::exit(1);
}

/// Prints non-fatal legend warnings to stderr.
fn print_legend_warnings(warnings: &[patlint::Finding]) {
    for warning in warnings {
        eprintln!(
            "{}",
            format!(
                "[{}] {}：{}",
                warning.severity,
                warning.kind.title(),
                warning.message
            )
            .warning()
        );
    }
}
