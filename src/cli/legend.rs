use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

/// Parse and validate a figure legend.
#[derive(Debug, Parser)]
#[command(about = "Parse and validate a figure legend")]
pub struct Legend {
    /// Legend file to parse ('-' for stdin)
    input: PathBuf,

    /// Print the canonical re-serialized form instead of the entry table
    #[arg(long)]
    canonical: bool,
}

impl Legend {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let raw = super::read_input(&self.input)?;

        let parsed = match patlint::parse::legend::parse(&raw) {
            Ok(parsed) => parsed,
            Err(diagnostic) => super::fail_with_diagnostic(&diagnostic),
        };

        super::print_legend_warnings(&parsed.warnings);

        if self.canonical {
            println!("{}", parsed.map);
        } else {
            for entry in &parsed.map {
                println!("{:>6}  {}", entry.numeral(), entry.description());
            }
            println!();
            println!(
                "{}",
                format!("✅ {} legend entries", parsed.map.len()).success()
            );
        }

        Ok(())
    }
}
