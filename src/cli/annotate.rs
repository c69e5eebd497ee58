use std::path::PathBuf;

use clap::Parser;
use patlint::{
    Config,
    annotate::{DocType, Options, annotate},
};
use tracing::instrument;

use super::terminal::Colorize;

/// The fixed download-convention file name used by `--save`.
const SAVE_FILE_NAME: &str = "专利文档_已标号.txt";

/// Insert reference-numeral annotations into text.
#[derive(Debug, Parser)]
#[command(about = "Insert reference-numeral annotations into text")]
pub struct Annotate {
    /// Text file to annotate ('-' for stdin)
    input: PathBuf,

    /// Legend file providing the numeral/description pairs
    #[arg(long, value_name = "FILE")]
    legend: PathBuf,

    /// Document type being annotated
    #[arg(long, value_name = "TYPE")]
    doc_type: Option<DocTypeArg>,

    /// Omit the space between description and numeral
    #[arg(long)]
    smart_spacing: bool,

    /// Match descriptions case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Auto-correct doubled characters and whitespace runs first
    #[arg(long)]
    auto_correct: bool,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "PATH", conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write the result to 专利文档_已标号.txt in the working directory
    #[arg(long)]
    save: bool,
}

/// CLI selector for the document type.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DocTypeArg {
    /// 权利要求书 — annotate as `描述 (标号)`
    Claims,
    /// 说明书 — annotate as `描述 标号`
    Description,
}

impl From<DocTypeArg> for DocType {
    fn from(arg: DocTypeArg) -> Self {
        match arg {
            DocTypeArg::Claims => Self::Claims,
            DocTypeArg::Description => Self::Description,
        }
    }
}

impl Annotate {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let text = super::read_input(&self.input)?;
        let legend_text = super::read_input(&self.legend)?;

        let parsed = match patlint::parse::legend::parse(&legend_text) {
            Ok(parsed) => parsed,
            Err(diagnostic) => super::fail_with_diagnostic(&diagnostic),
        };
        super::print_legend_warnings(&parsed.warnings);

        let doc_type = self.doc_type.map_or(config.doc_type, Into::into);
        let defaults = config.options();
        let options = Options {
            smart_spacing: self.smart_spacing || defaults.smart_spacing,
            case_sensitive: self.case_sensitive || defaults.case_sensitive,
            auto_correct: self.auto_correct || defaults.auto_correct,
        };

        let annotated = annotate(&text, &parsed.map, doc_type, options)?;

        if self.save {
            std::fs::write(SAVE_FILE_NAME, &annotated.text)
                .map_err(|e| anyhow::anyhow!("Failed to write {SAVE_FILE_NAME}: {e}"))?;
            println!(
                "{}",
                format!("✅ Wrote {SAVE_FILE_NAME} ({} annotations)", annotated.applied).success()
            );
        } else if let Some(path) = &self.output {
            std::fs::write(path, &annotated.text)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            println!(
                "{}",
                format!(
                    "✅ Wrote {} ({} annotations)",
                    path.display(),
                    annotated.applied
                )
                .success()
            );
        } else {
            println!("{}", annotated.text);
            eprintln!(
                "{}",
                format!("✅ Applied {} annotations", annotated.applied).success()
            );
        }

        Ok(())
    }
}
