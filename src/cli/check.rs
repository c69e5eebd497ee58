use std::{collections::BTreeSet, path::PathBuf};

use clap::Parser;
use patlint::{
    CheckContext, CheckKind, ClaimDocument, Config, Report,
    parse::segment,
    phonetic::{self, PhoneticProvider},
};
use tracing::instrument;

use super::terminal::{Colorize, rule_width};

/// Run the checker suite over a claims document.
#[derive(Debug, Parser)]
#[command(about = "Run the checker suite over a claims document")]
pub struct Check {
    /// Claims file to check ('-' for stdin)
    input: PathBuf,

    /// Legend file for the numeral-consistency and typo checks
    #[arg(long, value_name = "FILE")]
    legend: Option<PathBuf>,

    /// Checks to run (can be specified multiple times)
    #[arg(long, value_name = "TYPE")]
    check: Vec<CheckType>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
enum CheckType {
    /// Citation validity (unknown, self and forward references)
    Reference,
    /// Claim-final punctuation
    Period,
    /// Numbering continuity
    Numbering,
    /// Antecedent basis for 所述/该 features
    Antecedent,
    /// Annotated-numeral consistency (requires --legend)
    Numeral,
    /// Homophone typos (requires --legend)
    Typo,
    /// Run all applicable checks
    All,
}

impl CheckType {
    const fn kind(self) -> Option<CheckKind> {
        match self {
            Self::Reference => Some(CheckKind::Reference),
            Self::Period => Some(CheckKind::Period),
            Self::Numbering => Some(CheckKind::Numbering),
            Self::Antecedent => Some(CheckKind::Antecedent),
            Self::Numeral => Some(CheckKind::Numeral),
            Self::Typo => Some(CheckKind::Typo),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Check {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let text = super::read_input(&self.input)?;

        let document = ClaimDocument::new(segment(&text));
        if document.is_empty() {
            anyhow::bail!("no claims found in input");
        }

        // Legend warnings join the report so every output format (and the
        // totals) carries them.
        let mut legend_warnings = Vec::new();
        let legend = match &self.legend {
            Some(path) => {
                let legend_text = super::read_input(path)?;
                let parsed = match patlint::parse::legend::parse(&legend_text) {
                    Ok(parsed) => parsed,
                    Err(diagnostic) => super::fail_with_diagnostic(&diagnostic),
                };
                legend_warnings = parsed.warnings;
                Some(parsed.map)
            }
            None => None,
        };

        let kinds = self.resolve_kinds(config, legend.is_some())?;

        // The phonetic resource is only touched when the typo check will run.
        let provider: Option<&dyn PhoneticProvider> = if kinds.contains(&CheckKind::Typo) {
            match phonetic::acquire() {
                Ok(provider) => Some(provider),
                Err(error) => {
                    tracing::warn!(%error, "phonetic provider unavailable");
                    None
                }
            }
        } else {
            None
        };

        let context = CheckContext {
            document: &document,
            legend: legend.as_ref(),
            provider,
        };
        let report = patlint::check::run(&context, &kinds).merged_with(legend_warnings);

        match self.output {
            OutputFormat::Table => self.output_table(&report),
            OutputFormat::Json => Self::output_json(&report)?,
            OutputFormat::Summary => println!(
                "errors={} warnings={}",
                report.error_count(),
                report.warning_count()
            ),
        }

        if report.has_errors() {
            std::process::exit(2);
        }

        Ok(())
    }

    /// Resolves the check selection: explicit flags, then the configured
    /// default, then every check applicable to the supplied inputs.
    ///
    /// Explicitly selecting a legend-requiring check without `--legend` is a
    /// precondition failure.
    fn resolve_kinds(
        &self,
        config: &Config,
        has_legend: bool,
    ) -> anyhow::Result<BTreeSet<CheckKind>> {
        let explicit: Option<BTreeSet<CheckKind>> = if self.check.is_empty() {
            if config.checks.is_empty() {
                None
            } else {
                Some(config.checks.iter().copied().collect())
            }
        } else if self.check.contains(&CheckType::All) {
            None
        } else {
            Some(self.check.iter().filter_map(|t| t.kind()).collect())
        };

        match explicit {
            Some(kinds) => {
                if !has_legend {
                    if let Some(kind) = kinds.iter().find(|kind| kind.requires_legend()) {
                        anyhow::bail!(
                            "the {kind:?} check requires a legend; pass one with --legend"
                        );
                    }
                }
                Ok(kinds)
            }
            None => Ok(CheckKind::ALL
                .into_iter()
                .filter(|kind| has_legend || !kind.requires_legend())
                .collect()),
        }
    }

    fn output_table(&self, report: &Report) {
        if self.quiet {
            return;
        }

        if report.is_empty() {
            println!("{}", "✅ 未发现问题".success());
            return;
        }

        println!("{}", "─".repeat(rule_width()).dim());
        for line in report.to_string().lines() {
            if line.contains("[错误]") {
                println!("{}", line.error());
            } else if line.contains("[警告]") {
                println!("{}", line.warning());
            } else {
                println!("{line}");
            }
        }
        println!("{}", "─".repeat(rule_width()).dim());
    }

    fn output_json(report: &Report) -> anyhow::Result<()> {
        use serde_json::json;

        let findings: Vec<_> = report
            .findings()
            .iter()
            .map(|finding| {
                json!({
                    "kind": finding.kind,
                    "severity": finding.severity,
                    "claim_id": finding.claim_id,
                    "title": finding.kind.title(),
                    "message": finding.message,
                })
            })
            .collect();

        let output = json!({
            "status": if report.is_empty() { "clean" } else { "issues_found" },
            "summary": {
                "total": report.len(),
                "errors": report.error_count(),
                "warnings": report.warning_count(),
            },
            "findings": findings,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_args(check: Vec<CheckType>) -> Check {
        Check {
            input: PathBuf::from("-"),
            legend: None,
            check,
            output: OutputFormat::Table,
            quiet: false,
        }
    }

    #[test]
    fn default_selection_excludes_legend_checks_without_a_legend() {
        let kinds = check_args(Vec::new())
            .resolve_kinds(&Config::default(), false)
            .unwrap();
        assert!(!kinds.contains(&CheckKind::Numeral));
        assert!(!kinds.contains(&CheckKind::Typo));
        assert!(kinds.contains(&CheckKind::Reference));
    }

    #[test]
    fn default_selection_includes_everything_with_a_legend() {
        let kinds = check_args(Vec::new())
            .resolve_kinds(&Config::default(), true)
            .unwrap();
        assert_eq!(kinds.len(), CheckKind::ALL.len());
    }

    #[test]
    fn explicit_legend_check_without_legend_fails() {
        let error = check_args(vec![CheckType::Typo])
            .resolve_kinds(&Config::default(), false)
            .unwrap_err();
        assert!(error.to_string().contains("--legend"));
    }

    #[test]
    fn configured_checks_are_the_fallback() {
        let config = Config {
            checks: vec![CheckKind::Period],
            ..Config::default()
        };
        let kinds = check_args(Vec::new()).resolve_kinds(&config, false).unwrap();
        assert_eq!(kinds.into_iter().collect::<Vec<_>>(), vec![CheckKind::Period]);
    }

    #[test]
    fn all_expands_to_every_applicable_check() {
        let kinds = check_args(vec![CheckType::All, CheckType::Period])
            .resolve_kinds(&Config::default(), true)
            .unwrap();
        assert_eq!(kinds.len(), CheckKind::ALL.len());
    }
}
