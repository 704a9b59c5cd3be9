//! Analyze command - extract statistics from a workbook and emit the report.

use std::fs;
use std::path::Path;

use colored::Colorize;
use mortab::{AnalysisConfig, Mortab, MortabError, Report, Result};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config_json.as_deref(), cli.config.as_deref())?;
    let report = Mortab::with_config(config).analyze(&cli.file)?;

    match &cli.output {
        Some(path) if cli.compact => {
            fs::write(path, report.to_json(false)?).map_err(|source| MortabError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(output = %path.display(), "report written");
        }
        Some(path) => {
            report.save(path)?;
            tracing::info!(output = %path.display(), "report written");
        }
        None => println!("{}", report.to_json(!cli.compact)?),
    }

    eprintln!("{}", summary_line(&cli.file, &report));
    Ok(())
}

/// Resolve the configuration from the inline argument or `--config` file.
fn load_config(inline: Option<&str>, file: Option<&Path>) -> Result<AnalysisConfig> {
    match (inline, file) {
        (Some(json), _) => AnalysisConfig::from_json(json),
        (None, Some(path)) => {
            let json = fs::read_to_string(path).map_err(|source| MortabError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            AnalysisConfig::from_json(&json)
        }
        (None, None) => Ok(AnalysisConfig::default()),
    }
}

fn summary_line(file: &Path, report: &Report) -> String {
    let summary = &report.statistics.summary;
    let mark = |analyzed: bool| {
        if analyzed {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        }
    };

    let warnings = report.validation.warnings().len();
    let errors = report.validation.errors().len();

    format!(
        "{} {}: roster {}, deaths {}, qx {} | {} sheets, {} formulas | {} warnings, {} errors",
        "Analyzed".cyan().bold(),
        file.display().to_string().white(),
        mark(summary.roster_analyzed),
        mark(summary.death_registry_analyzed),
        mark(summary.mortality_table_analyzed),
        report.file_structure.scanned_sheets.len(),
        summary.total_formulas,
        warnings.to_string().yellow(),
        errors.to_string().red()
    )
}
