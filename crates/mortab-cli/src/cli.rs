//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Mortab: extract demographic and mortality statistics from a workbook
#[derive(Parser, Debug)]
#[command(name = "mortab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the workbook (xlsx, xlsm, xls, xlsb, ods)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Inline JSON configuration object
    #[arg(value_name = "CONFIG_JSON", conflicts_with = "config")]
    pub config_json: Option<String>,

    /// Read the JSON configuration from a file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_inline_config() {
        let cli = Cli::try_parse_from(["mortab", "base.xlsx", r#"{"extract_formulas": false}"#]).unwrap();
        assert_eq!(cli.file, PathBuf::from("base.xlsx"));
        assert!(cli.config_json.is_some());
        assert!(!cli.compact);
    }

    #[test]
    fn test_inline_and_file_config_conflict() {
        let result = Cli::try_parse_from(["mortab", "base.xlsx", "{}", "--config", "c.json"]);
        assert!(result.is_err());
    }
}
