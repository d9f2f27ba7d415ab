//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Command;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile process-model anti-patterns into Cypher queries", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    ///
    /// If not specified, `.antipattern_search.json` in the current directory is
    /// used when present, otherwise the built-in catalogue.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_global_defaults() {
        let args = Args::try_parse_from(["antipattern_search", "list"]).unwrap();
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.config, None);
    }

    #[rstest]
    #[case("table", OutputFormat::Table)]
    #[case("json", OutputFormat::Json)]
    #[case("toon", OutputFormat::Toon)]
    fn test_format_after_subcommand(#[case] value: &str, #[case] expected: OutputFormat) {
        let args = Args::try_parse_from(["antipattern_search", "queries", "-o", value]).unwrap();
        assert_eq!(args.format, expected);
    }

    #[rstest]
    fn test_config_path() {
        let args =
            Args::try_parse_from(["antipattern_search", "--config", "custom.json", "list"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.json")));
    }

    #[rstest]
    fn test_unknown_subcommand_rejected() {
        assert!(Args::try_parse_from(["antipattern_search", "benchmark"]).is_err());
    }

    #[rstest]
    fn test_invalid_format_rejected() {
        assert!(Args::try_parse_from(["antipattern_search", "-o", "xml", "list"]).is_err());
    }
}
