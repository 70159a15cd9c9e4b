//! Command-line interface for queryvoice
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voice input and result narration for document queries
#[derive(Parser, Debug)]
#[command(
    name = "queryvoice",
    version,
    about = "Voice input and result narration for document queries"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the narration text of a saved analysis result
    Narrate {
        /// JSON file holding the analysis result
        #[arg(value_name = "RESULT_JSON")]
        file: PathBuf,

        /// Currency symbol placed before the amount
        #[arg(long, value_name = "SYMBOL")]
        currency: Option<String>,
    },

    /// Print the narration voice picked from a JSON voice list
    SelectVoice {
        /// JSON file holding an array of voices
        #[arg(value_name = "VOICES_JSON")]
        file: PathBuf,

        /// Language tag to prefer (default: narration language from config)
        #[arg(long, value_name = "TAG")]
        lang: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default configuration file path
    Path,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Log verbosity from `-q` / `-v` flags. Quiet wins.
pub fn verbosity(cli: &Cli) -> Option<u8> {
    if cli.quiet { None } else { Some(cli.verbose) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_narrate() {
        let cli = Cli::try_parse_from(["queryvoice", "narrate", "result.json"]).unwrap();
        match cli.command {
            Commands::Narrate { file, currency } => {
                assert_eq!(file, PathBuf::from("result.json"));
                assert!(currency.is_none());
            }
            other => panic!("Expected Narrate, got {other:?}"),
        }
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_narrate_with_currency() {
        let cli =
            Cli::try_parse_from(["queryvoice", "narrate", "r.json", "--currency", "$"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Narrate { currency: Some(ref c), .. } if c == "$"
        ));
    }

    #[test]
    fn test_parse_select_voice() {
        let cli =
            Cli::try_parse_from(["queryvoice", "select-voice", "voices.json", "--lang", "en-GB"])
                .unwrap();
        match cli.command {
            Commands::SelectVoice { file, lang } => {
                assert_eq!(file, PathBuf::from("voices.json"));
                assert_eq!(lang.as_deref(), Some("en-GB"));
            }
            other => panic!("Expected SelectVoice, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["queryvoice", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));

        let cli = Cli::try_parse_from(["queryvoice", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "queryvoice",
            "config",
            "path",
            "--config",
            "/tmp/q.toml",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/q.toml")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["queryvoice"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["queryvoice", "-v", "config", "path"]).unwrap();
        assert_eq!(verbosity(&cli), Some(1));

        let cli = Cli::try_parse_from(["queryvoice", "-q", "-v", "config", "path"]).unwrap();
        assert_eq!(verbosity(&cli), None);
    }
}
