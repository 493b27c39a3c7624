//! CLI definitions for Vibey.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Vibey CLI.
#[derive(Parser)]
#[command(name = "vibey")]
#[command(about = "Quota-gated, humanized reply agent for social feeds")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to config/vibey.toml, ./vibey.toml, ~/.vibey/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Work the feed until the daily goal is reached (default)
    Run,

    /// Print the events of an audit session
    History {
        /// Session (context) id printed when a run starts
        context_id: Option<String>,
    },

    /// Show today's quota usage
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["vibey"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_history_with_id() {
        let cli = Cli::try_parse_from(["vibey", "history", "ctx_42"]).unwrap();
        match cli.command {
            Some(Commands::History { context_id }) => {
                assert_eq!(context_id.as_deref(), Some("ctx_42"))
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_history_without_id_parses() {
        let cli = Cli::try_parse_from(["vibey", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History { context_id: None })
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["vibey", "status", "--config", "bot.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bot.toml")));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }
}
