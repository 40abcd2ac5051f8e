//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for linkpeek using clap's derive macros.

use clap::{Parser, Subcommand};

/// linkpeek - short links with bot-aware previews
#[derive(Parser, Debug)]
#[command(name = "linkpeek")]
#[command(version)]
#[command(about = "A URL shortener with Open Graph link previews", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: linkpeek.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create a short link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Preview title / description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Image file to upload as the preview thumbnail
        #[arg(long, short = 't')]
        thumbnail: Option<String>,
    },

    /// Resolve a short code the way the server would
    Resolve {
        /// Short code to look up
        code: String,

        /// User-Agent to classify (default: empty, i.e. a browser)
        #[arg(long, short = 'u', default_value = "")]
        user_agent: String,
    },

    /// Print a sample configuration file
    Config,
}

impl Cli {
    /// `serve` when no subcommand is given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["linkpeek"]).unwrap();
        assert_eq!(cli.command_or_default(), Commands::Serve);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_create_args() {
        let cli = Cli::try_parse_from([
            "linkpeek",
            "create",
            "https://example.com",
            "-d",
            "Demo Page",
            "--config",
            "prod.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("prod.toml"));
        assert_eq!(
            cli.command_or_default(),
            Commands::Create {
                url: "https://example.com".to_string(),
                description: Some("Demo Page".to_string()),
                thumbnail: None,
            }
        );
    }

    #[test]
    fn test_resolve_user_agent_defaults_to_empty() {
        let cli = Cli::try_parse_from(["linkpeek", "resolve", "abc123"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Resolve {
                code: "abc123".to_string(),
                user_agent: String::new(),
            }
        );
    }
}
