//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;
pub mod render;

/// Hybrid Todo - DummyJSON todos with changes that stick
#[derive(Parser, Debug)]
#[command(name = "htodo", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Local store path (default: ~/.hybrid-todo/data/local-storage.db)
    #[arg(long, global = true, env = "HTODO_STORE")]
    pub store: Option<PathBuf>,

    /// Todo API base URL (default: https://dummyjson.com)
    #[arg(long, global = true, env = "HTODO_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List todos (remote snapshot with local changes applied)
    List(ViewArgs),

    /// Add a local todo
    Add {
        /// Todo text
        text: String,
    },

    /// Change the text of a todo
    Edit {
        /// Todo ID
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// New text
        text: String,
    },

    /// Flip a todo between pending and completed
    Toggle {
        /// Todo ID
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Delete a todo (hidden locally until reset)
    Delete {
        /// Todo ID
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Discard all local changes and reload the original data
    Reset {
        /// Confirm discarding every local change
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the local change set
    Patches,

    /// Settings management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// The page the user is looking at.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Page number (starts at 1)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Todos per page (default: 10, or `per_page` from config)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Filter by status (all, completed, pending)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings and file locations
    Show,

    /// Set a setting (endpoint, fetch_limit, per_page, timeout_secs)
    Set {
        /// Setting name
        key: String,

        /// New value
        value: String,
    },

    /// Remove all saved settings
    Reset,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_ids_parse() {
        let cli = Cli::parse_from(["htodo", "toggle", "-3"]);
        assert!(matches!(cli.command, Commands::Toggle { id: -3 }));

        let cli = Cli::parse_from(["htodo", "edit", "-1", "new text"]);
        assert!(matches!(cli.command, Commands::Edit { id: -1, .. }));
    }

    #[test]
    fn test_list_view_args() {
        let cli = Cli::parse_from(["htodo", "list", "--page", "2", "--per-page", "5", "-s", "done"]);
        let Commands::List(view) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(view.page, Some(2));
        assert_eq!(view.per_page, Some(5));
        assert_eq!(view.status.as_deref(), Some("done"));
    }
}
