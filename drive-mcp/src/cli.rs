//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

use crate::config::Transport;

/// Google Drive MCP server
///
/// Exposes Drive folder and file operations as MCP tools.
#[derive(Parser, Debug)]
#[command(name = "drive-mcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server (default)
    Serve(ServeArgs),

    /// Authorize access to Google Drive and save the token
    Auth,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Transport to serve on (overrides config)
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// Listen address for the HTTP transport (overrides config)
    #[arg(long)]
    pub bind: Option<String>,
}

impl Cli {
    /// The command to run, `serve` when none was given
    pub fn command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}
