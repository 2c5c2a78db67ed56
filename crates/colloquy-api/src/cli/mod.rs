//! CLI command definitions for the `colloquy` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Run and administer the Colloquy chat server.
#[derive(Parser)]
#[command(name = "colloquy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on (defaults to config.toml, then 8000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config.toml, then 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a regular user.
    Create {
        /// Email address, used as the login name.
        email: String,

        /// Grant staff status.
        #[arg(long)]
        staff: bool,

        /// Password (prompted for when omitted).
        #[arg(long, env = "COLLOQUY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create a staff superuser.
    CreateSuperuser {
        /// Email address, used as the login name.
        email: String,

        /// Password (prompted for when omitted).
        #[arg(long, env = "COLLOQUY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List all users.
    #[command(alias = "ls")]
    List,
}
