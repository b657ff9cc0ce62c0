//! The minimal command-line front end this binary needs. Daemonizing,
//! PID files, log rotation and the shell-safe subprocess wrapper the
//! teacher builds around its own CLI are named-out-of-scope collaborators;
//! this just binds the socket and runs, or prints the parsed config.

use clap::{Parser, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Bind the configured UDP port and answer queries until killed.
    Serve,
    /// Print the configuration parsed from the environment and exit.
    ShowConfig,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve
    }
}

#[derive(Parser)]
#[command(name = "envdns", arg_required_else_help(false))]
/// A tiny authoritative DNS server configured entirely through environment variables.
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn command(&self) -> Commands {
        match &self.command {
            Some(Commands::Serve) => Commands::Serve,
            Some(Commands::ShowConfig) => Commands::ShowConfig,
            None => Commands::default(),
        }
    }
}
