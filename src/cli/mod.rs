// CLI interface
pub mod commands;

use crate::config::{ConfigStore, SessionOverrides};
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ocli")]
#[command(about = "Manage cluster CLI sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file
    #[arg(long, global = true, env = "OCLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Context to use instead of current_context
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Server URL, overrides the context's cluster
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Bearer token, overrides the context's user
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log out the current user
    ///
    /// Deletes the token on the server, then removes it from every user
    /// in the config file that holds it.
    ///
    /// To log back in, run your cluster's login command.
    Logout {
        /// Not accepted; present so a stray argument gets a clear error
        #[arg(hide = true)]
        args: Vec<String>,
    },

    /// Print the name of the user the current token belongs to
    Whoami,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the config file path and what it resolves to
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    pub fn overrides(&self) -> SessionOverrides {
        SessionOverrides {
            context: self.context.clone(),
            server: self.server.clone(),
            token: self.token.clone(),
        }
    }
}

pub fn execute(args: Cli) -> Result<()> {
    let overrides = args.overrides();
    let config_path = ConfigStore::config_file_path(args.config.as_deref())?;
    tracing::debug!("Using config file {}", config_path.display());

    match args.command {
        Commands::Logout { args } => commands::logout::execute(&config_path, &overrides, &args),
        Commands::Whoami => commands::whoami::execute(&config_path, &overrides),
        Commands::Config(command) => commands::config::execute(command, &config_path, &overrides),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
    }
}
