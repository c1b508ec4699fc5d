mod compare;
mod config_cmd;
mod schema;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;

pub use compare::CompareCommand;

/// Exit status when the comparison ran but no score could be produced
pub const EXIT_NO_SCORE: u8 = 2;

#[derive(Parser)]
#[command(name = "dance-match")]
#[command(about = "Score how closely a dance recording follows a reference", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "DANCE_MATCH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a user motion sequence against a reference
    Compare(CompareCommand),

    /// Print the joint order poses are expected to follow
    Schema,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<ExitCode> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Compare(cmd) => {
                let config = Config::load(config_path)?;
                cmd.execute(&config)
            }
            Commands::Schema => {
                schema::print_schema();
                Ok(ExitCode::SUCCESS)
            }
            Commands::Config(subcmd) => {
                match subcmd {
                    ConfigSubcommands::Show => config_cmd::show_config(config_path)?,
                    ConfigSubcommands::Path => config_cmd::show_path(config_path)?,
                    ConfigSubcommands::Init { force } => {
                        config_cmd::init_config(config_path, force)?
                    }
                }
                Ok(ExitCode::SUCCESS)
            }
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
