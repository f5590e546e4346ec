//! Command-line interface.
//!
//! Runs transport scripts against the headless backend and prints the
//! effective configuration or its schema.

pub mod formatting;
pub mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Result;
use crate::config::{Config, ConfigPaths};
use formatting::format_report;
use script::Script;

/// Command line of the `wavecontrol` binary
#[derive(Debug, Parser)]
#[command(name = "wavecontrol")]
#[command(about = "Drive a waveform player session from the command line")]
pub struct Cli {
    /// Configuration file to use instead of the XDG default
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to daily files
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Directory for log files (defaults to the XDG state directory)
    #[arg(long, global = true, requires = "log_file")]
    pub log_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a transport script against the headless player
    Run {
        /// Script file (TOML)
        script: PathBuf,

        /// Print one JSON snapshot per line instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Print the JSON schema of the configuration file
    Schema,
}

impl Cli {
    /// Load the configuration selected by the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or is invalid.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => Config::load(),
        }
    }

    /// Directory for log files, when file logging is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the default log directory cannot be created.
    pub fn log_dir(&self) -> Result<Option<PathBuf>> {
        if !self.log_file {
            return Ok(None);
        }

        match &self.log_dir {
            Some(dir) => Ok(Some(dir.clone())),
            None => Ok(Some(ConfigPaths::log_dir()?)),
        }
    }

    /// Execute the selected subcommand and return its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails or output cannot be produced.
    pub async fn execute(&self, config: &Config) -> Result<String> {
        match &self.command {
            Commands::Run { script, json } => {
                let reports = Script::from_path(script)?.run(&config.player).await?;
                let lines: Vec<String> = if *json {
                    reports
                        .iter()
                        .map(serde_json::to_string)
                        .collect::<std::result::Result<_, _>>()?
                } else {
                    reports.iter().map(format_report).collect()
                };
                Ok(lines.join("\n"))
            }
            Commands::Config => config.to_toml_string(),
            Commands::Schema => {
                let schema = schemars::schema_for!(Config);
                Ok(serde_json::to_string_pretty(&schema)?)
            }
        }
    }
}
