//! wavecontrol - drive a waveform player session from the command line.

use std::{error::Error, process};

use clap::Parser;
use tracing::debug;
use wavecontrol::{cli::Cli, cli::formatting::format_error, tracing_config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let _guard = match cli.log_dir()? {
        Some(dir) => Some(tracing_config::init_with_file(
            config.general.log_level,
            &dir,
        )?),
        None => {
            tracing_config::init(config.general.log_level)?;
            None
        }
    };
    debug!("Running {:?}", cli.command);

    match cli.execute(&config).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
