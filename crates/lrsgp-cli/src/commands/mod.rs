//! Command implementations

mod config;
mod locate;
mod units;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match &cli.command {
        Commands::Locate(args) => {
            let config = load_config_with_overrides(&cli)?;
            locate::execute(args, &config, &output, cli.dry_run).await
        }
        Commands::Config => {
            let config = load_config_with_overrides(&cli)?;
            config::execute(&config, &output)
        }
        Commands::Units => units::execute(&output),
    }
}
