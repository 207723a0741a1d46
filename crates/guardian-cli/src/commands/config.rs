//! CLI configuration commands.

use crate::cli::ConfigCommand;
use crate::output::{info, success};
use crate::CliConfig;

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &mut CliConfig) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            success(&format!("Set {key} = {value}"));
            Ok(())
        }
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig) -> crate::CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info(&format!("Configuration file: {}", config_path.display()));
    println!();
    println!("server_url: {}", config.server_url);
    println!("output_format: {:?}", config.output_format);

    Ok(())
}
