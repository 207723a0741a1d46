//! # Guardian CLI
//!
//! Command-line client for the Guardian console.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use guardian_cli::{
    cli::{Cli, Command},
    commands::{
        run_config, run_dashboard, run_idp, run_login, run_logout, run_session, run_status,
        run_user,
    },
    config::CliConfig,
    output::error,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    let server = cli.server.as_deref();
    let format = cli.output.unwrap_or(config.output_format);

    // Execute command
    let result = match cli.command {
        Command::Login { local } => run_login(&config, server, local, format).await,
        Command::Logout => run_logout(&config, server).await,
        Command::Session => run_session(&config, server, format).await,
        Command::Dashboard => run_dashboard(&config, server, format).await,
        Command::User(cmd) => run_user(cmd, &config, server, format).await,
        Command::Idp(cmd) => run_idp(cmd, &config, server, format).await,
        Command::Config(cmd) => run_config(cmd, &mut config),
        Command::Status => run_status(&config, server).await,
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
