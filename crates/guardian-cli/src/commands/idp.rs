//! Identity-provider settings commands.

use colored::Colorize;
use guardian_core::IdpConfig;
use guardian_oidc::{ConnectionReport, TestStatus};
use serde::{Deserialize, Serialize};

use crate::cli::IdpCommand;
use crate::config::OutputFormat;
use crate::output::{error, info, output_single, prompt, prompt_password, success, warning};
use crate::CliConfig;

use super::ApiClient;

/// Configuration as returned by the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    /// Configuration (password masked).
    #[serde(flatten)]
    pub config: IdpConfig,
    /// Whether the required fields are set.
    #[serde(default)]
    pub configured: bool,
    /// Blank required fields.
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Runs an identity-provider command.
pub async fn run_idp(
    cmd: IdpCommand,
    config: &CliConfig,
    server: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;

    match cmd {
        IdpCommand::Show => show(&client, format).await,
        IdpCommand::Set {
            server_url,
            realm,
            client_id,
            admin_username,
            admin_password,
        } => {
            let mut current = client.get::<ConfigView>("/api/config").await?.config;
            for (key, value) in [
                ("serverUrl", server_url),
                ("realm", realm),
                ("clientId", client_id),
                ("adminUsername", admin_username),
            ] {
                if let Some(value) = value {
                    current
                        .set_field(key, &value)
                        .map_err(|e| crate::CliError::Validation(e.to_string()))?;
                }
            }
            if admin_password {
                current.admin_password = prompt_password("Admin password: ")?;
            }
            save(&client, &current, format).await
        }
        IdpCommand::Init => init(&client, format).await,
        IdpCommand::Test => test(&client, format).await,
    }
}

/// Shows the active configuration.
async fn show(client: &ApiClient, format: OutputFormat) -> crate::CliResult<()> {
    let view: ConfigView = client.get("/api/config").await?;

    if format != OutputFormat::Table {
        return output_single(&view, format);
    }

    print_config(&view);
    Ok(())
}

/// Saves a configuration on the console.
async fn save(client: &ApiClient, config: &IdpConfig, format: OutputFormat) -> crate::CliResult<()> {
    let view: ConfigView = client.put("/api/config", config).await?;

    if format != OutputFormat::Table {
        return output_single(&view, format);
    }

    success("Identity provider configuration saved");
    print_config(&view);
    Ok(())
}

/// Prompts for every field, starting from the current values or the form
/// defaults.
async fn init(client: &ApiClient, format: OutputFormat) -> crate::CliResult<()> {
    let view: ConfigView = client.get("/api/config").await?;
    let start = if view.configured {
        view.config
    } else {
        IdpConfig::form_defaults()
    };

    info("Configuring the identity provider...");
    println!();

    let mut config = IdpConfig::new(
        prompt("Server URL", &start.server_url)?,
        prompt("Realm", &start.realm)?,
        prompt("Client ID", &start.client_id)?,
    );
    config.admin_username = prompt("Admin username", &start.admin_username)?;

    // Keep the stored password when left empty; the console swaps the mask back.
    let password = prompt_password("Admin password (leave empty to keep): ")?;
    config.admin_password = if password.is_empty() {
        start.admin_password
    } else {
        password
    };

    println!();
    save(client, &config, format).await
}

/// Tests connectivity to the identity provider.
async fn test(client: &ApiClient, format: OutputFormat) -> crate::CliResult<()> {
    info("Testing connection to the identity provider...");
    let report: ConnectionReport = match client.post_empty("/api/config/test").await {
        Ok(report) => report,
        Err(crate::CliError::Api { status: 502, message }) => {
            error(&message);
            return Err(crate::CliError::Connection(
                "identity provider connectivity test failed".to_string(),
            ));
        }
        Err(e) => return Err(e),
    };

    if format != OutputFormat::Table {
        return output_single(&report, format);
    }

    match report.status {
        TestStatus::Success => success(&format!("{} ({} ms)", report.message, report.elapsed_ms)),
        _ => warning(&report.message),
    }
    Ok(())
}

fn print_config(view: &ConfigView) {
    let config = &view.config;
    println!("{:<16} {}", "Server URL:".bold(), config.server_url);
    println!("{:<16} {}", "Realm:".bold(), config.realm);
    println!("{:<16} {}", "Client ID:".bold(), config.client_id);
    println!("{:<16} {}", "Admin username:".bold(), config.admin_username);
    println!("{:<16} {}", "Admin password:".bold(), config.admin_password);

    if view.configured {
        println!("{:<16} {}", "Status:".bold(), "configured".green());
    } else {
        println!(
            "{:<16} {} (missing: {})",
            "Status:".bold(),
            "not configured".red(),
            view.missing.join(", ")
        );
    }
}
