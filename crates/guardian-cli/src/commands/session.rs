//! Login, logout, session and status commands.

use colored::Colorize;
use guardian_model::DashboardSummary;
use serde::Deserialize;
use serde_json::Value;

use crate::config::OutputFormat;
use crate::output::{error, info, output_single, success, warning};
use crate::CliConfig;

use super::ApiClient;

/// Session state reported by the console.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Whether an operator is logged in.
    pub authenticated: bool,
    /// `local` or `redirect`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Login time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Whether the identity provider is configured.
    #[serde(default)]
    pub configured: bool,
}

/// Logout answer from the console.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoutView {
    #[serde(default)]
    logout_url: Option<String>,
}

/// Runs `guardian login`.
///
/// Without `--local`, prints the identity-provider URL to open in a browser.
/// The provider sends the browser back to the console, which completes the
/// login on its side.
pub async fn run_login(
    config: &CliConfig,
    server: Option<&str>,
    local: bool,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;

    if local {
        let session: SessionView = client.post_empty("/login/local").await?;
        return match format {
            OutputFormat::Table => {
                success("Logged in locally");
                Ok(())
            }
            _ => output_single(&session, format),
        };
    }

    let url = client.get_redirect("/login").await?;
    match format {
        OutputFormat::Table => {
            info("Open this URL in a browser to log in:");
            println!();
            println!("  {}", url.underline());
            println!();
            info("Then run `guardian session` to confirm.");
        }
        OutputFormat::Json => println!("{}", serde_json::json!({ "authorizationUrl": url })),
        OutputFormat::Yaml | OutputFormat::Quiet => println!("{url}"),
    }
    Ok(())
}

/// Runs `guardian logout`.
pub async fn run_logout(config: &CliConfig, server: Option<&str>) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;
    let logout: LogoutView = client.post_empty("/logout").await?;

    success("Logged out");
    if let Some(url) = logout.logout_url {
        info(&format!("End the identity provider session at: {url}"));
    }
    Ok(())
}

/// Runs `guardian session`.
pub async fn run_session(
    config: &CliConfig,
    server: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;
    let session: SessionView = client.get("/api/session").await?;

    if format != OutputFormat::Table {
        return output_single(&session, format);
    }

    if session.authenticated {
        success(&format!(
            "Logged in ({}) since {}",
            session.method.as_deref().unwrap_or("unknown"),
            session.since.as_deref().unwrap_or("-")
        ));
    } else {
        info("Not logged in");
    }
    if !session.configured {
        warning("Identity provider not configured");
    }
    Ok(())
}

/// Runs `guardian dashboard`.
pub async fn run_dashboard(
    config: &CliConfig,
    server: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;
    let summary: DashboardSummary = client.get("/api/dashboard").await?;

    if format != OutputFormat::Table {
        return output_single(&summary, format);
    }

    println!("{:<10} {}", "Total:".bold(), summary.total);
    println!("{:<10} {}", "Active:".bold(), summary.active.to_string().green());
    println!("{:<10} {}", "Inactive:".bold(), summary.inactive.to_string().red());
    Ok(())
}

/// Runs `guardian status`.
pub async fn run_status(config: &CliConfig, server: Option<&str>) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;
    let base_url = client.base_url();

    info(&format!("Checking console status at {base_url}..."));

    // Try health endpoint
    match client.get::<Value>("/health").await {
        Ok(health) => {
            success("Console is reachable");
            println!();

            if let Some(status) = health.get("status").and_then(Value::as_str) {
                println!("Status: {status}");
            }
            if let Some(version) = health.get("version").and_then(Value::as_str) {
                println!("Version: {version}");
            }

            match client.get::<SessionView>("/api/session").await {
                Ok(session) => {
                    println!(
                        "Session: {}",
                        if session.authenticated { "logged in" } else { "logged out" }
                    );
                    println!(
                        "Identity provider: {}",
                        if session.configured { "configured" } else { "not configured" }
                    );
                }
                Err(e) => warning(&format!("Session unavailable: {e}")),
            }
        }
        Err(e) => {
            error(&format!("Console is not reachable: {e}"));
        }
    }

    Ok(())
}
