//! CLI argument parsing.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// Guardian CLI - client for the Keycloak Guardian console.
#[derive(Debug, Parser)]
#[command(name = "guardian")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Console server URL (overrides config).
    #[arg(short, long, env = "GUARDIAN_SERVER_URL")]
    pub server: Option<String>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in through the identity provider, or locally with `--local`.
    Login {
        /// Log in without the identity provider.
        #[arg(long)]
        local: bool,
    },

    /// Log out.
    Logout,

    /// Show the current session.
    Session,

    /// Show user counters.
    Dashboard,

    /// User management commands.
    #[command(subcommand)]
    User(UserCommand),

    /// Identity-provider settings.
    #[command(subcommand)]
    Idp(IdpCommand),

    /// CLI configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Console server status check.
    Status,
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users.
    List {
        /// Case-insensitive search over username, email and names.
        #[arg(long)]
        search: Option<String>,
    },

    /// Get user details.
    Get {
        /// User ID.
        id: String,
    },

    /// Create a new user.
    Create {
        /// Username.
        username: String,

        /// Email address.
        #[arg(long)]
        email: Option<String>,

        /// First name.
        #[arg(long)]
        first_name: Option<String>,

        /// Last name.
        #[arg(long)]
        last_name: Option<String>,

        /// Create the user disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// Update a user.
    Update {
        /// User ID.
        id: String,

        /// Username.
        #[arg(long)]
        username: Option<String>,

        /// Email address.
        #[arg(long)]
        email: Option<String>,

        /// First name.
        #[arg(long)]
        first_name: Option<String>,

        /// Last name.
        #[arg(long)]
        last_name: Option<String>,

        /// Enable/disable the user.
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Delete a user.
    Delete {
        /// User ID.
        id: String,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },
}

/// Identity-provider settings commands.
#[derive(Debug, Subcommand)]
pub enum IdpCommand {
    /// Show the active configuration (password masked).
    Show,

    /// Change configuration fields.
    Set {
        /// Identity-provider base URL.
        #[arg(long)]
        server_url: Option<String>,

        /// Realm name.
        #[arg(long)]
        realm: Option<String>,

        /// Client ID.
        #[arg(long)]
        client_id: Option<String>,

        /// Admin username.
        #[arg(long)]
        admin_username: Option<String>,

        /// Prompt for the admin password.
        #[arg(long)]
        admin_password: bool,
    },

    /// Configure the identity provider interactively.
    Init,

    /// Test connectivity to the identity provider.
    Test,
}

/// CLI configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },
}
