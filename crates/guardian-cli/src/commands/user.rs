//! User management commands.

use guardian_model::{UserDraft, UserRecord};
use tabled::Tabled;

use crate::cli::UserCommand;
use crate::config::OutputFormat;
use crate::output::{confirm, error, output, output_single, success};
use crate::CliConfig;

use super::ApiClient;

/// User row for table display.
#[derive(Debug, Clone, Tabled)]
pub struct UserRow {
    /// User ID.
    #[tabled(rename = "ID")]
    pub id: String,
    /// Username.
    #[tabled(rename = "Username")]
    pub username: String,
    /// Full name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// Email address.
    #[tabled(rename = "Email")]
    pub email: String,
    /// Active/Inactive.
    #[tabled(rename = "Status")]
    pub status: String,
    /// Creation time.
    #[tabled(rename = "Created")]
    pub created: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.full_name(),
            email: user.email.clone(),
            status: user.status_label().to_string(),
            created: user.created_display(),
        }
    }
}

/// Runs a user command.
pub async fn run_user(
    cmd: UserCommand,
    config: &CliConfig,
    server: Option<&str>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let client = ApiClient::new(config, server)?;

    match cmd {
        UserCommand::List { search } => list_users(&client, search.as_deref(), output_format).await,
        UserCommand::Get { id } => get_user(&client, &id, output_format).await,
        UserCommand::Create {
            username,
            email,
            first_name,
            last_name,
            disabled,
        } => {
            let draft = UserDraft {
                username,
                email: email.unwrap_or_default(),
                first_name: first_name.unwrap_or_default(),
                last_name: last_name.unwrap_or_default(),
                enabled: !disabled,
            };
            create_user(&client, &draft, output_format).await
        }
        UserCommand::Update {
            id,
            username,
            email,
            first_name,
            last_name,
            enabled,
        } => {
            let changes = DraftChanges {
                username,
                email,
                first_name,
                last_name,
                enabled,
            };
            update_user(&client, &id, changes, output_format).await
        }
        UserCommand::Delete { id, force } => delete_user(&client, &id, force).await,
    }
}

/// Lists users.
async fn list_users(
    client: &ApiClient,
    search: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let path = match search {
        Some(term) => format!("/api/users?search={}", urlencoding::encode(term)),
        None => "/api/users".to_string(),
    };
    let users: Vec<UserRecord> = client.get(&path).await?;
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();

    if format == OutputFormat::Quiet {
        for user in &users {
            println!("{}", user.id);
        }
        return Ok(());
    }
    output(&rows, &users, "No users found.", format)
}

/// Gets a user by ID.
async fn get_user(client: &ApiClient, id: &str, format: OutputFormat) -> crate::CliResult<()> {
    let user: UserRecord = client
        .get(&format!("/api/users/{}", urlencoding::encode(id)))
        .await?;
    output_single(&user, format)
}

/// Creates a new user.
async fn create_user(
    client: &ApiClient,
    draft: &UserDraft,
    format: OutputFormat,
) -> crate::CliResult<()> {
    draft
        .validate()
        .map_err(|e| crate::CliError::Validation(e.to_string()))?;

    let user: UserRecord = client.post("/api/users", draft).await?;

    match format {
        OutputFormat::Quiet => println!("{}", user.id),
        OutputFormat::Json => output_single(&user, format)?,
        _ => success(&format!("User '{}' created with ID {}", user.username, user.id)),
    }
    Ok(())
}

/// Field changes requested on the command line.
#[derive(Debug, Default)]
struct DraftChanges {
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    enabled: Option<bool>,
}

impl DraftChanges {
    /// Applies the requested changes onto the draft of the current record.
    fn apply(self, mut draft: UserDraft) -> UserDraft {
        if let Some(username) = self.username {
            draft.username = username;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(first_name) = self.first_name {
            draft.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            draft.last_name = last_name;
        }
        if let Some(enabled) = self.enabled {
            draft.enabled = enabled;
        }
        draft
    }
}

/// Updates a user.
async fn update_user(
    client: &ApiClient,
    id: &str,
    changes: DraftChanges,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let path = format!("/api/users/{}", urlencoding::encode(id));

    // Start from the current record so unspecified fields are kept
    let current: UserRecord = client.get(&path).await?;
    let draft = changes.apply(UserDraft::from_record(&current));
    draft
        .validate()
        .map_err(|e| crate::CliError::Validation(e.to_string()))?;

    let updated: UserRecord = client.put(&path, &draft).await?;

    match format {
        OutputFormat::Quiet => {}
        OutputFormat::Json => output_single(&updated, format)?,
        _ => success(&format!("User '{}' updated successfully", updated.username)),
    }
    Ok(())
}

/// Deletes a user.
async fn delete_user(client: &ApiClient, id: &str, force: bool) -> crate::CliResult<()> {
    if !force && !confirm(&format!("Are you sure you want to delete user '{id}'?"))? {
        error("Operation cancelled");
        return Ok(());
    }

    client
        .delete(&format!("/api/users/{}", urlencoding::encode(id)))
        .await?;
    success(&format!("User '{id}' deleted successfully"));
    Ok(())
}
