//! User record handlers.
//!
//! Every handler requires a logged-in operator.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use guardian_core::EventType;
use guardian_model::{DashboardSummary, UserDraft, UserRecord};
use guardian_storage::UserSearchCriteria;

use crate::dto::UserListParams;
use crate::error::{ConsoleError, ConsoleResult};
use crate::events::user_event;
use crate::state::AppState;

/// GET /api/dashboard - Record counters.
pub async fn dashboard(State(state): State<AppState>) -> ConsoleResult<Json<DashboardSummary>> {
    state.require_authenticated().await?;
    Ok(Json(state.users.summary().await?))
}

/// GET /api/users - List users, optionally filtered by `search`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> ConsoleResult<Json<Vec<UserRecord>>> {
    state.require_authenticated().await?;

    let criteria = match params.search {
        Some(term) => UserSearchCriteria::new().search(term),
        None => UserSearchCriteria::new(),
    };
    Ok(Json(state.users.search(&criteria).await?))
}

/// POST /api/users - Create a user from a draft.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserDraft>, JsonRejection>,
) -> ConsoleResult<impl IntoResponse> {
    state.require_authenticated().await?;
    let Json(draft) = payload?;
    draft.validate()?;

    let user = draft.into_record(Utc::now());
    state.users.create(&user).await?;

    let idp = state.idp_config().await;
    state
        .record(user_event(EventType::UserCreated, idp.as_ref(), &user.id, &user.username))
        .await;

    Ok((
        StatusCode::CREATED,
        [("Location", format!("/api/users/{}", user.id))],
        Json(user),
    ))
}

/// GET /api/users/{id} - Get a single user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ConsoleResult<Json<UserRecord>> {
    state.require_authenticated().await?;

    let user = state
        .users
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ConsoleError::not_found("User", &id))?;
    Ok(Json(user))
}

/// PUT /api/users/{id} - Replace a user's fields from a draft.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserDraft>, JsonRejection>,
) -> ConsoleResult<Json<UserRecord>> {
    state.require_authenticated().await?;
    let Json(draft) = payload?;
    draft.validate()?;

    let existing = state
        .users
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ConsoleError::not_found("User", &id))?;

    let updated = draft.apply_to(&existing);
    state.users.update(&updated).await?;

    let idp = state.idp_config().await;
    state
        .record(user_event(EventType::UserUpdated, idp.as_ref(), &updated.id, &updated.username))
        .await;

    Ok(Json(updated))
}

/// DELETE /api/users/{id} - Delete a user.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ConsoleResult<StatusCode> {
    state.require_authenticated().await?;

    let removed = state.users.delete(&id).await?;

    let idp = state.idp_config().await;
    state
        .record(user_event(EventType::UserDeleted, idp.as_ref(), &removed.id, &removed.username))
        .await;

    Ok(StatusCode::NO_CONTENT)
}
