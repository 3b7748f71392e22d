//! User administration routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use omnigest_core::{access::policy, auth::Role};
use omnigest_db::{UserRepository, repositories::UpdateUserInput};
use omnigest_shared::{
    AppError,
    auth::{UpdateUserRequest, UserInfo},
};
use uuid::Uuid;
use validator::Validate;

use super::auth::user_info;
use crate::{
    AppState,
    access::require,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the user router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", put(update_user).delete(delete_user))
}

/// GET /users - Most recently created users.
async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<UserInfo>>> {
    require(&state, &user, policy::MANAGE_USERS).await?;

    let users = UserRepository::new(state.conn())
        .list_recent(state.recent_limit)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(users.iter().map(user_info).collect()))
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserInfo>> {
    require(&state, &user, policy::MANAGE_USERS).await?;
    payload.validate()?;

    let role = payload
        .role
        .as_deref()
        .map(|name| {
            Role::parse(name).ok_or_else(|| AppError::Validation(format!("Unknown role: {name}")))
        })
        .transpose()?;

    let updated = UserRepository::new(state.conn())
        .update(
            id,
            UpdateUserInput {
                username: payload.username.map(|u| u.trim().to_string()),
                email: payload.email,
                role,
            },
        )
        .await?;

    tracing::info!(user_id = %id, by = %user.user_id(), "User updated");
    Ok(Json(user_info(&updated)))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require(&state, &user, policy::MANAGE_USERS).await?;
    if id == user.user_id() {
        return Err(AppError::BusinessRule("Cannot delete your own account".to_string()).into());
    }

    UserRepository::new(state.conn()).delete(id).await?;
    tracing::info!(user_id = %id, by = %user.user_id(), "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
