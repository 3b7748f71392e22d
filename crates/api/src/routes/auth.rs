//! Authentication routes for login, register, token refresh and admin checks.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use omnigest_core::auth::{Role, hash_password, verify_password};
use omnigest_db::{
    UserRepository,
    repositories::{CreateUserInput, UserWithProfile},
};
use omnigest_shared::{
    AppError,
    auth::{
        LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, TokenKind, TokenPair,
        UserInfo, ValidateAdminRequest, ValidateAdminResponse,
    },
};
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiResult, middleware::auth::AuthUser};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/validate-admin", post(validate_admin))
}

/// Routes that need an authenticated caller.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

pub(crate) fn user_info(found: &UserWithProfile) -> UserInfo {
    UserInfo {
        id: found.user.id,
        username: found.user.username.clone(),
        email: found.user.email.clone(),
        role: found.role().map(|r| r.as_str().to_string()).unwrap_or_default(),
        company_id: found.company_id(),
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Usuario o contraseña incorrectos".to_string())
}

/// Looks up a user and checks the password.
async fn authenticate(state: &AppState, username: &str, password: &str) -> ApiResult<UserWithProfile> {
    let found = UserRepository::new(state.conn())
        .find_by_username(username.trim())
        .await
        .map_err(crate::ApiError::database)?;

    let Some(found) = found else {
        info!(username = %username, "Login attempt for non-existent user");
        return Err(invalid_credentials().into());
    };
    if !found.user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".to_string()).into());
    }
    if !verify_password(password, &found.user.password_hash)? {
        info!(user_id = %found.user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials().into());
    }

    Ok(found)
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    payload.validate()?;
    let found = authenticate(&state, &payload.username, &payload.password).await?;

    let Some(role) = found.role() else {
        return Err(AppError::Unauthorized("El usuario no tiene perfil asignado.".to_string()).into());
    };

    let pair = state
        .jwt_service
        .generate_pair(found.user.id, found.company_id(), role.as_str())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %found.user.id, role = %role, "User logged in successfully");

    Ok(Json(LoginResponse {
        user: user_info(&found),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    }))
}

/// POST /auth/register - Register a new user with its profile.
///
/// Self-registration creates `Empleado` profiles; administrators assign
/// other roles through the user endpoints.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserInfo>)> {
    payload.validate()?;

    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(name) => Role::parse(name)
            .ok_or_else(|| AppError::Validation(format!("Unknown role: {name}")))?,
    };
    if role != Role::Empleado {
        return Err(AppError::Forbidden(
            "Only administrators can assign elevated roles".to_string(),
        )
        .into());
    }

    let password_hash = hash_password(&payload.password)?;
    let created = UserRepository::new(state.conn())
        .create(CreateUserInput {
            username: payload.username.trim().to_string(),
            password_hash,
            email: payload.email,
            role,
            company_id: payload.company_id,
        })
        .await?;

    info!(user_id = %created.user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user_info(&created))))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    // Role and company come from the current profile, not the old token.
    let found = UserRepository::new(state.conn())
        .find_by_id(claims.user_id())
        .await
        .map_err(crate::ApiError::database)?
        .filter(|u| u.user.is_active)
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
    let role = found
        .role()
        .ok_or_else(|| AppError::Unauthorized("El usuario no tiene perfil asignado.".to_string()))?;

    let pair = state
        .jwt_service
        .generate_pair(found.user.id, found.company_id(), role.as_str())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(pair))
}

/// POST /auth/validate-admin - Check that credentials belong to an administrator.
async fn validate_admin(
    State(state): State<AppState>,
    Json(payload): Json<ValidateAdminRequest>,
) -> ApiResult<Json<ValidateAdminResponse>> {
    payload.validate()?;
    let found = authenticate(&state, &payload.username, &payload.password).await?;

    match found.role() {
        Some(role) if role.is_admin() => Ok(Json(ValidateAdminResponse { valid: true })),
        Some(_) => Err(AppError::Forbidden("No tiene permisos de administrador".to_string()).into()),
        None => Err(AppError::Forbidden("El usuario no tiene perfil asignado.".to_string()).into()),
    }
}

/// GET /me - Current user and profile.
async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<UserInfo>> {
    let found = UserRepository::new(state.conn())
        .find_by_id(user.user_id())
        .await
        .map_err(crate::ApiError::database)?
        .ok_or_else(|| crate::ApiError::not_found("User"))?;
    Ok(Json(user_info(&found)))
}
