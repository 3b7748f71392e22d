//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of token carried in the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Company the profile belongs to, if any.
    pub company: Option<Uuid>,
    /// Profile role name.
    pub role: String,
    /// Token kind.
    pub typ: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        company_id: Option<Uuid>,
        role: &str,
        typ: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            company: company_id,
            role: role.to_string(),
            typ,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the company ID from claims.
    #[must_use]
    pub const fn company_id(&self) -> Option<Uuid> {
        self.company
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: u64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    /// Password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Role name; defaults to `Empleado`.
    pub role: Option<String>,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: u64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Contact email.
    pub email: Option<String>,
    /// Profile role.
    pub role: String,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Admin credential check request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidateAdminRequest {
    /// Username.
    #[validate(length(min = 1))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Admin credential check response.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateAdminResponse {
    /// Whether the credentials belong to an administrator.
    pub valid: bool,
}

/// User update request (administrators only).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username.
    #[validate(length(min = 3, max = 150))]
    pub username: Option<String>,
    /// New email.
    #[validate(email)]
    pub email: Option<String>,
    /// New role name.
    pub role: Option<String>,
}
