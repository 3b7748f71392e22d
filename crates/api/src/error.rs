//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use omnigest_core::access::{DenyReason, RedirectTarget};
use omnigest_shared::AppError;
use sea_orm::DbErr;
use serde::Serialize;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error returned from a handler.
///
/// Wraps [`AppError`] and, for access denials, where the client should go next.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    redirect: Option<RedirectTarget>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl ApiError {
    /// Returns the wrapped application error.
    #[must_use]
    pub const fn app_error(&self) -> &AppError {
        &self.error
    }

    /// Returns the redirect target, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<RedirectTarget> {
        self.redirect
    }

    /// Shorthand for a 404 on a missing resource.
    #[must_use]
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{what} not found")).into()
    }

    /// Wraps a bare database error from a repository read.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }

    /// A 401 that sends the client back to the sign-in page.
    #[must_use]
    pub fn login_required(message: impl Into<String>) -> Self {
        Self {
            error: AppError::Unauthorized(message.into()),
            redirect: Some(RedirectTarget::Login),
        }
    }

    /// Builds the response for a denied access check.
    #[must_use]
    pub fn denied(reason: DenyReason) -> Self {
        let message = reason.message().to_string();
        let error = if reason.is_authentication_failure() {
            AppError::Unauthorized(message)
        } else {
            AppError::Forbidden(message)
        };
        Self {
            error,
            redirect: Some(reason.redirect()),
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self {
            error: err.into(),
            redirect: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            tracing::error!(error = %self.error, "Request failed");
        }

        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.error.error_code(),
            message: self.error.public_message(),
            redirect: self.redirect.map(|r| r.as_str()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use omnigest_core::auth::Role;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_server_errors_hide_detail() {
        let response = ApiError::from(AppError::Database("relation \"x\" does not exist".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("redirect").is_none());
    }

    #[tokio::test]
    async fn test_role_denial_redirects_to_menu() {
        let response = ApiError::denied(DenyReason::RoleNotAllowed(Role::Empleado)).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["redirect"], "menu_principal");
        assert_eq!(body["message"], "No tiene permisos para acceder a esta sección.");
    }

    #[tokio::test]
    async fn test_missing_profile_is_unauthorized() {
        let response = ApiError::denied(DenyReason::MissingProfile).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["redirect"], "login");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = ApiError::from(AppError::Conflict("Username already taken: ana".into()));
        assert_eq!(err.app_error().public_message(), "Username already taken: ana");
        assert!(err.redirect().is_none());
    }
}
