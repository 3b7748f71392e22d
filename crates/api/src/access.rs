//! Access guard wiring.
//!
//! The profile is loaded from the database on every request, so role or
//! company changes apply without waiting for the token to expire.

use omnigest_core::{
    access::{DenyReason, Principal, authorize, authorize_company},
    auth::Role,
};
use omnigest_db::UserRepository;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};

/// Resolves the caller into a principal.
///
/// Unknown or deactivated users are treated as unauthenticated.
pub async fn load_principal(state: &AppState, user: &AuthUser) -> Result<Option<Principal>, ApiError> {
    let found = UserRepository::new(state.conn())
        .find_by_id(user.user_id())
        .await
        .map_err(ApiError::database)?;

    Ok(found.filter(|u| u.user.is_active).map(|u| match u.role() {
        Some(role) => Principal::with_profile(u.user.id, role, u.company_id()),
        None => Principal::without_profile(u.user.id),
    }))
}

/// Requires one of `roles`.
pub async fn require(state: &AppState, user: &AuthUser, roles: &[Role]) -> Result<Principal, ApiError> {
    let principal = load_principal(state, user).await?;
    authorize(principal.as_ref(), roles)
        .into_result()
        .map_err(ApiError::denied)?;
    principal.ok_or_else(|| ApiError::denied(DenyReason::Unauthenticated))
}

/// Requires one of `roles` and access to `company_id`.
pub async fn require_company(
    state: &AppState,
    user: &AuthUser,
    roles: &[Role],
    company_id: Uuid,
) -> Result<Principal, ApiError> {
    let principal = load_principal(state, user).await?;
    let decision = authorize_company(principal.as_ref(), roles, company_id);
    if let Err(reason) = decision.into_result() {
        tracing::info!(
            user_id = %user.user_id(),
            company_id = %company_id,
            ?reason,
            "Access denied"
        );
        return Err(ApiError::denied(reason));
    }
    principal.ok_or_else(|| ApiError::denied(DenyReason::Unauthenticated))
}
