//! Receipt email job status.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use omnigest_core::access::policy;
use omnigest_db::{EmailJobRepository, entities::email_jobs};
use uuid::Uuid;

use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the email job router.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/email-jobs/{job_id}",
        get(get_email_job),
    )
}

/// GET /companies/{company_id}/email-jobs/{job_id}
async fn get_email_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, job_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<email_jobs::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    EmailJobRepository::new(state.conn())
        .find(company_id, job_id)
        .await
        .map_err(ApiError::database)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Email job"))
}
