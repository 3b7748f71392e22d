//! Company (tenant) routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use omnigest_core::access::policy;
use omnigest_db::{
    CompanyRepository, entities::companies, repositories::CreateCompanyInput,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    access::{require, require_company},
    error::ApiResult,
    middleware::auth::AuthUser,
};

/// Creates the company router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", post(create_company))
        .route("/companies/{company_id}", get(get_company))
}

/// Request body for registering a company.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    /// Legal name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Tax id.
    #[validate(length(min = 1, max = 17))]
    pub nit: String,
    /// Registry number.
    #[validate(length(min = 1, max = 20))]
    pub nrc: String,
    /// Address.
    #[validate(length(min = 1))]
    pub address: String,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Economic activity.
    pub economic_activity: Option<String>,
    /// Legal representative.
    pub legal_representative: Option<String>,
}

/// POST /companies - Register a company.
async fn create_company(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<companies::Model>)> {
    require(&state, &user, policy::MANAGE_COMPANIES).await?;
    payload.validate()?;

    let company = CompanyRepository::new(state.conn())
        .create(CreateCompanyInput {
            name: payload.name,
            nit: payload.nit,
            nrc: payload.nrc,
            address: payload.address,
            phone: payload.phone,
            email: payload.email,
            economic_activity: payload.economic_activity,
            legal_representative: payload.legal_representative,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /companies/{company_id}
async fn get_company(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<companies::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    let company = CompanyRepository::new(state.conn()).get(company_id).await?;
    Ok(Json(company))
}
