//! Supplier routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use omnigest_core::access::policy;
use omnigest_db::{SupplierRepository, entities::suppliers, repositories::SupplierInput};
use omnigest_shared::types::PageResponse;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::ListQuery;
use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the supplier router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/suppliers",
            get(list_suppliers).post(create_supplier),
        )
        .route(
            "/companies/{company_id}/suppliers/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

/// Request body for creating or replacing a supplier.
#[derive(Debug, Deserialize, Validate)]
pub struct SupplierRequest {
    /// Name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Tax id.
    #[validate(length(max = 17))]
    pub nit: Option<String>,
    /// Registry number.
    #[validate(length(max = 20))]
    pub nrc: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Phone.
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Legal representative.
    pub legal_representative: Option<String>,
}

impl From<SupplierRequest> for SupplierInput {
    fn from(r: SupplierRequest) -> Self {
        Self {
            name: r.name,
            nit: r.nit,
            nrc: r.nrc,
            address: r.address,
            phone: r.phone,
            email: r.email,
            legal_representative: r.legal_representative,
        }
    }
}

/// GET /companies/{company_id}/suppliers
async fn list_suppliers(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PageResponse<suppliers::Model>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let page = query.page_request(state.default_page_size);
    let (items, total) = SupplierRepository::new(state.conn())
        .list(company_id, query.search(), &page)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(PageResponse::new(items, &page, total)))
}

/// POST /companies/{company_id}/suppliers
async fn create_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<SupplierRequest>,
) -> ApiResult<(StatusCode, Json<suppliers::Model>)> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let supplier = SupplierRepository::new(state.conn())
        .create(company_id, payload.into())
        .await
        .map_err(ApiError::database)?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// GET /companies/{company_id}/suppliers/{id}
async fn get_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<suppliers::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    SupplierRepository::new(state.conn())
        .find(company_id, id)
        .await
        .map_err(ApiError::database)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Supplier"))
}

/// PUT /companies/{company_id}/suppliers/{id}
async fn update_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SupplierRequest>,
) -> ApiResult<Json<suppliers::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let supplier = SupplierRepository::new(state.conn())
        .update(company_id, id, payload.into())
        .await?;
    Ok(Json(supplier))
}

/// DELETE /companies/{company_id}/suppliers/{id}
async fn delete_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    SupplierRepository::new(state.conn()).delete(company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
