//! Product catalogue routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use omnigest_core::access::policy;
use omnigest_db::{
    InventoryRepository, ProductRepository,
    entities::{products, stock_movements},
    repositories::{CreateProductInput, UpdateProductInput},
};
use omnigest_shared::types::PageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{ListQuery, validate_amount};
use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the product router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/products",
            get(list_products).post(create_product),
        )
        .route(
            "/companies/{company_id}/products/next-code",
            get(next_code),
        )
        .route(
            "/companies/{company_id}/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/companies/{company_id}/products/{id}/movements",
            get(list_movements),
        )
}

/// Request body for creating a product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Explicit code; generated when absent.
    #[validate(length(max = 50))]
    pub code: Option<String>,
    /// Description.
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    /// Unit of measure, defaults to `Unidad`.
    #[validate(length(min = 1, max = 50))]
    pub unit_of_measure: Option<String>,
    /// Price per unit.
    #[validate(custom(function = "validate_amount"))]
    pub unit_price: Decimal,
    /// Opening stock.
    #[validate(range(min = 0))]
    #[serde(default)]
    pub initial_stock: i64,
}

/// Request body for editing a product.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// New description.
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    /// New unit of measure.
    #[validate(length(min = 1, max = 50))]
    pub unit_of_measure: Option<String>,
    /// New price.
    #[validate(custom(function = "validate_amount"))]
    pub unit_price: Option<Decimal>,
}

/// Response of the next-code endpoint.
#[derive(Debug, Serialize)]
pub struct NextCodeResponse {
    /// Code the next generated product would get.
    pub code: String,
}

/// GET /companies/{company_id}/products
async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PageResponse<products::Model>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let page = query.page_request(state.default_page_size);
    let (items, total) = ProductRepository::new(state.conn())
        .list(company_id, query.search(), &page)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(PageResponse::new(items, &page, total)))
}

/// POST /companies/{company_id}/products
async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<products::Model>)> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let product = ProductRepository::new(state.conn())
        .create(
            company_id,
            CreateProductInput {
                code: payload.code,
                description: payload.description,
                unit_of_measure: payload.unit_of_measure,
                unit_price: payload.unit_price,
                initial_stock: payload.initial_stock,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /companies/{company_id}/products/next-code
async fn next_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<NextCodeResponse>> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    let code = ProductRepository::new(state.conn()).next_code(company_id).await?;
    Ok(Json(NextCodeResponse { code }))
}

/// GET /companies/{company_id}/products/{id}
async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<products::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    ProductRepository::new(state.conn())
        .find(company_id, id)
        .await
        .map_err(ApiError::database)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product"))
}

/// PUT /companies/{company_id}/products/{id}
async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<Json<products::Model>> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let product = ProductRepository::new(state.conn())
        .update(
            company_id,
            id,
            UpdateProductInput {
                description: payload.description,
                unit_of_measure: payload.unit_of_measure,
                unit_price: payload.unit_price,
            },
        )
        .await?;
    Ok(Json(product))
}

/// DELETE /companies/{company_id}/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    ProductRepository::new(state.conn()).delete(company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /companies/{company_id}/products/{id}/movements
async fn list_movements(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<stock_movements::Model>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    let movements = InventoryRepository::new(state.conn())
        .list_movements(company_id, id)
        .await?;
    Ok(Json(movements))
}
