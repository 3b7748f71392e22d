//! Purchase book routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use omnigest_core::{access::policy, books::write_purchase_book_csv};
use omnigest_db::{
    PurchaseRepository, entities::purchase_records, repositories::RegisterPurchaseInput,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{ListQuery, validate_amount};
use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the purchase router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/purchases",
            get(list_purchases).post(register_purchase),
        )
        .route(
            "/companies/{company_id}/purchases/export",
            get(export_purchases),
        )
}

/// Request body for a purchase.
#[derive(Debug, Deserialize, Validate)]
pub struct PurchaseRequest {
    /// Supplier.
    pub supplier_id: Uuid,
    /// Product received.
    pub product_id: Uuid,
    /// Units received.
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Amount paid before IVA.
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
}

/// GET /companies/{company_id}/purchases
async fn list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<purchase_records::Model>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let rows = PurchaseRepository::new(state.conn())
        .list(company_id, query.search(), Some(state.recent_limit))
        .await
        .map_err(ApiError::database)?;
    Ok(Json(rows))
}

/// POST /companies/{company_id}/purchases
async fn register_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<PurchaseRequest>,
) -> ApiResult<(StatusCode, Json<purchase_records::Model>)> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let record = PurchaseRepository::new(state.conn())
        .register(
            company_id,
            RegisterPurchaseInput {
                supplier_id: payload.supplier_id,
                product_id: payload.product_id,
                quantity: payload.quantity,
                amount: payload.amount,
                voucher_date: Utc::now().with_timezone(&state.timezone).date_naive(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /companies/{company_id}/purchases/export
///
/// The whole purchase book as CSV.
async fn export_purchases(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let rows = PurchaseRepository::new(state.conn())
        .book_rows(company_id)
        .await
        .map_err(ApiError::database)?;

    let mut body = Vec::new();
    write_purchase_book_csv(&rows, state.timezone, &mut body)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"libro_compras.csv\"",
            ),
        ],
        body,
    ))
}
