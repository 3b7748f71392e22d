//! Stock level and manual movement routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use omnigest_core::{access::policy, inventory::MovementDirection};
use omnigest_db::{InventoryRepository, entities::stock_movements};
use omnigest_shared::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the inventory router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/inventory", get(stock_levels))
        .route(
            "/companies/{company_id}/inventory/movements",
            post(record_movement),
        )
}

/// One row of the stock report.
#[derive(Debug, Serialize)]
pub struct StockLevel {
    /// Product id.
    pub product_id: Uuid,
    /// Product code.
    pub code: String,
    /// Description.
    pub description: String,
    /// Unit of measure.
    pub unit_of_measure: String,
    /// Units on hand.
    pub on_hand: i64,
}

/// Request body for a manual movement.
#[derive(Debug, Deserialize, Validate)]
pub struct MovementRequest {
    /// Product moved.
    pub product_id: Uuid,
    /// `Entrada` or `Salida`.
    pub direction: String,
    /// Units moved.
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Free-text reason.
    #[validate(length(min = 1, max = 255))]
    pub description: String,
}

/// GET /companies/{company_id}/inventory
async fn stock_levels(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<Vec<StockLevel>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let products = InventoryRepository::new(state.conn())
        .stock_levels(company_id)
        .await
        .map_err(ApiError::database)?;

    Ok(Json(
        products
            .into_iter()
            .map(|p| StockLevel {
                product_id: p.id,
                code: p.code,
                description: p.description,
                unit_of_measure: p.unit_of_measure,
                on_hand: p.on_hand,
            })
            .collect(),
    ))
}

/// POST /companies/{company_id}/inventory/movements
async fn record_movement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<MovementRequest>,
) -> ApiResult<(StatusCode, Json<stock_movements::Model>)> {
    require_company(&state, &user, policy::ANY, company_id).await?;
    payload.validate()?;

    let direction = MovementDirection::parse(&payload.direction).ok_or_else(|| {
        AppError::Validation(format!("Unknown movement direction: {}", payload.direction))
    })?;

    let movement = InventoryRepository::new(state.conn())
        .apply_movement(
            company_id,
            payload.product_id,
            direction,
            payload.quantity,
            payload.description.trim(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
