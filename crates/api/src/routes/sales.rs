//! Point-of-sale route.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use omnigest_core::access::policy;
use omnigest_db::{
    SaleRepository,
    entities::{clients, document_lines, stock_movements},
    repositories::RegisterSaleInput,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::documents::DocumentResponse;
use crate::{AppState, access::require_company, error::ApiResult, middleware::auth::AuthUser};

/// Creates the sales router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/companies/{company_id}/sales", post(register_sale))
}

/// Request body for a sale.
#[derive(Debug, Deserialize, Validate)]
pub struct SaleRequest {
    /// Product sold.
    pub product_id: Uuid,
    /// Units sold.
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Customer; `Consumidor Final` when absent.
    pub client_id: Option<Uuid>,
}

/// Rows written by a sale.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    /// Invoice.
    pub document: DocumentResponse,
    /// Invoice line.
    pub line: document_lines::Model,
    /// Outbound movement.
    pub movement: stock_movements::Model,
    /// Customer.
    pub client: clients::Model,
}

/// POST /companies/{company_id}/sales
///
/// Issues an invoice for one product and takes the units out of stock.
async fn register_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleResponse>)> {
    require_company(&state, &user, policy::ISSUE_DOCUMENTS, company_id).await?;
    payload.validate()?;

    let outcome = SaleRepository::new(state.conn())
        .register(
            company_id,
            RegisterSaleInput {
                product_id: payload.product_id,
                quantity: payload.quantity,
                client_id: payload.client_id,
            },
        )
        .await?;

    let mut document = DocumentResponse::from(outcome.document);
    document.client_name = Some(outcome.client.name.clone());
    Ok((
        StatusCode::CREATED,
        Json(SaleResponse {
            document,
            line: outcome.line,
            movement: outcome.movement,
            client: outcome.client,
        }),
    ))
}
