//! Sales report and sales book routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use omnigest_core::{
    access::policy,
    books::{SalesBookDay, SalesReport},
};
use omnigest_db::BooksRepository;
use uuid::Uuid;

use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the report router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/reports/sales", get(sales_report))
        .route(
            "/companies/{company_id}/reports/sales-book",
            get(sales_book),
        )
}

/// GET /companies/{company_id}/reports/sales
///
/// Most recent active documents and their summed total.
async fn sales_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<SalesReport>> {
    require_company(&state, &user, policy::SALES_REPORT, company_id).await?;

    let report = BooksRepository::new(state.conn())
        .sales_report(company_id, state.recent_limit)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(report))
}

/// GET /companies/{company_id}/reports/sales-book
async fn sales_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SalesBookDay>>> {
    require_company(&state, &user, policy::ANY, company_id).await?;

    let limit = usize::try_from(state.recent_limit).unwrap_or(usize::MAX);
    let days = BooksRepository::new(state.conn())
        .sales_book(company_id, state.timezone, limit)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(days))
}
