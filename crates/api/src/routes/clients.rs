//! Client routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use omnigest_core::access::policy;
use omnigest_db::{ClientRepository, entities::clients, repositories::ClientInput};
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

/// Creates the client router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/clients",
            get(list_clients).post(create_client),
        )
        .route(
            "/companies/{company_id}/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// Request body for creating or replacing a client.
#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    /// Name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Personal id.
    #[validate(length(max = 10))]
    pub dui: Option<String>,
    /// Tax id.
    #[validate(length(max = 17))]
    pub nit: Option<String>,
    /// Registry number.
    #[validate(length(max = 20))]
    pub nrc: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Phone.
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl From<ClientRequest> for ClientInput {
    fn from(r: ClientRequest) -> Self {
        Self {
            name: r.name,
            dui: r.dui,
            nit: r.nit,
            nrc: r.nrc,
            address: r.address,
            email: r.email,
            phone: r.phone,
        }
    }
}

/// GET /companies/{company_id}/clients
async fn list_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PageResponse<clients::Model>>> {
    require_company(&state, &user, policy::MANAGE_CLIENTS, company_id).await?;

    let page = query.page_request(state.default_page_size);
    let (items, total) = ClientRepository::new(state.conn())
        .list(company_id, query.search(), &page)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(PageResponse::new(items, &page, total)))
}

/// POST /companies/{company_id}/clients
async fn create_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<clients::Model>)> {
    require_company(&state, &user, policy::MANAGE_CLIENTS, company_id).await?;
    payload.validate()?;

    let client = ClientRepository::new(state.conn())
        .create(company_id, payload.into())
        .await
        .map_err(ApiError::database)?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /companies/{company_id}/clients/{id}
async fn get_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<clients::Model>> {
    require_company(&state, &user, policy::MANAGE_CLIENTS, company_id).await?;

    ClientRepository::new(state.conn())
        .find(company_id, id)
        .await
        .map_err(ApiError::database)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client"))
}

/// PUT /companies/{company_id}/clients/{id}
async fn update_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ClientRequest>,
) -> ApiResult<Json<clients::Model>> {
    require_company(&state, &user, policy::EDIT_CLIENTS, company_id).await?;
    payload.validate()?;

    let client = ClientRepository::new(state.conn())
        .update(company_id, id, payload.into())
        .await?;
    Ok(Json(client))
}

/// DELETE /companies/{company_id}/clients/{id}
async fn delete_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_company(&state, &user, policy::DELETE_CLIENTS, company_id).await?;
    ClientRepository::new(state.conn()).delete(company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
