//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - JWT authentication middleware
//! - The access guard evaluated at the start of each handler
//! - The receipt email dispatch worker

pub mod access;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod worker;

use axum::Router;
use chrono_tz::Tz;
use omnigest_core::authority::TaxAuthority;
use omnigest_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use worker::{EmailQueue, EmailWorker};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Tax authority documents are submitted to.
    pub authority: Arc<dyn TaxAuthority>,
    /// Receipt email queue.
    pub email_queue: EmailQueue,
    /// Timezone for local dates.
    pub timezone: Tz,
    /// Rows returned by the "recent" listings.
    pub recent_limit: u64,
    /// Page size used when a listing request sends none.
    pub default_page_size: u32,
}

impl AppState {
    /// Returns an owned handle to the database pool for repositories.
    #[must_use]
    pub fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
