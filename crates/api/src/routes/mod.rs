//! API route definitions.

use axum::{Router, middleware};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::ValidationError;

use crate::{AppState, middleware::auth::auth_middleware};
use omnigest_shared::types::{PageRequest, is_storable_amount};

pub mod auth;
pub mod clients;
pub mod companies;
pub mod documents;
pub mod email_jobs;
pub mod health;
pub mod inventory;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod suppliers;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(companies::routes())
        .merge(clients::routes())
        .merge(suppliers::routes())
        .merge(products::routes())
        .merge(inventory::routes())
        .merge(documents::routes())
        .merge(sales::routes())
        .merge(purchases::routes())
        .merge(reports::routes())
        .merge(email_jobs::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Rejects amounts a stored money column cannot hold: more than two
/// decimals, or beyond `9999999999.99`.
pub(crate) fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if is_storable_amount(*amount) {
        Ok(())
    } else {
        Err(ValidationError::new("amount")
            .with_message("must have at most two decimals and not exceed 9999999999.99".into()))
    }
}

/// Query string of paginated, searchable listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Page number, 1-indexed.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Free-text search.
    pub q: Option<String>,
}

impl ListQuery {
    /// Pagination part of the query, `default_per_page` when the caller sent none.
    #[must_use]
    pub fn page_request(&self, default_per_page: u32) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(default_per_page),
        }
    }

    /// Search term, if not blank.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&dec!(10.50)).is_ok());
        assert!(validate_amount(&dec!(9999999999.99)).is_ok());
        assert!(validate_amount(&dec!(10000000000)).is_err());
        assert!(validate_amount(&dec!(1.005)).is_err());
        assert!(validate_amount(&Decimal::MAX).is_err());
    }
}
