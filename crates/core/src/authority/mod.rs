//! Tax authority seam.
//!
//! Submission to the Ministry of Finance is simulated: the default
//! implementation assigns a generation code and reception seal locally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use omnigest_shared::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::document::DteType;

/// Errors reported by a tax authority.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The authority refused the document.
    #[error("Document rejected by the tax authority: {0}")]
    Rejected(String),

    /// The authority could not be reached.
    #[error("Tax authority unavailable: {0}")]
    Unavailable(String),
}

impl From<AuthorityError> for AppError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::Rejected(_) => Self::BusinessRule(err.to_string()),
            AuthorityError::Unavailable(_) => Self::ExternalService(err.to_string()),
        }
    }
}

/// Document data sent to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Issuer tax id.
    pub company_nit: String,
    /// DTE type.
    pub dte_type: DteType,
    /// Control number.
    pub control_number: String,
    /// Gross total.
    pub total: Decimal,
}

/// Codes assigned by the authority on acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    /// Generation code.
    pub generation_code: String,
    /// Reception seal.
    pub reception_seal: String,
    /// Acceptance instant.
    pub accepted_at: DateTime<Utc>,
}

/// A tax authority that accepts or rejects documents.
#[async_trait]
pub trait TaxAuthority: Send + Sync {
    /// Submits a document for approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is rejected or the authority is unreachable.
    async fn submit(&self, submission: &Submission) -> Result<Acceptance, AuthorityError>;
}

/// Local stand-in for the Ministry of Finance.
///
/// Accepts every document with a non-negative total.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTaxAuthority;

#[async_trait]
impl TaxAuthority for SimulatedTaxAuthority {
    async fn submit(&self, submission: &Submission) -> Result<Acceptance, AuthorityError> {
        if submission.total.is_sign_negative() && !submission.total.is_zero() {
            return Err(AuthorityError::Rejected(format!(
                "negative total on {}",
                submission.control_number
            )));
        }

        let accepted_at = Utc::now();
        Ok(Acceptance {
            generation_code: format!("MH-{}", Uuid::new_v4().simple().to_string().to_uppercase()),
            reception_seal: format!("SELLO-{}", accepted_at.timestamp()),
            accepted_at,
        })
    }
}
