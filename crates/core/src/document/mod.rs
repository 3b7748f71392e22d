//! Document ledger.
//!
//! This module implements the DTE computations:
//! - Document types and status transitions
//! - Line pricing
//! - Totals recomputation with 13% IVA
//! - Error types for document operations

pub mod error;
pub mod lines;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::DocumentError;
pub use lines::{LineInput, PricedLine, price_lines};
pub use totals::{DocumentTotals, GROSS_FACTOR, IVA_RATE, iva_on, line_total, totals_for_update};
pub use types::{
    DEFAULT_PAYMENT_TERMS, DocumentStatus, DteType, PENDING_GENERATION_CODE,
    PENDING_RECEPTION_SEAL,
};
