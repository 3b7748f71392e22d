//! Sales book, purchase book and sales report projections.

pub mod purchases;
pub mod sales;

pub use purchases::{PURCHASE_BOOK_HEADERS, PurchaseBookRow, write_purchase_book_csv};
pub use sales::{SaleEntry, SalesBookDay, SalesReport, SalesReportEntry, sales_book};

use chrono_tz::Tz;
use omnigest_shared::AppError;
use thiserror::Error;

/// Errors from book projections.
#[derive(Debug, Error)]
pub enum BooksError {
    /// The configured timezone is not a known IANA name.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// CSV serialization failed.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV writer failed.
    #[error("Failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BooksError> for AppError {
    fn from(err: BooksError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `BooksError::UnknownTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, BooksError> {
    name.parse::<Tz>()
        .map_err(|_| BooksError::UnknownTimezone(name.to_string()))
}
