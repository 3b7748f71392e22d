//! Document ledger error types.

use omnigest_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while computing or mutating documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Line quantity must be positive.
    #[error("Line quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Quantity or price has more than two decimals.
    #[error("Amounts allow at most two decimals, got {0}")]
    TooPrecise(Decimal),

    /// Quantity or price is larger than a stored amount allows.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(Decimal),

    /// A line or document total exceeds the largest stored amount.
    #[error("Document amount exceeds the maximum allowed")]
    AmountOverflow,

    /// Gross total cannot be negative.
    #[error("Document total cannot be negative, got {0}")]
    NegativeTotal(Decimal),

    /// Unknown DTE type code.
    #[error("Unknown DTE type: {0}")]
    UnknownType(String),

    /// Unknown document status.
    #[error("Unknown document status: {0}")]
    UnknownStatus(String),

    /// Voided documents cannot be modified.
    #[error("Cannot modify a voided document")]
    Voided,

    /// The document is already voided.
    #[error("Document is already voided")]
    AlreadyVoided,

    /// A document needs at least one line to be issued.
    #[error("A document needs at least one line")]
    NoLines,
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativePrice(_) => "NEGATIVE_PRICE",
            Self::TooPrecise(_) => "AMOUNT_TOO_PRECISE",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::NegativeTotal(_) => "NEGATIVE_TOTAL",
            Self::UnknownType(_) => "UNKNOWN_DTE_TYPE",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::Voided => "DOCUMENT_VOIDED",
            Self::AlreadyVoided => "ALREADY_VOIDED",
            Self::NoLines => "NO_LINES",
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NonPositiveQuantity(_)
            | DocumentError::NegativePrice(_)
            | DocumentError::TooPrecise(_)
            | DocumentError::AmountOutOfRange(_)
            | DocumentError::AmountOverflow
            | DocumentError::NegativeTotal(_)
            | DocumentError::UnknownType(_)
            | DocumentError::UnknownStatus(_)
            | DocumentError::NoLines => Self::Validation(err.to_string()),
            DocumentError::Voided | DocumentError::AlreadyVoided => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
