//! Purchase amounts.
//!
//! A purchase is entered as the gross amount paid for a quantity of units.
//! The amount is taxed as-is: IVA is added on top of it.

use omnigest_shared::{
    AppError,
    types::{MAX_STORED_AMOUNT, round_money},
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::document::iva_on;

/// Errors from purchase validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    /// Amount must be positive.
    #[error("Purchase amount must be greater than zero")]
    NonPositiveAmount,

    /// Quantity must be positive.
    #[error("Purchase quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Total does not fit a money column.
    #[error("Purchase amount out of range: {0}")]
    AmountOutOfRange(Decimal),
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Amounts recorded for a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseAmounts {
    /// `round(amount / quantity, 2)`.
    pub unit_price: Decimal,
    /// Taxed purchases, the amount entered.
    pub taxed_amount: Decimal,
    /// `round(amount × 0.13, 2)`.
    pub iva: Decimal,
    /// `taxed_amount + iva`.
    pub total: Decimal,
}

impl PurchaseAmounts {
    /// Computes the amounts for `amount` paid for `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not positive, or if the total
    /// would exceed [`MAX_STORED_AMOUNT`].
    pub fn compute(amount: Decimal, quantity: i64) -> Result<Self, PurchaseError> {
        if amount <= Decimal::ZERO {
            return Err(PurchaseError::NonPositiveAmount);
        }
        if quantity <= 0 {
            return Err(PurchaseError::NonPositiveQuantity);
        }

        if amount > MAX_STORED_AMOUNT {
            return Err(PurchaseError::AmountOutOfRange(amount));
        }

        let taxed_amount = round_money(amount);
        let iva = iva_on(taxed_amount);
        let total = taxed_amount + iva;
        if total > MAX_STORED_AMOUNT {
            return Err(PurchaseError::AmountOutOfRange(amount));
        }
        Ok(Self {
            unit_price: round_money(taxed_amount / Decimal::from(quantity)),
            taxed_amount,
            iva,
            total,
        })
    }
}
