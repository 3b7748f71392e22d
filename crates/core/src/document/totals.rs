//! Document totals: line amounts, IVA and gross splits.
//!
//! All amounts are quantized to cents with banker's rounding before they are
//! combined, so `subtotal + iva == total` holds exactly.

use omnigest_shared::types::{MAX_STORED_AMOUNT, is_cent_precise, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DocumentError;

/// Value-added tax rate (13%).
pub const IVA_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Gross multiplier, `1 + IVA_RATE`.
pub const GROSS_FACTOR: Decimal = Decimal::from_parts(113, 0, 0, false, 2);

/// Checks that a line input is cent-precise and fits a money column.
fn storable(value: Decimal) -> Result<Decimal, DocumentError> {
    if !is_cent_precise(value) {
        return Err(DocumentError::TooPrecise(value));
    }
    if value.abs() > MAX_STORED_AMOUNT {
        return Err(DocumentError::AmountOutOfRange(value));
    }
    Ok(value)
}

/// Rejects amounts a money column cannot hold.
fn bounded(amount: Decimal) -> Result<Decimal, DocumentError> {
    if amount.abs() > MAX_STORED_AMOUNT {
        return Err(DocumentError::AmountOverflow);
    }
    Ok(amount)
}

/// Computes a line total as `round(quantity × unit_price, 2)`.
///
/// Quantity and price must be cent-precise and the product must fit a
/// stored amount.
///
/// # Errors
///
/// Returns an error for non-positive quantities, negative prices, inputs
/// with more than two decimals, or totals out of range.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, DocumentError> {
    if quantity <= Decimal::ZERO {
        return Err(DocumentError::NonPositiveQuantity(quantity));
    }
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(DocumentError::NegativePrice(unit_price));
    }
    let product = storable(quantity)?
        .checked_mul(storable(unit_price)?)
        .ok_or(DocumentError::AmountOverflow)?;
    bounded(round_money(product))
}

/// Computes IVA on a taxed amount, quantized to cents.
#[must_use]
pub fn iva_on(amount: Decimal) -> Decimal {
    round_money(amount * IVA_RATE)
}

/// Subtotal, tax and total of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line totals (taxed sales).
    pub subtotal: Decimal,
    /// IVA on the subtotal.
    pub iva: Decimal,
    /// `subtotal + iva`.
    pub total: Decimal,
}

impl DocumentTotals {
    /// All-zero totals.
    #[must_use]
    pub fn zero() -> Self {
        let zero = round_money(Decimal::ZERO);
        Self {
            subtotal: zero,
            iva: zero,
            total: zero,
        }
    }

    /// Derives IVA and total from a subtotal.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AmountOverflow` when the total does not fit a
    /// stored amount.
    pub fn from_subtotal(subtotal: Decimal) -> Result<Self, DocumentError> {
        let subtotal = bounded(round_money(subtotal))?;
        let iva = iva_on(subtotal);
        Ok(Self {
            subtotal,
            iva,
            total: bounded(subtotal + iva)?,
        })
    }

    /// Recomputes totals from the line totals of a document.
    ///
    /// Zero lines yield zero totals.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AmountOverflow` when the sum does not fit a
    /// stored amount.
    pub fn from_line_totals<I>(line_totals: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let subtotal = line_totals
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or(DocumentError::AmountOverflow)?;
        Self::from_subtotal(subtotal)
    }

    /// Splits a gross total into subtotal and IVA.
    ///
    /// `subtotal = round(gross / 1.13, 2)`; the resulting total is recomputed
    /// from the subtotal and may differ from `gross` by a cent.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NegativeTotal` for negative input and
    /// `DocumentError::AmountOutOfRange` for a gross total too large to store.
    pub fn split_gross(gross: Decimal) -> Result<Self, DocumentError> {
        if gross.is_sign_negative() && !gross.is_zero() {
            return Err(DocumentError::NegativeTotal(gross));
        }
        if gross > MAX_STORED_AMOUNT {
            return Err(DocumentError::AmountOutOfRange(gross));
        }
        Self::from_subtotal(round_money(gross) / GROSS_FACTOR)
    }

    /// Returns true if `subtotal + iva == total`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.subtotal + self.iva == self.total
    }
}

/// Resolves the totals of a document after an update.
///
/// When the document has lines the totals derive from them and any supplied
/// gross total is ignored. Otherwise the requested gross total (or the current
/// one) is split by the IVA factor.
///
/// # Errors
///
/// Returns `DocumentError::NegativeTotal` for a negative gross total, or an
/// amount error when the totals do not fit a stored amount.
pub fn totals_for_update(
    line_totals: &[Decimal],
    requested_total: Option<Decimal>,
    current_total: Decimal,
) -> Result<DocumentTotals, DocumentError> {
    if line_totals.is_empty() {
        DocumentTotals::split_gross(requested_total.unwrap_or(current_total))
    } else {
        DocumentTotals::from_line_totals(line_totals.iter().copied())
    }
}
