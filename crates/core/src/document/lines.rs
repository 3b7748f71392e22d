//! Priced document lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DocumentError;
use super::totals::{DocumentTotals, line_total};

/// A line as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Product sold on the line.
    pub product_id: Uuid,
    /// Quantity, may be fractional.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
}

/// A validated line with its computed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    /// Product sold on the line.
    pub product_id: Uuid,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `round(quantity × unit_price, 2)`.
    pub total: Decimal,
}

impl PricedLine {
    /// Validates and prices a single line.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive quantities, negative prices, or
    /// amounts with more than two decimals or out of range.
    pub fn price(input: LineInput) -> Result<Self, DocumentError> {
        Ok(Self {
            product_id: input.product_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total: line_total(input.quantity, input.unit_price)?,
        })
    }
}

/// Prices every line and returns them with the resulting document totals.
///
/// # Errors
///
/// Returns `DocumentError::NoLines` for an empty input, or the first line error.
pub fn price_lines(inputs: &[LineInput]) -> Result<(Vec<PricedLine>, DocumentTotals), DocumentError> {
    if inputs.is_empty() {
        return Err(DocumentError::NoLines);
    }
    let lines = inputs
        .iter()
        .copied()
        .map(PricedLine::price)
        .collect::<Result<Vec<_>, _>>()?;
    let totals = DocumentTotals::from_line_totals(lines.iter().map(|l| l.total))?;
    Ok((lines, totals))
}
