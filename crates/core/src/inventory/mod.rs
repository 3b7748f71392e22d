//! Inventory ledger.
//!
//! Product balances are derived from stock movements. Outbound movements
//! larger than the current balance are rejected.

#[cfg(test)]
mod movement_props;

use omnigest_shared::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementDirection {
    /// Stock received.
    Entrada,
    /// Stock issued.
    Salida,
}

impl MovementDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "Entrada",
            Self::Salida => "Salida",
        }
    }

    /// Parses a direction name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entrada" => Some(Self::Entrada),
            "salida" => Some(Self::Salida),
            _ => None,
        }
    }
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when applying movements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Quantity must be a positive integer.
    #[error("Movement quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i64),

    /// Outbound quantity exceeds the balance.
    #[error("Insufficient stock: {on_hand} on hand, {requested} requested")]
    InsufficientStock {
        /// Balance before the movement.
        on_hand: i64,
        /// Requested outbound quantity.
        requested: i64,
    },

    /// Balance would overflow.
    #[error("Stock balance overflow")]
    Overflow,
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::Overflow => "STOCK_OVERFLOW",
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NonPositiveQuantity(_) => Self::Validation(err.to_string()),
            InventoryError::InsufficientStock { .. } | InventoryError::Overflow => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}

/// Validates a movement quantity.
///
/// # Errors
///
/// Returns `InventoryError::NonPositiveQuantity` for zero or negative values.
pub const fn validate_quantity(quantity: i64) -> Result<(), InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::NonPositiveQuantity(quantity));
    }
    Ok(())
}

/// Applies a movement to a balance and returns the new balance.
///
/// # Errors
///
/// Returns an error for non-positive quantities, for outbound movements above
/// the balance, and on overflow.
pub fn apply_movement(
    on_hand: i64,
    direction: MovementDirection,
    quantity: i64,
) -> Result<i64, InventoryError> {
    validate_quantity(quantity)?;
    match direction {
        MovementDirection::Entrada => on_hand
            .checked_add(quantity)
            .ok_or(InventoryError::Overflow),
        MovementDirection::Salida if quantity > on_hand => Err(InventoryError::InsufficientStock {
            on_hand,
            requested: quantity,
        }),
        MovementDirection::Salida => Ok(on_hand - quantity),
    }
}

/// Replays movements over an initial balance, stopping at the first rejection.
///
/// # Errors
///
/// Returns the first movement error.
pub fn replay<I>(initial: i64, movements: I) -> Result<i64, InventoryError>
where
    I: IntoIterator<Item = (MovementDirection, i64)>,
{
    movements
        .into_iter()
        .try_fold(initial, |balance, (direction, quantity)| {
            apply_movement(balance, direction, quantity)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_then_inbound() {
        let balance = replay(
            10,
            [(MovementDirection::Salida, 3), (MovementDirection::Entrada, 5)],
        )
        .unwrap();
        assert_eq!(balance, 12);
    }

    #[test]
    fn test_outbound_above_balance_rejected() {
        assert_eq!(
            apply_movement(2, MovementDirection::Salida, 3),
            Err(InventoryError::InsufficientStock {
                on_hand: 2,
                requested: 3
            })
        );
        assert_eq!(apply_movement(3, MovementDirection::Salida, 3), Ok(0));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert_eq!(
            apply_movement(5, MovementDirection::Entrada, 0),
            Err(InventoryError::NonPositiveQuantity(0))
        );
        assert_eq!(
            apply_movement(5, MovementDirection::Salida, -2),
            Err(InventoryError::NonPositiveQuantity(-2))
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            apply_movement(i64::MAX, MovementDirection::Entrada, 1),
            Err(InventoryError::Overflow)
        );
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(MovementDirection::parse("ENTRADA"), Some(MovementDirection::Entrada));
        assert_eq!(MovementDirection::parse("salida"), Some(MovementDirection::Salida));
        assert_eq!(MovementDirection::parse("ajuste"), None);
    }

    #[test]
    fn test_insufficient_stock_maps_to_business_rule() {
        let err = AppError::from(InventoryError::InsufficientStock {
            on_hand: 0,
            requested: 1,
        });
        assert_eq!(err.status_code(), 422);
    }
}
