//! Property-based tests for stock movements.

use proptest::prelude::*;

use super::{InventoryError, MovementDirection, apply_movement, replay};

fn movement() -> impl Strategy<Value = (MovementDirection, i64)> {
    (
        prop_oneof![Just(MovementDirection::Entrada), Just(MovementDirection::Salida)],
        1i64..500,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// When every outbound is accepted, on_hand == initial + Σ inbound − Σ outbound.
    #[test]
    fn prop_balance_is_sum_of_movements(
        initial in 0i64..10_000,
        movements in proptest::collection::vec(movement(), 0..30),
    ) {
        if let Ok(balance) = replay(initial, movements.iter().copied()) {
            let delta: i64 = movements
                .iter()
                .map(|(d, q)| match d {
                    MovementDirection::Entrada => *q,
                    MovementDirection::Salida => -*q,
                })
                .sum();
            prop_assert_eq!(balance, initial + delta);
        }
    }

    /// The balance never goes negative.
    #[test]
    fn prop_balance_never_negative(
        initial in 0i64..1_000,
        movements in proptest::collection::vec(movement(), 0..30),
    ) {
        let mut balance = initial;
        for (direction, quantity) in movements {
            match apply_movement(balance, direction, quantity) {
                Ok(next) => balance = next,
                Err(InventoryError::InsufficientStock { on_hand, requested }) => {
                    prop_assert_eq!(on_hand, balance);
                    prop_assert!(requested > on_hand);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
            prop_assert!(balance >= 0);
        }
    }
}
