//! Property-based tests for document totals.

use omnigest_shared::types::{MAX_STORED_AMOUNT, round_money};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::totals::{DocumentTotals, IVA_RATE, line_total};

/// Quantities from 0.01 to 1,000.00.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Prices from 0.00 to 10,000.00.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// subtotal == round(Σ line totals), iva == round(subtotal × 0.13), total == subtotal + iva.
    #[test]
    fn prop_totals_derive_from_lines(lines in proptest::collection::vec((quantity(), price()), 0..12)) {
        let line_totals: Vec<Decimal> = lines
            .iter()
            .map(|(q, p)| line_total(*q, *p).unwrap())
            .collect();
        let totals = DocumentTotals::from_line_totals(line_totals.iter().copied()).unwrap();

        let sum: Decimal = line_totals.iter().copied().sum();
        prop_assert_eq!(totals.subtotal, round_money(sum));
        prop_assert_eq!(totals.iva, round_money(totals.subtotal * IVA_RATE));
        prop_assert_eq!(totals.total, totals.subtotal + totals.iva);
    }

    /// Every computed amount has at most two decimals.
    #[test]
    fn prop_amounts_are_cent_precise(q in quantity(), p in price()) {
        let total = line_total(q, p).unwrap();
        let totals = DocumentTotals::from_subtotal(total).unwrap();
        prop_assert!(total.scale() <= 2);
        prop_assert!(totals.iva.scale() <= 2);
        prop_assert!(totals.total.scale() <= 2);
    }

    /// Splitting a gross amount yields consistent totals within two cents of the input.
    #[test]
    fn prop_split_gross_consistent(cents in 0i64..100_000_000i64) {
        let gross = Decimal::new(cents, 2);
        let totals = DocumentTotals::split_gross(gross).unwrap();
        prop_assert!(totals.is_consistent());
        prop_assert!((totals.total - gross).abs() <= Decimal::new(2, 2));
    }

    /// Arbitrary inputs never panic: they are priced or rejected.
    #[test]
    fn prop_line_total_never_panics(
        q in any::<i128>().prop_map(|n| Decimal::from_i128_with_scale(n % 10i128.pow(28), 2)),
        p in any::<i128>().prop_map(|n| Decimal::from_i128_with_scale(n % 10i128.pow(28), 0)),
    ) {
        if let Ok(total) = line_total(q, p) {
            prop_assert!(total <= MAX_STORED_AMOUNT);
        }
    }
}
