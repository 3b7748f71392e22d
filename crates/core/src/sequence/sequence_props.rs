//! Property-based tests for product code generation.

use proptest::prelude::*;

use super::{format_product_code, next_product_code, parse_product_code};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// N sequential codes are distinct and strictly increasing.
    #[test]
    fn prop_sequential_codes_increase(start in 0u64..20_000, n in 1usize..50) {
        let mut last = if start == 0 { None } else { Some(format_product_code(start)) };
        let mut numbers = Vec::with_capacity(n);
        for _ in 0..n {
            let code = next_product_code(last.as_deref()).unwrap();
            numbers.push(parse_product_code(&code).unwrap());
            last = Some(code);
        }
        prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(numbers[0], start + 1);
    }

    /// Formatting then parsing returns the same number.
    #[test]
    fn prop_format_parse(n in 0u64..10_000_000) {
        prop_assert_eq!(parse_product_code(&format_product_code(n)).unwrap(), n);
    }
}
