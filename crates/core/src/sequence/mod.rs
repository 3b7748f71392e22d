//! Sequence generator for product codes, control numbers, purchase vouchers
//! and registry numbers.
//!
//! Generated values are only candidates: uniqueness is enforced by database
//! constraints, and callers regenerate up to [`MAX_GENERATION_ATTEMPTS`]
//! times on a unique violation.

#[cfg(test)]
mod sequence_props;

use chrono::NaiveDate;
use omnigest_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::document::DteType;

/// Prefix of generated product codes.
pub const PRODUCT_CODE_PREFIX: &str = "PRD";

/// Minimum digit width of product codes.
pub const PRODUCT_CODE_WIDTH: usize = 4;

/// How many times a generated value is retried after a unique violation.
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Errors from sequence formatting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// The code does not follow the `PRD` + digits pattern.
    #[error("Code '{0}' does not follow the PRD#### pattern")]
    NonConforming(String),

    /// The numeric part cannot be incremented.
    #[error("Sequence exhausted")]
    Exhausted,
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::NonConforming(_) => Self::Validation(err.to_string()),
            SequenceError::Exhausted => Self::Conflict(err.to_string()),
        }
    }
}

/// Formats a product code, e.g. `PRD0042`. Numbers above 9999 widen.
#[must_use]
pub fn format_product_code(number: u64) -> String {
    format!("{PRODUCT_CODE_PREFIX}{number:04}")
}

/// Parses the numeric suffix of a generated product code.
///
/// # Errors
///
/// Returns `SequenceError::NonConforming` unless the code is `PRD` followed by
/// at least four ASCII digits.
pub fn parse_product_code(code: &str) -> Result<u64, SequenceError> {
    let non_conforming = || SequenceError::NonConforming(code.to_string());
    let digits = code.strip_prefix(PRODUCT_CODE_PREFIX).ok_or_else(non_conforming)?;
    if digits.len() < PRODUCT_CODE_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_conforming());
    }
    digits.parse().map_err(|_| non_conforming())
}

/// Returns the code following `last`, or `PRD0001` when there is none.
///
/// # Errors
///
/// Returns `SequenceError::NonConforming` when `last` is not a generated code.
pub fn next_product_code(last: Option<&str>) -> Result<String, SequenceError> {
    let next = match last {
        None => 1,
        Some(code) => parse_product_code(code)?
            .checked_add(1)
            .ok_or(SequenceError::Exhausted)?,
    };
    Ok(format_product_code(next))
}

/// Returns the code following the highest conforming code among `codes`.
///
/// Codes that do not follow the pattern are ignored; they cannot collide with
/// generated ones.
///
/// # Errors
///
/// Returns `SequenceError::Exhausted` if the highest number cannot be incremented.
pub fn next_product_code_from<'a, I>(codes: I) -> Result<String, SequenceError>
where
    I: IntoIterator<Item = &'a str>,
{
    let max = codes
        .into_iter()
        .filter_map(|code| parse_product_code(code).ok())
        .max();
    let next = match max {
        None => 1,
        Some(n) => n.checked_add(1).ok_or(SequenceError::Exhausted)?,
    };
    Ok(format_product_code(next))
}

/// Formats a purchase voucher number, e.g. `COMP-20251113-0001`.
#[must_use]
pub fn purchase_voucher(date: NaiveDate, sequence: i64) -> String {
    format!("COMP-{}-{sequence:04}", date.format("%Y%m%d"))
}

/// Formats a purchase registry number, e.g. `REG-00001`.
#[must_use]
pub fn registry_number(sequence: i64) -> String {
    format!("REG-{sequence:05}")
}

/// Formats a control number from a type and a random identifier.
#[must_use]
pub fn control_number_from(dte_type: DteType, id: Uuid) -> String {
    let hex = id.simple().to_string();
    format!("DTE-{}-{}", dte_type.code(), hex[..8].to_uppercase())
}

/// Generates a fresh control number, e.g. `DTE-01-9F3A2B7C`.
#[must_use]
pub fn generate_control_number(dte_type: DteType) -> String {
    control_number_from(dte_type, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "PRD0001")]
    #[case(Some("PRD0001"), "PRD0002")]
    #[case(Some("PRD0099"), "PRD0100")]
    #[case(Some("PRD9999"), "PRD10000")]
    #[case(Some("PRD10000"), "PRD10001")]
    fn test_next_product_code(#[case] last: Option<&str>, #[case] expected: &str) {
        assert_eq!(next_product_code(last).unwrap(), expected);
    }

    #[rstest]
    #[case("ABC123")]
    #[case("PRD")]
    #[case("PRD12")]
    #[case("PRD00A1")]
    #[case("prd0001")]
    #[case("PRD-001")]
    fn test_non_conforming_rejected(#[case] code: &str) {
        assert_eq!(
            next_product_code(Some(code)),
            Err(SequenceError::NonConforming(code.to_string()))
        );
    }

    #[test]
    fn test_scan_ignores_non_conforming() {
        let codes = ["PRD0007", "CUSTOM-1", "PRD0012", "PRDXYZ"];
        assert_eq!(next_product_code_from(codes).unwrap(), "PRD0013");
        assert_eq!(next_product_code_from(["LEGACY"]).unwrap(), "PRD0001");
        assert_eq!(next_product_code_from(std::iter::empty()).unwrap(), "PRD0001");
    }

    #[test]
    fn test_scan_compares_numerically() {
        // Lexicographic max would be PRD9999.
        assert_eq!(
            next_product_code_from(["PRD9999", "PRD10000"]).unwrap(),
            "PRD10001"
        );
    }

    #[test]
    fn test_purchase_numbers() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 13).unwrap();
        assert_eq!(purchase_voucher(date, 1), "COMP-20251113-0001");
        assert_eq!(purchase_voucher(date, 12345), "COMP-20251113-12345");
        assert_eq!(registry_number(1), "REG-00001");
    }

    #[test]
    fn test_control_number_format() {
        let id = Uuid::parse_str("9f3a2b7c-0000-4000-8000-000000000000").unwrap();
        assert_eq!(control_number_from(DteType::Invoice, id), "DTE-01-9F3A2B7C");

        let generated = generate_control_number(DteType::Settlement);
        assert!(generated.starts_with("DTE-11-"));
        assert_eq!(generated.len(), "DTE-11-".len() + 8);
        assert!(generated[7..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}
