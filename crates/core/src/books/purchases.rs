//! Purchase book rows and CSV export.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

use super::BooksError;

/// Column headers of the exported purchase book.
pub const PURCHASE_BOOK_HEADERS: [&str; 9] = [
    "N°",
    "Fecha",
    "Comprobante N°",
    "Registro N°",
    "Proveedor",
    "Precio Unitario",
    "Compras Gravadas",
    "IVA 13%",
    "Total",
];

/// One purchase record as shown in the purchase book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseBookRow {
    /// Purchase instant.
    pub purchased_at: DateTime<Utc>,
    /// Voucher number.
    pub voucher_number: String,
    /// Registry number.
    pub registry_number: String,
    /// Supplier name at the time of purchase.
    pub supplier_name: String,
    /// Unit price.
    pub unit_price: Decimal,
    /// Taxed purchases.
    pub taxed_amount: Decimal,
    /// IVA.
    pub iva: Decimal,
    /// Total.
    pub total: Decimal,
}

/// Writes the purchase book as CSV, numbering rows from 1 and formatting
/// dates as `dd/mm/YYYY` in `tz`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_purchase_book_csv<W: std::io::Write>(
    rows: &[PurchaseBookRow],
    tz: Tz,
    writer: W,
) -> Result<(), BooksError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(PURCHASE_BOOK_HEADERS)?;

    for (index, row) in rows.iter().enumerate() {
        csv.write_record([
            (index + 1).to_string(),
            row.purchased_at.with_timezone(&tz).format("%d/%m/%Y").to_string(),
            row.voucher_number.clone(),
            row.registry_number.clone(),
            row.supplier_name.clone(),
            format!("{:.2}", row.unit_price),
            format!("{:.2}", row.taxed_amount),
            format!("{:.2}", row.iva),
            format!("{:.2}", row.total),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::El_Salvador;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_export() {
        let rows = vec![PurchaseBookRow {
            purchased_at: Utc.with_ymd_and_hms(2025, 11, 14, 2, 0, 0).unwrap(),
            voucher_number: "COMP-20251113-0001".into(),
            registry_number: "REG-00001".into(),
            supplier_name: "Distribuidora Central, S.A.".into(),
            unit_price: dec!(25),
            taxed_amount: dec!(100.00),
            iva: dec!(13.00),
            total: dec!(113.00),
        }];

        let mut out = Vec::new();
        write_purchase_book_csv(&rows, El_Salvador, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "N°,Fecha,Comprobante N°,Registro N°,Proveedor,Precio Unitario,Compras Gravadas,IVA 13%,Total"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,13/11/2025,COMP-20251113-0001,REG-00001,\"Distribuidora Central, S.A.\",25.00,100.00,13.00,113.00"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_export_has_headers() {
        let mut out = Vec::new();
        write_purchase_book_csv(&[], El_Salvador, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
