//! Sales book grouped by local calendar day, and the sales report.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::document::DteType;

/// An active invoice feeding the sales book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleEntry {
    /// Control number of the document.
    pub control_number: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Taxed sales.
    pub subtotal: Decimal,
    /// Gross total.
    pub total: Decimal,
}

/// One day of the sales book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesBookDay {
    /// Local calendar day.
    pub day: NaiveDate,
    /// First control number issued that day.
    pub first_control_number: String,
    /// Last control number issued that day.
    pub last_control_number: String,
    /// Σ subtotal.
    pub taxed_sales: Decimal,
    /// Σ total.
    pub total: Decimal,
}

/// Groups entries by local day in `tz` and returns the `limit` most recent days,
/// newest first.
///
/// Within a day, first and last control numbers follow issuance order.
#[must_use]
pub fn sales_book(entries: &[SaleEntry], tz: Tz, limit: usize) -> Vec<SalesBookDay> {
    let mut ordered: Vec<&SaleEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.issued_at);

    let mut days: BTreeMap<NaiveDate, SalesBookDay> = BTreeMap::new();
    for entry in ordered {
        let day = entry.issued_at.with_timezone(&tz).date_naive();
        days.entry(day)
            .and_modify(|d| {
                d.last_control_number.clone_from(&entry.control_number);
                d.taxed_sales += entry.subtotal;
                d.total += entry.total;
            })
            .or_insert_with(|| SalesBookDay {
                day,
                first_control_number: entry.control_number.clone(),
                last_control_number: entry.control_number.clone(),
                taxed_sales: entry.subtotal,
                total: entry.total,
            });
    }

    days.into_values().rev().take(limit).collect()
}

/// A document row in the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReportEntry {
    /// Document ID.
    pub id: Uuid,
    /// DTE type.
    pub dte_type: DteType,
    /// Control number.
    pub control_number: String,
    /// Client name.
    pub client_name: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Gross total.
    pub total: Decimal,
}

/// Most recent active documents and the sum of their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    /// Documents, newest first.
    pub documents: Vec<SalesReportEntry>,
    /// Σ total over `documents`.
    pub total: Decimal,
}

impl SalesReport {
    /// Builds the report from rows already ordered and limited by the caller.
    #[must_use]
    pub fn new(documents: Vec<SalesReportEntry>) -> Self {
        let total = documents.iter().map(|d| d.total).sum();
        Self { documents, total }
    }
}
