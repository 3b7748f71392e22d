//! Sales report and sales book queries.

use chrono::Utc;
use chrono_tz::Tz;
use omnigest_core::books::{SaleEntry, SalesBookDay, SalesReport, SalesReportEntry, sales_book};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{
    clients,
    documents::{self, Column as Doc},
    enums::{DocumentState, DteCode},
};

/// Read-only repository for books and reports.
#[derive(Debug, Clone)]
pub struct BooksRepository {
    db: DatabaseConnection,
}

impl BooksRepository {
    /// Creates a new books repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The most recent active documents and the sum of their totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_report(&self, company_id: Uuid, limit: u64) -> Result<SalesReport, DbErr> {
        let rows = documents::Entity::find()
            .find_also_related(clients::Entity)
            .filter(Doc::CompanyId.eq(company_id))
            .filter(Doc::Status.eq(DocumentState::Activo))
            .order_by_desc(Doc::IssuedAt)
            .order_by_desc(Doc::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(SalesReport::new(
            rows.into_iter()
                .map(|(document, client)| SalesReportEntry {
                    id: document.id,
                    dte_type: document.dte_type.into(),
                    control_number: document.control_number,
                    client_name: client.map(|c| c.name).unwrap_or_default(),
                    issued_at: document.issued_at.with_timezone(&Utc),
                    total: document.total,
                })
                .collect(),
        ))
    }

    /// Active invoices grouped by local day in `tz`, the `limit` most recent days.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_book(
        &self,
        company_id: Uuid,
        tz: Tz,
        limit: usize,
    ) -> Result<Vec<SalesBookDay>, DbErr> {
        let entries: Vec<SaleEntry> = documents::Entity::find()
            .filter(Doc::CompanyId.eq(company_id))
            .filter(Doc::DteType.eq(DteCode::Invoice))
            .filter(Doc::Status.eq(DocumentState::Activo))
            .order_by_asc(Doc::IssuedAt)
            .order_by_asc(Doc::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| SaleEntry {
                control_number: d.control_number,
                issued_at: d.issued_at.with_timezone(&Utc),
                subtotal: d.subtotal,
                total: d.total,
            })
            .collect();

        Ok(sales_book(&entries, tz, limit))
    }
}
