//! Purchase registration and the purchase book.
//!
//! A purchase record is the only representation of a purchase; the purchase
//! book is a projection over these rows.

use chrono::{NaiveDate, Utc};
use omnigest_core::{
    books::PurchaseBookRow,
    inventory::{InventoryError, MovementDirection},
    purchase::{PurchaseAmounts, PurchaseError},
    sequence::{MAX_GENERATION_ATTEMPTS, purchase_voucher, registry_number},
};
use omnigest_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::inventory::{StockError, apply_movement_in};
use super::{is_unique_violation, like_pattern, lower, now};
use crate::entities::{products, purchase_records};

/// Error types for purchase operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseRepoError {
    /// Supplier not found in the company.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Product not found in the company.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Amount or quantity rejected.
    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    /// Stock rule violated.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Every generated sequence number collided.
    #[error("Could not allocate a purchase number, please retry")]
    SequenceExhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockError> for PurchaseRepoError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::ProductNotFound(id) => Self::ProductNotFound(id),
            StockError::Inventory(e) => Self::Inventory(e),
            StockError::Database(e) => Self::Database(e),
        }
    }
}

impl From<PurchaseRepoError> for AppError {
    fn from(err: PurchaseRepoError) -> Self {
        match err {
            PurchaseRepoError::SupplierNotFound(_) | PurchaseRepoError::ProductNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PurchaseRepoError::Purchase(e) => e.into(),
            PurchaseRepoError::Inventory(e) => e.into(),
            PurchaseRepoError::SequenceExhausted => Self::Conflict(err.to_string()),
            PurchaseRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a purchase.
#[derive(Debug, Clone, Copy)]
pub struct RegisterPurchaseInput {
    /// Supplier.
    pub supplier_id: Uuid,
    /// Product received.
    pub product_id: Uuid,
    /// Units received.
    pub quantity: i64,
    /// Gross amount paid, before IVA.
    pub amount: Decimal,
    /// Local calendar day printed on the voucher number.
    pub voucher_date: NaiveDate,
}

/// Purchase repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a purchase.
    ///
    /// Inserts the purchase record, receives the units into stock and updates
    /// the product's unit price when it changed, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts or quantities, unknown
    /// supplier or product, or when no free sequence number was found.
    pub async fn register(
        &self,
        company_id: Uuid,
        input: RegisterPurchaseInput,
    ) -> Result<purchase_records::Model, PurchaseRepoError> {
        let amounts = PurchaseAmounts::compute(input.amount, input.quantity)?;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            match self.try_register(company_id, &input, &amounts).await {
                Err(PurchaseRepoError::Database(e)) if is_unique_violation(&e) => {
                    tracing::warn!(attempt, "Purchase sequence collision, retrying");
                }
                result => return result,
            }
        }

        Err(PurchaseRepoError::SequenceExhausted)
    }

    async fn try_register(
        &self,
        company_id: Uuid,
        input: &RegisterPurchaseInput,
        amounts: &PurchaseAmounts,
    ) -> Result<purchase_records::Model, PurchaseRepoError> {
        let txn = self.db.begin().await?;

        let supplier = super::supplier::find_in(&txn, company_id, input.supplier_id)
            .await?
            .ok_or(PurchaseRepoError::SupplierNotFound(input.supplier_id))?;
        let product = super::product::find_in(&txn, company_id, input.product_id)
            .await?
            .ok_or(PurchaseRepoError::ProductNotFound(input.product_id))?;

        let sequence = next_sequence_in(&txn, company_id).await?;
        let voucher = purchase_voucher(input.voucher_date, sequence);

        let record = purchase_records::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            supplier_id: Set(supplier.id),
            product_id: Set(product.id),
            supplier_name: Set(supplier.name),
            sequence: Set(sequence),
            voucher_number: Set(voucher.clone()),
            registry_number: Set(registry_number(sequence)),
            quantity: Set(input.quantity),
            unit_price: Set(amounts.unit_price),
            taxed_amount: Set(amounts.taxed_amount),
            iva: Set(amounts.iva),
            total: Set(amounts.total),
            purchased_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        apply_movement_in(
            &txn,
            company_id,
            product.id,
            MovementDirection::Entrada,
            input.quantity,
            &format!("Compra {voucher}"),
        )
        .await?;

        if product.unit_price != amounts.unit_price {
            let mut active: products::ActiveModel = product.into();
            active.unit_price = Set(amounts.unit_price);
            active.updated_at = Set(now());
            active.update(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(
            purchase_id = %record.id,
            voucher = %record.voucher_number,
            total = %record.total,
            "Purchase registered"
        );
        Ok(record)
    }

    /// Lists purchase records newest first, optionally matching the voucher
    /// or registry number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        search: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<purchase_records::Model>, DbErr> {
        let mut query = purchase_records::Entity::find()
            .filter(purchase_records::Column::CompanyId.eq(company_id));

        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(lower(purchase_records::Column::VoucherNumber).like(pattern.as_str()))
                    .add(lower(purchase_records::Column::RegistryNumber).like(pattern.as_str())),
            );
        }

        query
            .order_by_desc(purchase_records::Column::PurchasedAt)
            .order_by_desc(purchase_records::Column::Sequence)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Returns every purchase record as purchase book rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn book_rows(&self, company_id: Uuid) -> Result<Vec<PurchaseBookRow>, DbErr> {
        let records = purchase_records::Entity::find()
            .filter(purchase_records::Column::CompanyId.eq(company_id))
            .order_by_asc(purchase_records::Column::Sequence)
            .all(&self.db)
            .await?;

        Ok(records.into_iter().map(book_row).collect())
    }
}

/// Converts a record into a purchase book row.
#[must_use]
pub fn book_row(record: purchase_records::Model) -> PurchaseBookRow {
    PurchaseBookRow {
        purchased_at: record.purchased_at.with_timezone(&Utc),
        voucher_number: record.voucher_number,
        registry_number: record.registry_number,
        supplier_name: record.supplier_name,
        unit_price: record.unit_price,
        taxed_amount: record.taxed_amount,
        iva: record.iva,
        total: record.total,
    }
}

async fn next_sequence_in<C: ConnectionTrait>(conn: &C, company_id: Uuid) -> Result<i64, DbErr> {
    let max: Option<Option<i64>> = purchase_records::Entity::find()
        .select_only()
        .column_as(purchase_records::Column::Sequence.max(), "max_sequence")
        .filter(purchase_records::Column::CompanyId.eq(company_id))
        .into_tuple()
        .one(conn)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}
