//! Point-of-sale registration.

use omnigest_core::{
    document::{DocumentError, DteType, LineInput, PricedLine},
    inventory::{InventoryError, MovementDirection, apply_movement},
    sequence::{MAX_GENERATION_ATTEMPTS, generate_control_number},
};
use omnigest_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

use super::document::{insert_document_in, recompute_in, upsert_line_in};
use super::inventory::{StockError, apply_movement_in};
use super::is_unique_violation;
use crate::entities::{clients, document_lines, documents, stock_movements};

/// Error types for sale registration.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Product not found in the company.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Client not found in the company.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Stock rule violated.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Line rule violated.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Every generated control number collided.
    #[error("Could not generate a unique control number, please retry")]
    ControlNumberExhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockError> for SaleError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::ProductNotFound(id) => Self::ProductNotFound(id),
            StockError::Inventory(e) => Self::Inventory(e),
            StockError::Database(e) => Self::Database(e),
        }
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::ProductNotFound(_) | SaleError::ClientNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SaleError::Inventory(e) => e.into(),
            SaleError::Document(e) => e.into(),
            SaleError::ControlNumberExhausted => Self::Conflict(err.to_string()),
            SaleError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a sale.
#[derive(Debug, Clone, Copy)]
pub struct RegisterSaleInput {
    /// Product sold.
    pub product_id: Uuid,
    /// Units sold.
    pub quantity: i64,
    /// Customer; the company's "Consumidor Final" when absent.
    pub client_id: Option<Uuid>,
}

/// Rows written by a sale.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    /// Invoice issued for the sale.
    pub document: documents::Model,
    /// Its single line.
    pub line: document_lines::Model,
    /// Outbound stock movement.
    pub movement: stock_movements::Model,
    /// Customer on the invoice.
    pub client: clients::Model,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a sale: a type 01 invoice with one line at the product price
    /// and the matching outbound movement, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InsufficientStock` when the product does not
    /// have enough units; nothing is written in that case.
    pub async fn register(
        &self,
        company_id: Uuid,
        input: RegisterSaleInput,
    ) -> Result<SaleOutcome, SaleError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let control_number = generate_control_number(DteType::Invoice);
            match self.try_register(company_id, input, &control_number).await {
                Err(SaleError::Database(e)) if is_unique_violation(&e) => {
                    tracing::warn!(attempt, control_number = %control_number, "Control number collision, regenerating");
                }
                result => return result,
            }
        }

        Err(SaleError::ControlNumberExhausted)
    }

    async fn try_register(
        &self,
        company_id: Uuid,
        input: RegisterSaleInput,
        control_number: &str,
    ) -> Result<SaleOutcome, SaleError> {
        let txn = self.db.begin().await?;

        let product = super::product::find_in(&txn, company_id, input.product_id)
            .await?
            .ok_or(SaleError::ProductNotFound(input.product_id))?;
        apply_movement(product.on_hand, MovementDirection::Salida, input.quantity)?;

        let client = match input.client_id {
            Some(client_id) => super::client::find_in(&txn, company_id, client_id)
                .await?
                .ok_or(SaleError::ClientNotFound(client_id))?,
            None => super::client::final_consumer_in(&txn, company_id).await?,
        };

        let line = PricedLine::price(LineInput {
            product_id: product.id,
            quantity: Decimal::from(input.quantity),
            unit_price: product.unit_price,
        })?;

        let document = insert_document_in(
            &txn,
            company_id,
            client.id,
            DteType::Invoice,
            None,
            control_number,
        )
        .await?;
        let line = upsert_line_in(&txn, document.id, &line).await?;
        let document = recompute_in::<_, SaleError>(&txn, document).await?;

        let movement = apply_movement_in(
            &txn,
            company_id,
            product.id,
            MovementDirection::Salida,
            input.quantity,
            &format!("Venta {}", document.control_number),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            document_id = %document.id,
            product_id = %product.id,
            quantity = input.quantity,
            "Sale registered"
        );
        Ok(SaleOutcome {
            document,
            line,
            movement,
            client,
        })
    }
}
