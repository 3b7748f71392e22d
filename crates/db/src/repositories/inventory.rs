//! Inventory ledger: stock movements and on-hand balances.
//!
//! Balances change only through [`apply_movement_in`], which updates the
//! product with a guarded `UPDATE ... SET on_hand = on_hand ± q` and records
//! the movement in the same transaction. Concurrent movements on one product
//! serialize on the row and an outbound update that would go negative affects
//! no rows.

use chrono::Utc;
use omnigest_core::inventory::{InventoryError, MovementDirection, apply_movement};
use omnigest_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::now;
use crate::entities::{enums::MovementKind, products, stock_movements};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Movement rejected by the inventory rules.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::ProductNotFound(_) => Self::NotFound(err.to_string()),
            StockError::Inventory(e) => e.into(),
            StockError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a stock movement and returns it with the resulting balance.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Inventory` for non-positive quantities or outbound
    /// movements above the balance; nothing is written in that case.
    pub async fn apply_movement(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        direction: MovementDirection,
        quantity: i64,
        description: &str,
    ) -> Result<stock_movements::Model, StockError> {
        let txn = self.db.begin().await?;
        let movement =
            apply_movement_in(&txn, company_id, product_id, direction, quantity, description)
                .await?;
        txn.commit().await?;

        tracing::info!(
            product_id = %product_id,
            direction = direction.as_str(),
            quantity,
            balance = movement.balance_after,
            "Stock movement recorded"
        );
        Ok(movement)
    }

    /// Lists the movements of a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StockError::ProductNotFound` if the product does not belong to the company.
    pub async fn list_movements(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<stock_movements::Model>, StockError> {
        if super::product::find_in(&self.db, company_id, product_id)
            .await?
            .is_none()
        {
            return Err(StockError::ProductNotFound(product_id));
        }

        Ok(stock_movements::Entity::find()
            .filter(stock_movements::Column::ProductId.eq(product_id))
            .order_by_desc(stock_movements::Column::OccurredAt)
            .order_by_desc(stock_movements::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Lists the stock levels of every product of a company by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stock_levels(&self, company_id: Uuid) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::CompanyId.eq(company_id))
            .order_by_asc(products::Column::Code)
            .all(&self.db)
            .await
    }
}

/// Applies a movement inside the caller's transaction.
///
/// The balance is validated against the current row first so callers get a
/// precise error, then changed with a guarded update so a concurrent writer
/// cannot drive it negative.
pub(crate) async fn apply_movement_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    product_id: Uuid,
    direction: MovementDirection,
    quantity: i64,
    description: &str,
) -> Result<stock_movements::Model, StockError> {
    let product = super::product::find_in(conn, company_id, product_id)
        .await?
        .ok_or(StockError::ProductNotFound(product_id))?;
    apply_movement(product.on_hand, direction, quantity)?;

    let on_hand = Expr::col(products::Column::OnHand);
    let mut update = products::Entity::update_many()
        .col_expr(
            products::Column::OnHand,
            match direction {
                MovementDirection::Entrada => on_hand.add(quantity),
                MovementDirection::Salida => on_hand.sub(quantity),
            },
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(now()))
        .filter(products::Column::Id.eq(product_id))
        .filter(products::Column::CompanyId.eq(company_id));
    if direction == MovementDirection::Salida {
        update = update.filter(products::Column::OnHand.gte(quantity));
    }

    if update.exec(conn).await?.rows_affected == 0 {
        let current = super::product::find_in(conn, company_id, product_id)
            .await?
            .ok_or(StockError::ProductNotFound(product_id))?;
        return Err(InventoryError::InsufficientStock {
            on_hand: current.on_hand,
            requested: quantity,
        }
        .into());
    }

    let balance_after = super::product::find_in(conn, company_id, product_id)
        .await?
        .ok_or(StockError::ProductNotFound(product_id))?
        .on_hand;

    let movement = stock_movements::ActiveModel {
        id: Set(Uuid::now_v7()),
        company_id: Set(company_id),
        product_id: Set(product_id),
        direction: Set(MovementKind::from(direction)),
        quantity: Set(quantity),
        balance_after: Set(balance_after),
        description: Set(description.to_string()),
        occurred_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(movement)
}
