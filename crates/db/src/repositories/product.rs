//! Product repository: catalogue entries and code generation.

use omnigest_core::{
    inventory::MovementDirection,
    sequence::{MAX_GENERATION_ATTEMPTS, PRODUCT_CODE_PREFIX, next_product_code_from},
};
use omnigest_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::inventory::{StockError, apply_movement_in};
use super::{is_unique_violation, like_pattern, lower, now};
use crate::entities::{document_lines, products, purchase_records};

/// Unit of measure used when none is given.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "C/U";

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Code already used by another product of the company.
    #[error("Product code already exists: {0}")]
    CodeTaken(String),

    /// Every generated code collided.
    #[error("Could not generate a unique product code, please retry")]
    CodeGenerationFailed,

    /// Product code is blank.
    #[error("Product code cannot be blank")]
    BlankCode,

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative, got {0}")]
    NegativePrice(Decimal),

    /// Documents or purchases still reference the product.
    #[error("Product is referenced by documents or purchases and cannot be deleted")]
    InUse,

    /// Initial stock movement rejected.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::CodeTaken(_)
            | ProductError::CodeGenerationFailed
            | ProductError::InUse => Self::Conflict(err.to_string()),
            ProductError::BlankCode | ProductError::NegativePrice(_) => {
                Self::Validation(err.to_string())
            }
            ProductError::Stock(e) => e.into(),
            ProductError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Default)]
pub struct CreateProductInput {
    /// Explicit code; generated when absent.
    pub code: Option<String>,
    /// Description.
    pub description: String,
    /// Unit of measure, `C/U` when absent.
    pub unit_of_measure: Option<String>,
    /// Unit price.
    pub unit_price: Decimal,
    /// Opening stock, recorded as an inbound movement.
    pub initial_stock: i64,
}

/// Editable product fields. The code never changes.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// Description.
    pub description: Option<String>,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    /// Unit price.
    pub unit_price: Option<Decimal>,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the next free generated code of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_code(&self, company_id: Uuid) -> Result<String, ProductError> {
        let codes: Vec<String> = products::Entity::find()
            .select_only()
            .column(products::Column::Code)
            .filter(products::Column::CompanyId.eq(company_id))
            .filter(products::Column::Code.starts_with(PRODUCT_CODE_PREFIX))
            .into_tuple()
            .all(&self.db)
            .await?;

        next_product_code_from(codes.iter().map(String::as_str))
            .map_err(|_| ProductError::CodeGenerationFailed)
    }

    /// Creates a product, generating its code when none is given.
    ///
    /// A generated code that collides with a concurrent insert is regenerated
    /// up to `MAX_GENERATION_ATTEMPTS` times.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::CodeTaken` for a duplicate explicit code and
    /// `ProductError::CodeGenerationFailed` when every attempt collided.
    pub async fn create(
        &self,
        company_id: Uuid,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        if input.unit_price.is_sign_negative() && !input.unit_price.is_zero() {
            return Err(ProductError::NegativePrice(input.unit_price));
        }

        if let Some(code) = input.code.as_deref().map(str::trim) {
            if code.is_empty() {
                return Err(ProductError::BlankCode);
            }
            return self
                .insert_product(company_id, &input, code.to_string())
                .await
                .map_err(|e| match e {
                    ProductError::Database(db) if is_unique_violation(&db) => {
                        ProductError::CodeTaken(code.to_string())
                    }
                    other => other,
                });
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.next_code(company_id).await?;
            match self.insert_product(company_id, &input, code.clone()).await {
                Err(ProductError::Database(e)) if is_unique_violation(&e) => {
                    tracing::warn!(attempt, code = %code, "Product code collision, regenerating");
                }
                result => return result,
            }
        }

        Err(ProductError::CodeGenerationFailed)
    }

    async fn insert_product(
        &self,
        company_id: Uuid,
        input: &CreateProductInput,
        code: String,
    ) -> Result<products::Model, ProductError> {
        let txn = self.db.begin().await?;

        let now = now();
        let product = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            code: Set(code),
            description: Set(input.description.clone()),
            unit_of_measure: Set(input
                .unit_of_measure
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string())),
            unit_price: Set(input.unit_price),
            on_hand: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let product = if input.initial_stock > 0 {
            let movement = apply_movement_in(
                &txn,
                company_id,
                product.id,
                MovementDirection::Entrada,
                input.initial_stock,
                "Inventario inicial",
            )
            .await?;
            products::Model {
                on_hand: movement.balance_after,
                ..product
            }
        } else {
            product
        };

        txn.commit().await?;
        tracing::info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    /// Lists products by code with an optional code or description search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<products::Model>, u64), DbErr> {
        let mut query = products::Entity::find().filter(products::Column::CompanyId.eq(company_id));

        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(lower(products::Column::Code).like(pattern.as_str()))
                    .add(lower(products::Column::Description).like(pattern.as_str())),
            );
        }

        let paginator = query
            .order_by_asc(products::Column::Code)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;

        Ok((items, total))
    }

    /// Finds a product of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<products::Model>, DbErr> {
        find_in(&self.db, company_id, id).await
    }

    /// Updates description, unit of measure and price.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` or `ProductError::NegativePrice`.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = find_in(&self.db, company_id, id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let mut active: products::ActiveModel = product.into();
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(unit) = input.unit_of_measure {
            active.unit_of_measure = Set(unit);
        }
        if let Some(price) = input.unit_price {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(ProductError::NegativePrice(price));
            }
            active.unit_price = Set(price);
        }
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a product that no document line or purchase references.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InUse` while references exist.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), ProductError> {
        let product = find_in(&self.db, company_id, id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let lines = document_lines::Entity::find()
            .filter(document_lines::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        let purchases = purchase_records::Entity::find()
            .filter(purchase_records::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if lines + purchases > 0 {
            return Err(ProductError::InUse);
        }

        product.delete(&self.db).await?;
        Ok(())
    }
}

/// Finds a product scoped to its company.
pub(crate) async fn find_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    id: Uuid,
) -> Result<Option<products::Model>, DbErr> {
    products::Entity::find_by_id(id)
        .filter(products::Column::CompanyId.eq(company_id))
        .one(conn)
        .await
}
