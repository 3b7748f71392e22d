//! Supplier repository.

use omnigest_shared::{AppError, types::PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{like_pattern, lower, now};
use crate::entities::{purchase_records, suppliers};

/// Error types for supplier operations.
#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    NotFound(Uuid),

    /// Purchase records still reference the supplier.
    #[error("Supplier has {0} purchase(s) and cannot be deleted")]
    InUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SupplierError> for AppError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::NotFound(_) => Self::NotFound(err.to_string()),
            SupplierError::InUse(_) => Self::Conflict(err.to_string()),
            SupplierError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Supplier fields supplied on create and update.
#[derive(Debug, Clone, Default)]
pub struct SupplierInput {
    /// Name.
    pub name: String,
    /// Tax id.
    pub nit: Option<String>,
    /// Registry number.
    pub nrc: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Legal representative.
    pub legal_representative: Option<String>,
}

/// Supplier repository.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        input: SupplierInput,
    ) -> Result<suppliers::Model, DbErr> {
        let now = now();
        suppliers::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            name: Set(input.name),
            nit: Set(input.nit),
            nrc: Set(input.nrc),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            legal_representative: Set(input.legal_representative),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Lists suppliers by name with an optional name or NIT search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<suppliers::Model>, u64), DbErr> {
        let mut query =
            suppliers::Entity::find().filter(suppliers::Column::CompanyId.eq(company_id));

        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(lower(suppliers::Column::Name).like(pattern.as_str()))
                    .add(lower(suppliers::Column::Nit).like(pattern.as_str())),
            );
        }

        let paginator = query
            .order_by_asc(suppliers::Column::Name)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;

        Ok((items, total))
    }

    /// Finds a supplier of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<suppliers::Model>, DbErr> {
        find_in(&self.db, company_id, id).await
    }

    /// Updates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `SupplierError::NotFound` if the supplier does not belong to the company.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: SupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let supplier = find_in(&self.db, company_id, id)
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        let mut active: suppliers::ActiveModel = supplier.into();
        active.name = Set(input.name);
        active.nit = Set(input.nit);
        active.nrc = Set(input.nrc);
        active.address = Set(input.address);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.legal_representative = Set(input.legal_representative);
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a supplier without purchases.
    ///
    /// # Errors
    ///
    /// Returns `SupplierError::InUse` while purchase records reference the supplier.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), SupplierError> {
        let supplier = find_in(&self.db, company_id, id)
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        let references = purchase_records::Entity::find()
            .filter(purchase_records::Column::SupplierId.eq(id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(SupplierError::InUse(references));
        }

        supplier.delete(&self.db).await?;
        Ok(())
    }
}

pub(crate) async fn find_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    id: Uuid,
) -> Result<Option<suppliers::Model>, DbErr> {
    suppliers::Entity::find_by_id(id)
        .filter(suppliers::Column::CompanyId.eq(company_id))
        .one(conn)
        .await
}
