//! Client repository.

use omnigest_shared::{AppError, types::PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{like_pattern, lower, now};
use crate::entities::{clients, documents};

/// Name of the walk-in client used when a sale names no client.
pub const FINAL_CONSUMER_NAME: &str = "Consumidor Final";

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Documents still reference the client.
    #[error("Client has {0} document(s) and cannot be deleted")]
    InUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => Self::NotFound(err.to_string()),
            ClientError::InUse(_) => Self::Conflict(err.to_string()),
            ClientError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Client fields supplied on create and update.
#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    /// Name.
    pub name: String,
    /// Personal id number.
    pub dui: Option<String>,
    /// Tax id.
    pub nit: Option<String>,
    /// Registry number.
    pub nrc: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
}

/// Client repository.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, company_id: Uuid, input: ClientInput) -> Result<clients::Model, DbErr> {
        let now = now();
        clients::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            name: Set(input.name),
            dui: Set(input.dui),
            nit: Set(input.nit),
            nrc: Set(input.nrc),
            address: Set(input.address),
            email: Set(input.email),
            phone: Set(input.phone),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Lists clients by name, optionally filtered by a case-insensitive
    /// match on name, NIT or DUI.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<clients::Model>, u64), DbErr> {
        let mut query = clients::Entity::find().filter(clients::Column::CompanyId.eq(company_id));

        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(lower(clients::Column::Name).like(pattern.as_str()))
                    .add(lower(clients::Column::Nit).like(pattern.as_str()))
                    .add(lower(clients::Column::Dui).like(pattern.as_str())),
            );
        }

        let paginator = query
            .order_by_asc(clients::Column::Name)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;

        Ok((items, total))
    }

    /// Finds a client of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        find_in(&self.db, company_id, id).await
    }

    /// Updates a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the client does not belong to the company.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ClientInput,
    ) -> Result<clients::Model, ClientError> {
        let client = find_in(&self.db, company_id, id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let mut active: clients::ActiveModel = client.into();
        active.name = Set(input.name);
        active.dui = Set(input.dui);
        active.nit = Set(input.nit);
        active.nrc = Set(input.nrc);
        active.address = Set(input.address);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client that no document references.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InUse` while documents reference the client.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), ClientError> {
        let client = find_in(&self.db, company_id, id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let references = documents::Entity::find()
            .filter(documents::Column::ClientId.eq(id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(ClientError::InUse(references));
        }

        client.delete(&self.db).await?;
        Ok(())
    }
}

/// Finds a client scoped to its company.
pub(crate) async fn find_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    id: Uuid,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find_by_id(id)
        .filter(clients::Column::CompanyId.eq(company_id))
        .one(conn)
        .await
}

/// Returns the company's "Consumidor Final" client, creating it on first use.
pub(crate) async fn final_consumer_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
) -> Result<clients::Model, DbErr> {
    let existing = clients::Entity::find()
        .filter(clients::Column::CompanyId.eq(company_id))
        .filter(clients::Column::Name.eq(FINAL_CONSUMER_NAME))
        .order_by_asc(clients::Column::CreatedAt)
        .one(conn)
        .await?;
    if let Some(client) = existing {
        return Ok(client);
    }

    let now = now();
    clients::ActiveModel {
        id: Set(Uuid::now_v7()),
        company_id: Set(company_id),
        name: Set(FINAL_CONSUMER_NAME.to_string()),
        dui: Set(None),
        nit: Set(None),
        nrc: Set(None),
        address: Set(None),
        email: Set(None),
        phone: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}
