//! Company (tenant) repository.

use omnigest_shared::AppError;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use super::{is_unique_violation, now};
use crate::entities::companies;

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// Company not found.
    #[error("Company not found: {0}")]
    NotFound(Uuid),

    /// NIT or NRC already registered.
    #[error("A company with this NIT or NRC already exists")]
    Duplicate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::NotFound(_) => Self::NotFound(err.to_string()),
            CompanyError::Duplicate => Self::Conflict(err.to_string()),
            CompanyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a company.
#[derive(Debug, Clone, Default)]
pub struct CreateCompanyInput {
    /// Legal name.
    pub name: String,
    /// Tax id.
    pub nit: String,
    /// Registry number.
    pub nrc: String,
    /// Address.
    pub address: String,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Economic activity.
    pub economic_activity: Option<String>,
    /// Legal representative.
    pub legal_representative: Option<String>,
}

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a company.
    ///
    /// # Errors
    ///
    /// Returns `CompanyError::Duplicate` when the NIT or NRC is taken.
    pub async fn create(&self, input: CreateCompanyInput) -> Result<companies::Model, CompanyError> {
        let now = now();
        let company = companies::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            nit: Set(input.nit),
            nrc: Set(input.nrc),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            economic_activity: Set(input.economic_activity),
            legal_representative: Set(input.legal_representative),
            created_at: Set(now),
            updated_at: Set(now),
        };

        company.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CompanyError::Duplicate
            } else {
                CompanyError::Database(e)
            }
        })
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Gets a company or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CompanyError::NotFound` if the company does not exist.
    pub async fn get(&self, id: Uuid) -> Result<companies::Model, CompanyError> {
        self.find_by_id(id).await?.ok_or(CompanyError::NotFound(id))
    }
}
