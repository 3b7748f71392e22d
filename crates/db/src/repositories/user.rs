//! User repository: accounts and their profiles.

use omnigest_core::auth::Role;
use omnigest_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{is_unique_violation, now};
use crate::entities::{companies, enums::ProfileRole, user_profiles, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Username already taken.
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Company referenced by the profile does not exist.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::CompanyNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            UserError::UsernameTaken(_) => Self::Conflict(err.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user and its profile.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login name.
    pub username: String,
    /// Argon2id hash.
    pub password_hash: String,
    /// Email.
    pub email: Option<String>,
    /// Profile role.
    pub role: Role,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
}

/// Fields an administrator may change on a user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New login name.
    pub username: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New profile role.
    pub role: Option<Role>,
}

/// A user with its profile, when one exists.
#[derive(Debug, Clone)]
pub struct UserWithProfile {
    /// User row.
    pub user: users::Model,
    /// Profile row.
    pub profile: Option<user_profiles::Model>,
}

impl UserWithProfile {
    /// Returns the profile role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role.into())
    }

    /// Returns the profile company.
    #[must_use]
    pub fn company_id(&self) -> Option<Uuid> {
        self.profile.as_ref().and_then(|p| p.company_id)
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user together with its profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UsernameTaken` for duplicate usernames and
    /// `UserError::CompanyNotFound` for an unknown company.
    pub async fn create(&self, input: CreateUserInput) -> Result<UserWithProfile, UserError> {
        let txn = self.db.begin().await?;

        if let Some(company_id) = input.company_id {
            if companies::Entity::find_by_id(company_id).one(&txn).await?.is_none() {
                return Err(UserError::CompanyNotFound(company_id));
            }
        }

        let now = now();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(input.username.clone()),
            password_hash: Set(input.password_hash),
            email: Set(input.email),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserError::UsernameTaken(input.username.clone())
            } else {
                UserError::Database(e)
            }
        })?;

        let profile = user_profiles::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user.id),
            role: Set(ProfileRole::from(input.role)),
            company_id: Set(input.company_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(user_id = %user.id, role = %input.role, "User created");
        Ok(UserWithProfile {
            user,
            profile: Some(profile),
        })
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserWithProfile>, DbErr> {
        let found = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .find_also_related(user_profiles::Entity)
            .one(&self.db)
            .await?;

        Ok(found.map(|(user, profile)| UserWithProfile { user, profile }))
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserWithProfile>, DbErr> {
        let found = users::Entity::find_by_id(id)
            .find_also_related(user_profiles::Entity)
            .one(&self.db)
            .await?;

        Ok(found.map(|(user, profile)| UserWithProfile { user, profile }))
    }

    /// Finds the profile of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<user_profiles::Model>, DbErr> {
        user_profiles::Entity::find()
            .filter(user_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Lists the most recently created users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<UserWithProfile>, DbErr> {
        let rows = users::Entity::find()
            .find_also_related(user_profiles::Entity)
            .order_by_desc(users::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, profile)| UserWithProfile { user, profile })
            .collect())
    }

    /// Updates username, email and role.
    ///
    /// A user without a profile gets one when a role is supplied.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` or `UserError::UsernameTaken`.
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<UserWithProfile, UserError> {
        let txn = self.db.begin().await?;

        let (user, profile) = users::Entity::find_by_id(id)
            .find_also_related(user_profiles::Entity)
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let now = now();
        let mut active: users::ActiveModel = user.into();
        if let Some(username) = input.username.clone() {
            active.username = Set(username);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        active.updated_at = Set(now);
        let user = active.update(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::UsernameTaken(input.username.clone().unwrap_or_default())
            } else {
                UserError::Database(e)
            }
        })?;

        let profile = match (profile, input.role) {
            (Some(profile), Some(role)) => {
                let mut active: user_profiles::ActiveModel = profile.into();
                active.role = Set(role.into());
                active.updated_at = Set(now);
                Some(active.update(&txn).await?)
            }
            (None, Some(role)) => Some(
                user_profiles::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user.id),
                    role: Set(role.into()),
                    company_id: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?,
            ),
            (profile, None) => profile,
        };

        txn.commit().await?;
        Ok(UserWithProfile { user, profile })
    }

    /// Deletes a user and its profile.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user_profiles::Entity::delete_many()
            .filter(user_profiles::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user.delete(&txn).await?;

        txn.commit().await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
