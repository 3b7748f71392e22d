//! Email job queue storage.
//!
//! Handlers enqueue jobs; the dispatch worker marks them `sent` or `failed`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::now;
use crate::entities::{
    email_jobs,
    enums::{EmailJobKind, EmailJobStatus},
};

/// A job to enqueue.
#[derive(Debug, Clone)]
pub struct NewEmailJob {
    /// Document whose receipt is sent.
    pub document_id: Uuid,
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Approval or update receipt.
    pub kind: EmailJobKind,
}

/// Email job repository.
#[derive(Debug, Clone)]
pub struct EmailJobRepository {
    db: DatabaseConnection,
}

impl EmailJobRepository {
    /// Creates a new email job repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a queued job.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn enqueue(&self, company_id: Uuid, job: NewEmailJob) -> Result<email_jobs::Model, DbErr> {
        let now = now();
        email_jobs::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            document_id: Set(job.document_id),
            recipient: Set(job.recipient),
            subject: Set(job.subject),
            kind: Set(job.kind),
            status: Set(EmailJobStatus::Queued),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            sent_at: Set(None),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a job of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<email_jobs::Model>, DbErr> {
        email_jobs::Entity::find_by_id(id)
            .filter(email_jobs::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }

    /// Finds a job by ID regardless of company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<email_jobs::Model>, DbErr> {
        email_jobs::Entity::find_by_id(id).one(&self.db).await
    }

    /// IDs of jobs still waiting for delivery, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn queued_ids(&self) -> Result<Vec<Uuid>, DbErr> {
        email_jobs::Entity::find()
            .select_only()
            .column(email_jobs::Column::Id)
            .filter(email_jobs::Column::Status.eq(EmailJobStatus::Queued))
            .order_by_asc(email_jobs::Column::CreatedAt)
            .order_by_asc(email_jobs::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Marks a job as delivered.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` if the job does not exist.
    pub async fn mark_sent(&self, id: Uuid) -> Result<email_jobs::Model, DbErr> {
        let job = self.get(id).await?;
        let attempts = job.attempts + 1;
        let now = now();

        let mut active: email_jobs::ActiveModel = job.into();
        active.status = Set(EmailJobStatus::Sent);
        active.attempts = Set(attempts);
        active.last_error = Set(None);
        active.updated_at = Set(now);
        active.sent_at = Set(Some(now));
        active.update(&self.db).await
    }

    /// Marks a job as failed with the delivery error.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` if the job does not exist.
    pub async fn mark_failed(&self, id: Uuid, error: &str) -> Result<email_jobs::Model, DbErr> {
        let job = self.get(id).await?;
        let attempts = job.attempts + 1;

        let mut active: email_jobs::ActiveModel = job.into();
        active.status = Set(EmailJobStatus::Failed);
        active.attempts = Set(attempts);
        active.last_error = Set(Some(error.to_string()));
        active.updated_at = Set(now());
        active.update(&self.db).await
    }

    async fn get(&self, id: Uuid) -> Result<email_jobs::Model, DbErr> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("email job {id}")))
    }
}
