//! Receipt email dispatch.
//!
//! Handlers persist an `email_jobs` row and push its id onto a bounded
//! channel. [`EmailWorker`] renders the receipt, sends it and records the
//! outcome on the row.

use std::sync::Arc;

use chrono_tz::Tz;
use omnigest_core::receipt::{ReceiptKind, ReceiptRenderer, receipt_email};
use omnigest_db::{
    DocumentRepository, EmailJobRepository,
    entities::{email_jobs, enums::EmailJobStatus},
    repositories::NewEmailJob,
};
use omnigest_shared::{AppError, EmailAttachment, EmailService};
use sea_orm::{DatabaseConnection, DbErr};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Sending side of the email queue.
#[derive(Debug, Clone)]
pub struct EmailQueue {
    sender: mpsc::Sender<Uuid>,
}

/// Creates a queue and the receiver the worker consumes.
#[must_use]
pub fn email_channel(capacity: usize) -> (EmailQueue, mpsc::Receiver<Uuid>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (EmailQueue { sender }, receiver)
}

impl EmailQueue {
    /// Persists a job and hands it to the worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be stored.
    pub async fn enqueue(
        &self,
        db: &DatabaseConnection,
        company_id: Uuid,
        job: NewEmailJob,
    ) -> Result<email_jobs::Model, DbErr> {
        let job = EmailJobRepository::new(db.clone()).enqueue(company_id, job).await?;
        self.try_notify(job.id);
        tracing::info!(job_id = %job.id, document_id = %job.document_id, "Receipt email queued");
        Ok(job)
    }

    /// Hands a persisted job to the worker without waiting for room.
    ///
    /// Returns false when the channel is full or closed. The job then stays
    /// `queued` and is picked up again on the next start.
    pub fn try_notify(&self, job_id: Uuid) -> bool {
        match self.sender.try_send(job_id) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(job_id = %job_id, "Email queue is full, job left queued");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(job_id = %job_id, "Email worker is not running, job left queued");
                false
            }
        }
    }

    /// Pushes an existing job id onto the channel, waiting for room.
    async fn notify(&self, job_id: Uuid) {
        if self.sender.send(job_id).await.is_err() {
            tracing::warn!(job_id = %job_id, "Email worker is not running, job left queued");
        }
    }
}

/// Consumes the email queue.
#[derive(Clone)]
pub struct EmailWorker {
    db: DatabaseConnection,
    email: Arc<EmailService>,
    renderer: Arc<dyn ReceiptRenderer>,
    timezone: Tz,
}

impl std::fmt::Debug for EmailWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailWorker")
            .field("email", &self.email)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl EmailWorker {
    /// Creates a worker.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        email: Arc<EmailService>,
        renderer: Arc<dyn ReceiptRenderer>,
        timezone: Tz,
    ) -> Self {
        Self {
            db,
            email,
            renderer,
            timezone,
        }
    }

    /// Spawns the worker loop.
    ///
    /// Jobs left `queued` by a previous run are re-enqueued first.
    pub fn spawn(self, queue: EmailQueue, mut receiver: mpsc::Receiver<Uuid>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let jobs = EmailJobRepository::new(self.db.clone());
            match jobs.queued_ids().await {
                Ok(pending) if !pending.is_empty() => {
                    tracing::info!(count = pending.len(), "Re-enqueueing pending receipt emails");
                    let queue = queue.clone();
                    tokio::spawn(async move {
                        for id in pending {
                            queue.notify(id).await;
                        }
                    });
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Failed to load pending email jobs"),
            }
            drop(queue);

            while let Some(job_id) = receiver.recv().await {
                if let Err(e) = self.process(job_id).await {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to record email job outcome");
                }
            }
            tracing::info!("Email worker stopped");
        })
    }

    /// Delivers one job and records the outcome.
    ///
    /// Jobs that are no longer `queued` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the outcome cannot be stored.
    pub async fn process(&self, job_id: Uuid) -> Result<Option<email_jobs::Model>, DbErr> {
        let jobs = EmailJobRepository::new(self.db.clone());
        let Some(job) = jobs.find_by_id(job_id).await? else {
            tracing::warn!(job_id = %job_id, "Email job vanished before delivery");
            return Ok(None);
        };
        if job.status != EmailJobStatus::Queued {
            return Ok(None);
        }

        let updated = match self.deliver(&job).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, recipient = %job.recipient, "Receipt email sent");
                jobs.mark_sent(job.id).await?
            }
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "Receipt email failed");
                jobs.mark_failed(job.id, &e.to_string()).await?
            }
        };
        Ok(Some(updated))
    }

    async fn deliver(&self, job: &email_jobs::Model) -> Result<(), AppError> {
        let receipt = DocumentRepository::new(self.db.clone())
            .receipt_data(job.company_id, job.document_id)
            .await?;
        let kind = ReceiptKind::from(job.kind);
        let message = receipt_email(kind, &receipt.client.name, receipt.dte_type);

        let attachments: Vec<EmailAttachment> = vec![
            self.renderer.render(&receipt)?.into(),
            receipt.json_attachment(self.timezone)?,
        ];

        self.email
            .send_with_attachments(&job.recipient, &job.subject, &message.body, &attachments)
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))
    }
}
