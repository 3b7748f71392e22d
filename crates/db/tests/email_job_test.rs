//! Email job queue integration tests.

mod common;

use common::{create_client, create_company, create_product, setup_db};
use omnigest_core::document::{DteType, LineInput};
use omnigest_db::{
    DocumentRepository, EmailJobRepository,
    entities::enums::{EmailJobKind, EmailJobStatus},
    repositories::{IssueDocumentInput, NewEmailJob},
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_job_lifecycle() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let client = create_client(&db, company.id, "Ana Lopez").await;
    let product = create_product(&db, company.id, dec!(10.00), 0).await;
    let document = DocumentRepository::new(db.clone())
        .issue(
            company.id,
            IssueDocumentInput {
                client_id: client.id,
                dte_type: DteType::Invoice,
                payment_terms: None,
                lines: vec![LineInput {
                    product_id: product.id,
                    quantity: dec!(1),
                    unit_price: dec!(10.00),
                }],
            },
        )
        .await
        .expect("Failed to issue document");

    let repo = EmailJobRepository::new(db.clone());
    let new_job = |kind| NewEmailJob {
        document_id: document.document.id,
        recipient: "ana.lopez@correo.sv".to_string(),
        subject: "Comprobante".to_string(),
        kind,
    };
    let first = repo
        .enqueue(company.id, new_job(EmailJobKind::Approval))
        .await
        .expect("Failed to enqueue");
    let second = repo
        .enqueue(company.id, new_job(EmailJobKind::Update))
        .await
        .expect("Failed to enqueue");
    assert_eq!(first.status, EmailJobStatus::Queued);
    assert_eq!(first.attempts, 0);

    let queued = repo.queued_ids().await.expect("Failed to list queued jobs");
    assert_eq!(queued, vec![first.id, second.id]);

    let failed = repo
        .mark_failed(first.id, "connection refused")
        .await
        .expect("Failed to mark failed");
    assert_eq!(failed.status, EmailJobStatus::Failed);
    assert_eq!(failed.attempts, 1);
    assert_eq!(failed.last_error.as_deref(), Some("connection refused"));

    let sent = repo.mark_sent(second.id).await.expect("Failed to mark sent");
    assert_eq!(sent.status, EmailJobStatus::Sent);
    assert!(sent.sent_at.is_some());

    assert!(repo.queued_ids().await.expect("query").is_empty());

    let other = create_company(&db).await;
    assert!(repo.find(other.id, first.id).await.expect("query").is_none());
    assert!(repo.find(company.id, first.id).await.expect("query").is_some());
}
