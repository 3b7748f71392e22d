//! DTE document routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use omnigest_core::{
    access::policy,
    document::{DocumentStatus, DteType, LineInput},
    receipt::{ReceiptJson, ReceiptKind, receipt_email},
};
use omnigest_db::{
    DocumentRepository,
    entities::{clients, document_lines, documents, email_jobs},
    repositories::{
        DocumentDetail, DocumentSummary, IssueDocumentInput, NewEmailJob,
        UpdateDocumentClientInput, UpdateDocumentInput,
    },
};
use omnigest_shared::types::PageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_amount;
use crate::{
    AppState,
    access::require_company,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};

/// Creates the document router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/documents",
            get(list_documents).post(issue_document),
        )
        .route(
            "/companies/{company_id}/documents/search",
            get(search_documents),
        )
        .route(
            "/companies/{company_id}/documents/{id}",
            get(get_document).put(update_document),
        )
        .route(
            "/companies/{company_id}/documents/{id}/lines",
            post(upsert_line),
        )
        .route(
            "/companies/{company_id}/documents/{id}/void",
            post(void_document),
        )
        .route(
            "/companies/{company_id}/documents/{id}/submit",
            post(submit_document),
        )
        .route(
            "/companies/{company_id}/documents/{id}/client",
            put(update_document_client),
        )
        .route(
            "/companies/{company_id}/documents/{id}/receipt",
            get(get_receipt),
        )
}

// ============================================================================
// Payloads
// ============================================================================

/// A line in a request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineRequest {
    /// Product sold.
    pub product_id: Uuid,
    /// Quantity.
    #[validate(custom(function = "validate_amount"))]
    pub quantity: Decimal,
    /// Unit price.
    #[validate(custom(function = "validate_amount"))]
    pub unit_price: Decimal,
}

impl From<LineRequest> for LineInput {
    fn from(r: LineRequest) -> Self {
        Self {
            product_id: r.product_id,
            quantity: r.quantity,
            unit_price: r.unit_price,
        }
    }
}

/// Request body for issuing a document.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueDocumentRequest {
    /// Customer.
    pub client_id: Uuid,
    /// Two-digit type code, `01` when absent.
    #[serde(default = "default_dte_type")]
    pub dte_type: DteType,
    /// Payment terms.
    #[validate(length(min = 1, max = 50))]
    pub payment_terms: Option<String>,
    /// Lines.
    #[validate(length(min = 1), nested)]
    pub lines: Vec<LineRequest>,
}

const fn default_dte_type() -> DteType {
    DteType::Invoice
}

/// Request body for a document update.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// `Activo` or `Anulado`.
    pub status: Option<String>,
    /// Payment terms.
    #[validate(length(min = 1, max = 50))]
    pub payment_terms: Option<String>,
    /// Gross total for documents without lines.
    #[validate(custom(function = "validate_amount"))]
    pub total: Option<Decimal>,
}

/// Request body for editing the client from a document.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentClientRequest {
    /// Name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Tax id.
    #[validate(length(max = 17))]
    pub nit: Option<String>,
    /// Phone.
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// Query string of the document list.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentListQuery {
    /// Page number, 1-indexed.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Status filter.
    pub status: Option<String>,
}

/// Query string of the document search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Client name or control number fragment.
    pub q: Option<String>,
}

/// Document header.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Id.
    pub id: Uuid,
    /// Issuing company.
    pub company_id: Uuid,
    /// Customer.
    pub client_id: Uuid,
    /// Customer name, when loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Type code.
    pub dte_type: DteType,
    /// Control number.
    pub control_number: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Payment terms.
    pub payment_terms: String,
    /// Net amount.
    pub subtotal: Decimal,
    /// IVA.
    pub iva: Decimal,
    /// Gross amount.
    pub total: Decimal,
    /// Authority generation code.
    pub generation_code: Option<String>,
    /// Authority reception seal.
    pub reception_seal: Option<String>,
    /// Status.
    pub status: DocumentStatus,
}

impl From<documents::Model> for DocumentResponse {
    fn from(d: documents::Model) -> Self {
        Self {
            id: d.id,
            company_id: d.company_id,
            client_id: d.client_id,
            client_name: None,
            dte_type: d.dte_type.into(),
            control_number: d.control_number,
            issued_at: d.issued_at.with_timezone(&Utc),
            payment_terms: d.payment_terms,
            subtotal: d.subtotal,
            iva: d.iva,
            total: d.total,
            generation_code: d.generation_code,
            reception_seal: d.reception_seal,
            status: d.status.into(),
        }
    }
}

impl From<DocumentSummary> for DocumentResponse {
    fn from(s: DocumentSummary) -> Self {
        Self {
            client_name: Some(s.client_name),
            ..Self::from(s.document)
        }
    }
}

/// Document with its client and lines.
#[derive(Debug, Serialize)]
pub struct DocumentDetailResponse {
    /// Header.
    #[serde(flatten)]
    pub document: DocumentResponse,
    /// Customer.
    pub client: clients::Model,
    /// Lines.
    pub lines: Vec<document_lines::Model>,
}

impl From<DocumentDetail> for DocumentDetailResponse {
    fn from(d: DocumentDetail) -> Self {
        let mut document = DocumentResponse::from(d.document);
        document.client_name = Some(d.client.name.clone());
        Self {
            document,
            client: d.client,
            lines: d.lines,
        }
    }
}

/// Response of an edit that queues a receipt email.
#[derive(Debug, Serialize)]
pub struct QueuedEmailResponse<T> {
    /// Result of the edit.
    #[serde(flatten)]
    pub result: T,
    /// Queued email job, absent when the client has no email.
    pub email_job: Option<email_jobs::Model>,
}

/// Receipt payload with its QR text.
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    /// Receipt JSON.
    pub receipt: ReceiptJson,
    /// Text encoded in the QR code.
    pub qr_payload: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /companies/{company_id}/documents
async fn list_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<DocumentListQuery>,
) -> ApiResult<Json<PageResponse<DocumentResponse>>> {
    require_company(&state, &user, policy::VIEW_DOCUMENTS, company_id).await?;

    let status = query
        .status
        .as_deref()
        .map(DocumentStatus::parse)
        .transpose()?;
    let page = super::ListQuery {
        page: query.page,
        per_page: query.per_page,
        q: None,
    }
    .page_request(state.default_page_size);

    let (rows, total) = DocumentRepository::new(state.conn())
        .list(company_id, status, &page)
        .await
        .map_err(ApiError::database)?;
    let data = rows.into_iter().map(DocumentResponse::from).collect();
    Ok(Json(PageResponse::new(data, &page, total)))
}

/// GET /companies/{company_id}/documents/search
async fn search_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<DocumentResponse>>> {
    require_company(&state, &user, policy::VIEW_DOCUMENTS, company_id).await?;

    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let rows = DocumentRepository::new(state.conn())
        .search(company_id, term, state.recent_limit)
        .await
        .map_err(ApiError::database)?;
    Ok(Json(rows.into_iter().map(DocumentResponse::from).collect()))
}

/// POST /companies/{company_id}/documents
async fn issue_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<IssueDocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentDetailResponse>)> {
    require_company(&state, &user, policy::ISSUE_DOCUMENTS, company_id).await?;
    payload.validate()?;

    let detail = DocumentRepository::new(state.conn())
        .issue(
            company_id,
            IssueDocumentInput {
                client_id: payload.client_id,
                dte_type: payload.dte_type,
                payment_terms: payload.payment_terms,
                lines: payload.lines.into_iter().map(LineInput::from).collect(),
            },
        )
        .await?;

    tracing::info!(
        document_id = %detail.document.id,
        control_number = %detail.document.control_number,
        "Document issued"
    );
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// GET /companies/{company_id}/documents/{id}
async fn get_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DocumentDetailResponse>> {
    require_company(&state, &user, policy::VIEW_DOCUMENTS, company_id).await?;

    DocumentRepository::new(state.conn())
        .find(company_id, id)
        .await
        .map_err(ApiError::database)?
        .map(|d| Json(d.into()))
        .ok_or_else(|| ApiError::not_found("Document"))
}

/// PUT /companies/{company_id}/documents/{id}
async fn update_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> ApiResult<Json<DocumentDetailResponse>> {
    require_company(&state, &user, policy::UPDATE_DOCUMENTS, company_id).await?;
    payload.validate()?;

    let status = payload
        .status
        .as_deref()
        .map(DocumentStatus::parse)
        .transpose()?;
    let detail = DocumentRepository::new(state.conn())
        .update(
            company_id,
            id,
            UpdateDocumentInput {
                status,
                payment_terms: payload.payment_terms,
                total: payload.total,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

/// POST /companies/{company_id}/documents/{id}/lines
///
/// Adds a line, or replaces the line for the same product.
async fn upsert_line(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LineRequest>,
) -> ApiResult<Json<DocumentDetailResponse>> {
    require_company(&state, &user, policy::ISSUE_DOCUMENTS, company_id).await?;
    payload.validate()?;

    let detail = DocumentRepository::new(state.conn())
        .upsert_line(company_id, id, payload.into())
        .await?;
    Ok(Json(detail.into()))
}

/// POST /companies/{company_id}/documents/{id}/void
async fn void_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DocumentResponse>> {
    require_company(&state, &user, policy::VOID_DOCUMENTS, company_id).await?;

    let document = DocumentRepository::new(state.conn())
        .void(company_id, id)
        .await?;
    tracing::info!(document_id = %id, "Document voided");
    Ok(Json(document.into()))
}

/// POST /companies/{company_id}/documents/{id}/submit
///
/// Transmits the document and queues the approval receipt.
async fn submit_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<QueuedEmailResponse<DocumentResponse>>> {
    require_company(&state, &user, policy::ISSUE_DOCUMENTS, company_id).await?;

    let repo = DocumentRepository::new(state.conn());
    repo.submit(company_id, id, state.authority.as_ref()).await?;
    let detail = repo
        .find(company_id, id)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Document"))?;

    let email_job = queue_receipt(&state, company_id, &detail, ReceiptKind::Approval).await?;
    let mut document = DocumentResponse::from(detail.document);
    document.client_name = Some(detail.client.name);

    Ok(Json(QueuedEmailResponse {
        result: document,
        email_job,
    }))
}

/// PUT /companies/{company_id}/documents/{id}/client
///
/// Edits the client contact fields and resends the receipt.
async fn update_document_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateDocumentClientRequest>,
) -> ApiResult<Json<QueuedEmailResponse<DocumentDetailResponse>>> {
    require_company(&state, &user, policy::EDIT_DOCUMENT_CLIENT, company_id).await?;
    payload.validate()?;

    let detail = DocumentRepository::new(state.conn())
        .update_client(
            company_id,
            id,
            UpdateDocumentClientInput {
                name: payload.name,
                email: payload.email,
                address: payload.address,
                nit: payload.nit,
                phone: payload.phone,
            },
        )
        .await?;

    let email_job = queue_receipt(&state, company_id, &detail, ReceiptKind::Update).await?;
    Ok(Json(QueuedEmailResponse {
        result: detail.into(),
        email_job,
    }))
}

/// GET /companies/{company_id}/documents/{id}/receipt
async fn get_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ReceiptResponse>> {
    require_company(&state, &user, policy::VIEW_DOCUMENTS, company_id).await?;

    let receipt = DocumentRepository::new(state.conn())
        .receipt_data(company_id, id)
        .await?;
    Ok(Json(ReceiptResponse {
        receipt: receipt.to_json(state.timezone),
        qr_payload: receipt.qr_payload(),
    }))
}

/// Queues a receipt email when the client has an address.
async fn queue_receipt(
    state: &AppState,
    company_id: Uuid,
    detail: &DocumentDetail,
    kind: ReceiptKind,
) -> Result<Option<email_jobs::Model>, ApiError> {
    let Some(recipient) = detail
        .client
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    else {
        tracing::debug!(document_id = %detail.document.id, "Client has no email, receipt not sent");
        return Ok(None);
    };

    let message = receipt_email(kind, &detail.client.name, detail.document.dte_type.into());
    let job = state
        .email_queue
        .enqueue(
            state.db.as_ref(),
            company_id,
            NewEmailJob {
                document_id: detail.document.id,
                recipient: recipient.to_string(),
                subject: message.subject,
                kind: kind.into(),
            },
        )
        .await
        .map_err(ApiError::database)?;
    Ok(Some(job))
}
