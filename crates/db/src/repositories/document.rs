//! Document ledger repository.
//!
//! Every write that touches lines recomputes the document totals in the same
//! transaction, so `subtotal`, `iva` and `total` always derive from the
//! persisted lines.

use std::collections::HashSet;

use chrono::Utc;
use omnigest_core::{
    authority::{AuthorityError, Submission, TaxAuthority},
    document::{
        DEFAULT_PAYMENT_TERMS, DocumentError, DocumentStatus, DocumentTotals, DteType, LineInput,
        PENDING_GENERATION_CODE, PricedLine, price_lines, totals_for_update,
    },
    receipt::{ReceiptClient, ReceiptCompany, ReceiptData, ReceiptLine},
    sequence::{MAX_GENERATION_ATTEMPTS, generate_control_number},
};
use omnigest_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{is_unique_violation, like_pattern, lower, now};
use crate::entities::{
    clients, companies, document_lines,
    documents::{self, Column as Doc},
    enums::{DocumentState, DteCode},
    products,
};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentRepoError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Client not found in the company.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Product not found in the company.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// The same product appears on two lines of one request.
    #[error("Product {0} appears on more than one line")]
    DuplicateProduct(Uuid),

    /// The authority already accepted the document.
    #[error("Document was already submitted to the tax authority")]
    AlreadySubmitted,

    /// Every generated control number collided.
    #[error("Could not generate a unique control number, please retry")]
    ControlNumberExhausted,

    /// Document rule violated.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Tax authority failure.
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DocumentRepoError> for AppError {
    fn from(err: DocumentRepoError) -> Self {
        match err {
            DocumentRepoError::NotFound(_)
            | DocumentRepoError::ClientNotFound(_)
            | DocumentRepoError::ProductNotFound(_)
            | DocumentRepoError::CompanyNotFound(_) => Self::NotFound(err.to_string()),
            DocumentRepoError::DuplicateProduct(_) => Self::Validation(err.to_string()),
            DocumentRepoError::AlreadySubmitted | DocumentRepoError::ControlNumberExhausted => {
                Self::Conflict(err.to_string())
            }
            DocumentRepoError::Document(e) => e.into(),
            DocumentRepoError::Authority(e) => e.into(),
            DocumentRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for issuing a document.
#[derive(Debug, Clone)]
pub struct IssueDocumentInput {
    /// Customer.
    pub client_id: Uuid,
    /// DTE type.
    pub dte_type: DteType,
    /// Payment terms, `Contado` when absent.
    pub payment_terms: Option<String>,
    /// Lines, at least one.
    pub lines: Vec<LineInput>,
}

/// Patch applied by a document update.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentInput {
    /// New status; `Activo` reactivates a voided document.
    pub status: Option<DocumentStatus>,
    /// New payment terms.
    pub payment_terms: Option<String>,
    /// Gross total, used only when the document has no lines.
    pub total: Option<Decimal>,
}

/// Client contact fields edited from a document.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentClientInput {
    /// Name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Tax id.
    pub nit: Option<String>,
    /// Phone.
    pub phone: Option<String>,
}

/// A document with its client and lines.
#[derive(Debug, Clone)]
pub struct DocumentDetail {
    /// Document row.
    pub document: documents::Model,
    /// Client row.
    pub client: clients::Model,
    /// Lines in insertion order.
    pub lines: Vec<document_lines::Model>,
}

/// A document row with its client name, for lists.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    /// Document row.
    pub document: documents::Model,
    /// Client name.
    pub client_name: String,
}

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a document with its lines.
    ///
    /// The document, its lines and the recomputed totals commit together. A
    /// control number collision restarts the transaction with a fresh number.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid lines, unknown client or products, or when
    /// no unique control number could be generated.
    pub async fn issue(
        &self,
        company_id: Uuid,
        input: IssueDocumentInput,
    ) -> Result<DocumentDetail, DocumentRepoError> {
        let (lines, _) = price_lines(&input.lines)?;
        let mut seen = HashSet::new();
        if let Some(line) = lines.iter().find(|l| !seen.insert(l.product_id)) {
            return Err(DocumentRepoError::DuplicateProduct(line.product_id));
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let control_number = generate_control_number(input.dte_type);
            match self
                .try_issue(company_id, &input, &lines, &control_number)
                .await
            {
                Err(DocumentRepoError::Database(e)) if is_unique_violation(&e) => {
                    tracing::warn!(attempt, control_number = %control_number, "Control number collision, regenerating");
                }
                result => return result,
            }
        }

        Err(DocumentRepoError::ControlNumberExhausted)
    }

    async fn try_issue(
        &self,
        company_id: Uuid,
        input: &IssueDocumentInput,
        lines: &[PricedLine],
        control_number: &str,
    ) -> Result<DocumentDetail, DocumentRepoError> {
        let txn = self.db.begin().await?;

        let client = super::client::find_in(&txn, company_id, input.client_id)
            .await?
            .ok_or(DocumentRepoError::ClientNotFound(input.client_id))?;
        for line in lines {
            if super::product::find_in(&txn, company_id, line.product_id)
                .await?
                .is_none()
            {
                return Err(DocumentRepoError::ProductNotFound(line.product_id));
            }
        }

        let document = insert_document_in(
            &txn,
            company_id,
            client.id,
            input.dte_type,
            input.payment_terms.as_deref(),
            control_number,
        )
        .await?;

        let mut saved = Vec::with_capacity(lines.len());
        for line in lines {
            saved.push(upsert_line_in(&txn, document.id, line).await?);
        }
        let document = recompute_in::<_, DocumentRepoError>(&txn, document).await?;

        txn.commit().await?;

        tracing::info!(
            document_id = %document.id,
            control_number = %document.control_number,
            total = %document.total,
            "Document issued"
        );
        Ok(DocumentDetail {
            document,
            client,
            lines: saved,
        })
    }

    /// Saves a line and recomputes the document in one transaction.
    ///
    /// A line for a product already on the document is replaced.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Voided` for voided documents, or a line error.
    pub async fn upsert_line(
        &self,
        company_id: Uuid,
        document_id: Uuid,
        line: LineInput,
    ) -> Result<DocumentDetail, DocumentRepoError> {
        let priced = PricedLine::price(line)?;
        let txn = self.db.begin().await?;

        let document = claim_editable_in(&txn, company_id, document_id).await?;
        if super::product::find_in(&txn, company_id, line.product_id)
            .await?
            .is_none()
        {
            return Err(DocumentRepoError::ProductNotFound(line.product_id));
        }

        upsert_line_in(&txn, document.id, &priced).await?;
        let document = recompute_in::<_, DocumentRepoError>(&txn, document).await?;
        let detail = load_detail_in(&txn, document).await?;

        txn.commit().await?;
        Ok(detail)
    }

    /// Recomputes the totals of a document from its lines.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::NotFound` if the document does not exist.
    pub async fn recompute(
        &self,
        company_id: Uuid,
        document_id: Uuid,
    ) -> Result<documents::Model, DocumentRepoError> {
        let txn = self.db.begin().await?;
        let document = find_in(&txn, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        let document = recompute_in::<_, DocumentRepoError>(&txn, document).await?;
        txn.commit().await?;
        Ok(document)
    }

    /// Voids a document.
    ///
    /// The status flips only while the row is still `Activo`, so of two
    /// concurrent voids exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AlreadyVoided` for a voided document.
    pub async fn void(
        &self,
        company_id: Uuid,
        document_id: Uuid,
    ) -> Result<documents::Model, DocumentRepoError> {
        let document = find_in(&self.db, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        let status = DocumentStatus::from(document.status).void()?;

        let voided = documents::Entity::update_many()
            .col_expr(Doc::Status, Expr::value(DocumentState::from(status)))
            .col_expr(Doc::UpdatedAt, Expr::value(now()))
            .filter(Doc::Id.eq(document.id))
            .filter(Doc::CompanyId.eq(company_id))
            .filter(Doc::Status.eq(DocumentState::Activo))
            .exec(&self.db)
            .await?;
        if voided.rows_affected == 0 {
            return Err(DocumentError::AlreadyVoided.into());
        }

        let document = find_in(&self.db, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        tracing::info!(document_id = %document.id, "Document voided");
        Ok(document)
    }

    /// Applies a status / payment terms patch and recomputes the totals.
    ///
    /// With lines the totals derive from them; without lines the supplied
    /// gross total (or the current one) is split by the IVA factor.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NegativeTotal` for a negative gross total.
    pub async fn update(
        &self,
        company_id: Uuid,
        document_id: Uuid,
        input: UpdateDocumentInput,
    ) -> Result<DocumentDetail, DocumentRepoError> {
        let txn = self.db.begin().await?;

        let document = find_in(&txn, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        let line_totals = line_totals_in(&txn, document.id).await?;
        let totals = totals_for_update(&line_totals, input.total, document.total)?;

        let mut active: documents::ActiveModel = document.into();
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        if let Some(terms) = input.payment_terms.filter(|t| !t.trim().is_empty()) {
            active.payment_terms = Set(terms);
        }
        active.subtotal = Set(totals.subtotal);
        active.iva = Set(totals.iva);
        active.total = Set(totals.total);
        active.updated_at = Set(now());
        let document = active.update(&txn).await?;
        let detail = load_detail_in(&txn, document).await?;

        txn.commit().await?;
        Ok(detail)
    }

    /// Edits the contact data of the document's client.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Voided` for voided documents.
    pub async fn update_client(
        &self,
        company_id: Uuid,
        document_id: Uuid,
        input: UpdateDocumentClientInput,
    ) -> Result<DocumentDetail, DocumentRepoError> {
        let txn = self.db.begin().await?;

        let document = claim_editable_in(&txn, company_id, document_id).await?;
        let client = super::client::find_in(&txn, company_id, document.client_id)
            .await?
            .ok_or(DocumentRepoError::ClientNotFound(document.client_id))?;

        let mut active: clients::ActiveModel = client.into();
        if let Some(name) = input.name.filter(|n| !n.trim().is_empty()) {
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(nit) = input.nit {
            active.nit = Set(Some(nit));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        active.updated_at = Set(now());
        active.update(&txn).await?;

        let detail = load_detail_in(&txn, document).await?;
        txn.commit().await?;
        Ok(detail)
    }

    /// Submits a document to the tax authority and stores the assigned codes.
    ///
    /// The codes are written only while the document is active and unsealed.
    /// When a concurrent submission sealed it first, this call's acceptance is
    /// discarded and `AlreadySubmitted` is returned.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::AlreadySubmitted` when a reception seal is
    /// present, or the authority's error.
    pub async fn submit(
        &self,
        company_id: Uuid,
        document_id: Uuid,
        authority: &dyn TaxAuthority,
    ) -> Result<documents::Model, DocumentRepoError> {
        let document = find_in(&self.db, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        DocumentStatus::from(document.status).ensure_editable()?;
        if document.reception_seal.is_some() {
            return Err(DocumentRepoError::AlreadySubmitted);
        }
        let company = companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(DocumentRepoError::CompanyNotFound(company_id))?;

        let acceptance = authority
            .submit(&Submission {
                company_nit: company.nit,
                dte_type: document.dte_type.into(),
                control_number: document.control_number.clone(),
                total: document.total,
            })
            .await?;

        let sealed = documents::Entity::update_many()
            .col_expr(Doc::GenerationCode, Expr::value(acceptance.generation_code))
            .col_expr(Doc::ReceptionSeal, Expr::value(acceptance.reception_seal))
            .col_expr(Doc::UpdatedAt, Expr::value(now()))
            .filter(Doc::Id.eq(document.id))
            .filter(Doc::CompanyId.eq(company_id))
            .filter(Doc::Status.eq(DocumentState::Activo))
            .filter(Doc::ReceptionSeal.is_null())
            .exec(&self.db)
            .await?;

        let document = find_in(&self.db, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        if sealed.rows_affected == 0 {
            DocumentStatus::from(document.status).ensure_editable()?;
            tracing::warn!(document_id = %document.id, "Duplicate submission discarded");
            return Err(DocumentRepoError::AlreadySubmitted);
        }

        tracing::info!(
            document_id = %document.id,
            control_number = %document.control_number,
            "Document accepted by the tax authority"
        );
        Ok(document)
    }

    /// Finds a document with its client and lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        company_id: Uuid,
        document_id: Uuid,
    ) -> Result<Option<DocumentDetail>, DbErr> {
        match find_in(&self.db, company_id, document_id).await? {
            Some(document) => load_detail_in(&self.db, document).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists documents, newest first, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        status: Option<DocumentStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<DocumentSummary>, u64), DbErr> {
        let mut query = documents::Entity::find().filter(Doc::CompanyId.eq(company_id));
        if let Some(status) = status {
            query = query.filter(Doc::Status.eq(DocumentState::from(status)));
        }

        let paginator = query
            .find_also_related(clients::Entity)
            .order_by_desc(Doc::IssuedAt)
            .order_by_desc(Doc::Id)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;

        Ok((rows.into_iter().map(summary).collect(), total))
    }

    /// Case-insensitive search on client name or control number, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(
        &self,
        company_id: Uuid,
        term: &str,
        limit: u64,
    ) -> Result<Vec<DocumentSummary>, DbErr> {
        let pattern = like_pattern(term);
        let rows = documents::Entity::find()
            .find_also_related(clients::Entity)
            .filter(Doc::CompanyId.eq(company_id))
            .filter(
                Condition::any()
                    .add(lower((clients::Entity, clients::Column::Name)).like(pattern.as_str()))
                    .add(lower((documents::Entity, Doc::ControlNumber)).like(pattern.as_str())),
            )
            .order_by_desc(Doc::IssuedAt)
            .order_by_desc(Doc::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(summary).collect())
    }

    /// Assembles the data printed on a receipt.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::NotFound` if the document does not exist.
    pub async fn receipt_data(
        &self,
        company_id: Uuid,
        document_id: Uuid,
    ) -> Result<ReceiptData, DocumentRepoError> {
        let document = find_in(&self.db, company_id, document_id)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))?;
        let company = companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(DocumentRepoError::CompanyNotFound(company_id))?;
        let client = clients::Entity::find_by_id(document.client_id)
            .one(&self.db)
            .await?
            .ok_or(DocumentRepoError::ClientNotFound(document.client_id))?;
        let lines = document_lines::Entity::find()
            .filter(document_lines::Column::DocumentId.eq(document.id))
            .find_also_related(products::Entity)
            .order_by_asc(document_lines::Column::CreatedAt)
            .order_by_asc(document_lines::Column::Id)
            .all(&self.db)
            .await?;

        Ok(ReceiptData {
            dte_type: document.dte_type.into(),
            control_number: document.control_number,
            issued_at: document.issued_at.with_timezone(&Utc),
            payment_terms: document.payment_terms,
            status: document.status.into(),
            company: ReceiptCompany {
                name: company.name,
                nit: company.nit,
                nrc: company.nrc,
                address: company.address,
                phone: company.phone,
                email: company.email,
            },
            client: ReceiptClient {
                name: client.name,
                nit: client.nit,
                address: client.address,
                email: client.email,
            },
            lines: lines
                .into_iter()
                .map(|(line, product)| {
                    let (code, description) = product
                        .map(|p| (p.code, p.description))
                        .unwrap_or_default();
                    ReceiptLine {
                        code,
                        description,
                        quantity: line.quantity,
                        unit_price: line.unit_price,
                        total: line.total,
                    }
                })
                .collect(),
            totals: DocumentTotals {
                subtotal: document.subtotal,
                iva: document.iva,
                total: document.total,
            },
            generation_code: document.generation_code,
            reception_seal: document.reception_seal,
        })
    }
}

fn summary((document, client): (documents::Model, Option<clients::Model>)) -> DocumentSummary {
    DocumentSummary {
        client_name: client.map(|c| c.name).unwrap_or_default(),
        document,
    }
}

/// Finds a document scoped to its company.
pub(crate) async fn find_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    id: Uuid,
) -> Result<Option<documents::Model>, DbErr> {
    documents::Entity::find_by_id(id)
        .filter(Doc::CompanyId.eq(company_id))
        .one(conn)
        .await
}

/// Re-reads an active document after touching its row inside `conn`.
///
/// The conditional touch is the first write of the transaction, so a
/// concurrent void either waits for it or has already committed and the
/// document comes back `Voided`.
async fn claim_editable_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    id: Uuid,
) -> Result<documents::Model, DocumentRepoError> {
    let touched = documents::Entity::update_many()
        .col_expr(Doc::UpdatedAt, Expr::value(now()))
        .filter(Doc::Id.eq(id))
        .filter(Doc::CompanyId.eq(company_id))
        .filter(Doc::Status.eq(DocumentState::Activo))
        .exec(conn)
        .await?;

    let document = find_in(conn, company_id, id)
        .await?
        .ok_or(DocumentRepoError::NotFound(id))?;
    if touched.rows_affected == 0 {
        return Err(DocumentError::Voided.into());
    }
    Ok(document)
}

/// Inserts an active document with zero totals and the pending generation code.
pub(crate) async fn insert_document_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    client_id: Uuid,
    dte_type: DteType,
    payment_terms: Option<&str>,
    control_number: &str,
) -> Result<documents::Model, DbErr> {
    let now = now();
    let zero = DocumentTotals::zero();
    documents::ActiveModel {
        id: Set(Uuid::now_v7()),
        company_id: Set(company_id),
        client_id: Set(client_id),
        dte_type: Set(DteCode::from(dte_type)),
        control_number: Set(control_number.to_string()),
        issued_at: Set(now),
        payment_terms: Set(payment_terms
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_PAYMENT_TERMS)
            .to_string()),
        subtotal: Set(zero.subtotal),
        iva: Set(zero.iva),
        total: Set(zero.total),
        generation_code: Set(Some(PENDING_GENERATION_CODE.to_string())),
        reception_seal: Set(None),
        status: Set(DocumentState::Activo),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Inserts a line, or replaces the line already holding the same product.
pub(crate) async fn upsert_line_in<C: ConnectionTrait>(
    conn: &C,
    document_id: Uuid,
    line: &PricedLine,
) -> Result<document_lines::Model, DbErr> {
    let existing = document_lines::Entity::find()
        .filter(document_lines::Column::DocumentId.eq(document_id))
        .filter(document_lines::Column::ProductId.eq(line.product_id))
        .one(conn)
        .await?;

    let now = now();
    if let Some(existing) = existing {
        let mut active: document_lines::ActiveModel = existing.into();
        active.quantity = Set(line.quantity);
        active.unit_price = Set(line.unit_price);
        active.total = Set(line.total);
        active.updated_at = Set(now);
        return active.update(conn).await;
    }

    document_lines::ActiveModel {
        id: Set(Uuid::now_v7()),
        document_id: Set(document_id),
        product_id: Set(line.product_id),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        total: Set(line.total),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

async fn line_totals_in<C: ConnectionTrait>(
    conn: &C,
    document_id: Uuid,
) -> Result<Vec<Decimal>, DbErr> {
    document_lines::Entity::find()
        .select_only()
        .column(document_lines::Column::Total)
        .filter(document_lines::Column::DocumentId.eq(document_id))
        .into_tuple()
        .all(conn)
        .await
}

/// Recomputes subtotal, IVA and total from the persisted lines.
pub(crate) async fn recompute_in<C, E>(conn: &C, document: documents::Model) -> Result<documents::Model, E>
where
    C: ConnectionTrait,
    E: From<DbErr> + From<DocumentError>,
{
    let totals = DocumentTotals::from_line_totals(line_totals_in(conn, document.id).await?)?;

    let mut active: documents::ActiveModel = document.into();
    active.subtotal = Set(totals.subtotal);
    active.iva = Set(totals.iva);
    active.total = Set(totals.total);
    active.updated_at = Set(now());
    Ok(active.update(conn).await?)
}

async fn load_detail_in<C: ConnectionTrait>(
    conn: &C,
    document: documents::Model,
) -> Result<DocumentDetail, DbErr> {
    let client = clients::Entity::find_by_id(document.client_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("client {}", document.client_id)))?;
    let lines = document_lines::Entity::find()
        .filter(document_lines::Column::DocumentId.eq(document.id))
        .order_by_asc(document_lines::Column::CreatedAt)
        .order_by_asc(document_lines::Column::Id)
        .all(conn)
        .await?;

    Ok(DocumentDetail {
        document,
        client,
        lines,
    })
}
