//! Receipt payloads sent to customers: the JSON document, the QR payload,
//! the email text and the rendered receipt.

pub mod render;

pub use render::{HandlebarsReceiptRenderer, ReceiptRenderer, RenderedReceipt};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use omnigest_shared::{AppError, EmailAttachment, types::format_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{DocumentStatus, DocumentTotals, DteType};

/// Errors from building or rendering receipts.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Template failed to compile.
    #[error("Invalid receipt template: {0}")]
    Template(String),

    /// Rendering failed.
    #[error("Failed to render receipt: {0}")]
    Render(String),

    /// JSON serialization failed.
    #[error("Failed to serialize receipt: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Why a receipt email is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    /// The authority approved a newly issued document.
    Approval,
    /// The document was edited and is being resent.
    Update,
}

impl ReceiptKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approval => "approval",
            Self::Update => "update",
        }
    }

    /// Parses a kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approval" => Some(Self::Approval),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

/// Issuing company as printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptCompany {
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
}

/// Client as printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptClient {
    /// Name.
    pub name: String,
    /// Tax id.
    pub nit: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Email.
    pub email: Option<String>,
}

/// A printed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    /// Product code.
    pub code: String,
    /// Product description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Line total.
    pub total: Decimal,
}

/// Everything needed to print or send a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptData {
    /// DTE type.
    pub dte_type: DteType,
    /// Control number.
    pub control_number: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Payment terms.
    pub payment_terms: String,
    /// Status.
    pub status: DocumentStatus,
    /// Issuer.
    pub company: ReceiptCompany,
    /// Customer.
    pub client: ReceiptClient,
    /// Lines.
    pub lines: Vec<ReceiptLine>,
    /// Totals.
    pub totals: DocumentTotals,
    /// Generation code assigned by the authority.
    pub generation_code: Option<String>,
    /// Reception seal assigned by the authority.
    pub reception_seal: Option<String>,
}

/// JSON document attached to receipt emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptJson {
    /// DTE type code.
    pub tipo_dte: String,
    /// Control number.
    pub numero_control: String,
    /// Client name.
    pub cliente: String,
    /// Client email.
    pub correo: String,
    /// Issuance date, `YYYY-MM-DD` local.
    pub fecha_emision: String,
    /// Subtotal.
    pub subtotal: String,
    /// IVA.
    pub iva: String,
    /// Total.
    pub total: String,
    /// Generation code.
    pub codigo_generacion: Option<String>,
    /// Reception seal.
    pub sello_recepcion: Option<String>,
}

impl ReceiptData {
    /// Builds the JSON payload with dates in `tz`.
    #[must_use]
    pub fn to_json(&self, tz: Tz) -> ReceiptJson {
        ReceiptJson {
            tipo_dte: self.dte_type.code().to_string(),
            numero_control: self.control_number.clone(),
            cliente: self.client.name.clone(),
            correo: self.client.email.clone().unwrap_or_default(),
            fecha_emision: self.issued_at.with_timezone(&tz).format("%Y-%m-%d").to_string(),
            subtotal: format_money(self.totals.subtotal),
            iva: format_money(self.totals.iva),
            total: format_money(self.totals.total),
            codigo_generacion: self.generation_code.clone(),
            sello_recepcion: self.reception_seal.clone(),
        }
    }

    /// Payload encoded in the receipt QR code.
    #[must_use]
    pub fn qr_payload(&self) -> String {
        qr_payload(
            &self.control_number,
            &self.company.nit,
            self.client.nit.as_deref().unwrap_or_default(),
            self.totals.total,
        )
    }

    /// File stem used for attachments.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("DTE_{}", self.control_number)
    }

    /// Pretty-printed JSON attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json_attachment(&self, tz: Tz) -> Result<EmailAttachment, ReceiptError> {
        let bytes = serde_json::to_vec_pretty(&self.to_json(tz))?;
        Ok(EmailAttachment::new(
            format!("{}.json", self.file_stem()),
            "application/json",
            bytes,
        ))
    }
}

/// `"{control}|{company NIT}|{client NIT}|{total:.2}"`.
#[must_use]
pub fn qr_payload(control_number: &str, company_nit: &str, client_nit: &str, total: Decimal) -> String {
    format!(
        "{control_number}|{company_nit}|{client_nit}|{}",
        format_money(total)
    )
}

/// Subject and body of a receipt email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Composes the receipt email for a client.
#[must_use]
pub fn receipt_email(kind: ReceiptKind, client_name: &str, dte_type: DteType) -> ReceiptEmail {
    match kind {
        ReceiptKind::Approval => ReceiptEmail {
            subject: "Comprobante Electrónico Aprobado - OMNIGEST".to_string(),
            body: format!(
                "Estimado {client_name},\n\n\
                 Su documento electrónico tipo {} ha sido aprobado por el Ministerio de Hacienda.\n\n\
                 Adjunto encontrará su comprobante y el documento en formato JSON.\n\n\
                 Saludos cordiales,\nEquipo OMNIGEST",
                dte_type.display_name()
            ),
        },
        ReceiptKind::Update => ReceiptEmail {
            subject: "DTE Actualizado y Aprobado - OMNIGEST".to_string(),
            body: format!(
                "Estimado {client_name},\n\n\
                 Su documento electrónico ha sido actualizado y aprobado por el Ministerio de Hacienda.\n\n\
                 Adjunto encontrará su comprobante actualizado y el documento en formato JSON.\n\n\
                 Saludos,\nEquipo OMNIGEST"
            ),
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::El_Salvador;

    #[test]
    fn test_json_payload() {
        let json = fixtures::receipt().to_json(El_Salvador);
        assert_eq!(json.tipo_dte, "01");
        assert_eq!(json.fecha_emision, "2025-11-13");
        assert_eq!(json.subtotal, "25.00");
        assert_eq!(json.iva, "3.25");
        assert_eq!(json.total, "28.25");
        assert_eq!(json.correo, "ana@example.com");

        let value = serde_json::to_value(&json).unwrap();
        for key in [
            "tipo_dte",
            "numero_control",
            "cliente",
            "correo",
            "fecha_emision",
            "subtotal",
            "iva",
            "total",
            "codigo_generacion",
            "sello_recepcion",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_qr_payload() {
        assert_eq!(
            fixtures::receipt().qr_payload(),
            "DTE-01-9F3A2B7C|0614-240325-001-1|0614-010190-101-2|28.25"
        );
    }

    #[test]
    fn test_json_attachment() {
        let attachment = fixtures::receipt().json_attachment(El_Salvador).unwrap();
        assert_eq!(attachment.filename, "DTE_DTE-01-9F3A2B7C.json");
        assert_eq!(attachment.content_type, "application/json");
        let parsed: ReceiptJson = serde_json::from_slice(&attachment.bytes).unwrap();
        assert_eq!(parsed.numero_control, "DTE-01-9F3A2B7C");
    }

    #[test]
    fn test_receipt_email_text() {
        let approval = receipt_email(ReceiptKind::Approval, "Ana López", DteType::Invoice);
        assert!(approval.subject.contains("Aprobado"));
        assert!(approval.body.starts_with("Estimado Ana López,"));
        assert!(approval.body.contains("tipo Factura"));

        let update = receipt_email(ReceiptKind::Update, "Ana López", DteType::Invoice);
        assert!(update.subject.starts_with("DTE Actualizado"));
    }

    #[test]
    fn test_receipt_kind_parse() {
        assert_eq!(ReceiptKind::parse("update"), Some(ReceiptKind::Update));
        assert_eq!(ReceiptKind::parse(ReceiptKind::Approval.as_str()), Some(ReceiptKind::Approval));
        assert_eq!(ReceiptKind::parse("pdf"), None);
    }
}
