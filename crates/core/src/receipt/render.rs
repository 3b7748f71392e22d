//! Receipt rendering behind a trait.
//!
//! The default renderer produces an HTML receipt through Handlebars. A PDF
//! renderer can be plugged in by implementing [`ReceiptRenderer`].

use chrono_tz::Tz;
use handlebars::Handlebars;
use omnigest_shared::{EmailAttachment, types::format_money};
use serde_json::{Value, json};

use super::{ReceiptData, ReceiptError};
use crate::document::PENDING_GENERATION_CODE;
use crate::document::PENDING_RECEPTION_SEAL;

const RECEIPT_TEMPLATE: &str = include_str!("receipt.html.hbs");
const TEMPLATE_NAME: &str = "receipt";

/// A rendered receipt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReceipt {
    /// File name.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Content.
    pub bytes: Vec<u8>,
}

impl From<RenderedReceipt> for EmailAttachment {
    fn from(r: RenderedReceipt) -> Self {
        Self::new(r.filename, r.content_type, r.bytes)
    }
}

/// Renders a printable receipt.
pub trait ReceiptRenderer: Send + Sync {
    /// Renders the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&self, receipt: &ReceiptData) -> Result<RenderedReceipt, ReceiptError>;
}

/// HTML receipt rendered with Handlebars.
#[derive(Debug, Clone)]
pub struct HandlebarsReceiptRenderer {
    handlebars: Handlebars<'static>,
    tz: Tz,
}

impl HandlebarsReceiptRenderer {
    /// Creates a renderer with the built-in template, printing dates in `tz`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not compile.
    pub fn new(tz: Tz) -> Result<Self, ReceiptError> {
        Self::with_template(RECEIPT_TEMPLATE, tz)
    }

    /// Creates a renderer with a custom template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not compile.
    pub fn with_template(template: &str, tz: Tz) -> Result<Self, ReceiptError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| ReceiptError::Template(e.to_string()))?;
        Ok(Self { handlebars, tz })
    }

    fn context(&self, receipt: &ReceiptData) -> Value {
        let lines: Vec<Value> = receipt
            .lines
            .iter()
            .map(|line| {
                json!({
                    "code": line.code,
                    "description": line.description,
                    "quantity": line.quantity.normalize().to_string(),
                    "unit_price": format_money(line.unit_price),
                    "total": format_money(line.total),
                })
            })
            .collect();

        json!({
            "tipo_nombre": receipt.dte_type.display_name(),
            "numero_control": receipt.control_number,
            "fecha_emision": receipt.issued_at.with_timezone(&self.tz).format("%d/%m/%Y %H:%M").to_string(),
            "condicion_pago": receipt.payment_terms,
            "estado": receipt.status.as_str(),
            "codigo_generacion": receipt.generation_code.as_deref().unwrap_or(PENDING_GENERATION_CODE),
            "sello_recepcion": receipt.reception_seal.as_deref().unwrap_or(PENDING_RECEPTION_SEAL),
            "empresa": receipt.company,
            "cliente": receipt.client,
            "lineas": lines,
            "subtotal": format_money(receipt.totals.subtotal),
            "iva": format_money(receipt.totals.iva),
            "total": format_money(receipt.totals.total),
            "qr": receipt.qr_payload(),
        })
    }
}

impl ReceiptRenderer for HandlebarsReceiptRenderer {
    fn render(&self, receipt: &ReceiptData) -> Result<RenderedReceipt, ReceiptError> {
        let html = self
            .handlebars
            .render(TEMPLATE_NAME, &self.context(receipt))
            .map_err(|e| ReceiptError::Render(e.to_string()))?;

        Ok(RenderedReceipt {
            filename: format!("{}.html", receipt.file_stem()),
            content_type: "text/html; charset=utf-8".to_string(),
            bytes: html.into_bytes(),
        })
    }
}
