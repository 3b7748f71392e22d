//! Document (DTE) domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DocumentError;

/// Kind of tax document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DteType {
    /// 01 - Factura.
    #[serde(rename = "01")]
    Invoice,
    /// 03 - Comprobante de Crédito Fiscal.
    #[serde(rename = "03")]
    TaxCreditVoucher,
    /// 05 - Nota de Crédito.
    #[serde(rename = "05")]
    CreditNote,
    /// 06 - Nota de Débito.
    #[serde(rename = "06")]
    DebitNote,
    /// 07 - Comprobante de Retención.
    #[serde(rename = "07")]
    Withholding,
    /// 11 - Comprobante de Liquidación.
    #[serde(rename = "11")]
    Settlement,
}

impl DteType {
    /// All document types.
    pub const ALL: [Self; 6] = [
        Self::Invoice,
        Self::TaxCreditVoucher,
        Self::CreditNote,
        Self::DebitNote,
        Self::Withholding,
        Self::Settlement,
    ];

    /// Two-digit type code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "01",
            Self::TaxCreditVoucher => "03",
            Self::CreditNote => "05",
            Self::DebitNote => "06",
            Self::Withholding => "07",
            Self::Settlement => "11",
        }
    }

    /// Display name printed on receipts.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Invoice => "Factura",
            Self::TaxCreditVoucher => "Comprobante de Crédito Fiscal",
            Self::CreditNote => "Nota de Crédito",
            Self::DebitNote => "Nota de Débito",
            Self::Withholding => "Comprobante de Retención",
            Self::Settlement => "Comprobante de Liquidación",
        }
    }

    /// Parses a two-digit type code.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::UnknownType` for codes outside the enumeration.
    pub fn from_code(code: &str) -> Result<Self, DocumentError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| DocumentError::UnknownType(code.to_string()))
    }
}

impl fmt::Display for DteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle status of a document.
///
/// - Activo → Anulado (void)
/// - Anulado → Activo (reactivation through an explicit update)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Document is in force.
    #[default]
    Activo,
    /// Document was voided (soft delete).
    Anulado,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Anulado => "Anulado",
        }
    }

    /// Parses a status name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::UnknownStatus` for anything else.
    pub fn parse(s: &str) -> Result<Self, DocumentError> {
        match s.trim().to_lowercase().as_str() {
            "activo" => Ok(Self::Activo),
            "anulado" => Ok(Self::Anulado),
            _ => Err(DocumentError::UnknownStatus(s.to_string())),
        }
    }

    /// Returns true if lines may still be added or changed.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Activo)
    }

    /// Fails with `DocumentError::Voided` unless the document is active.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Voided` for voided documents.
    pub const fn ensure_editable(&self) -> Result<(), DocumentError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(DocumentError::Voided)
        }
    }

    /// Transition to `Anulado`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AlreadyVoided` if the document is already voided.
    pub const fn void(self) -> Result<Self, DocumentError> {
        match self {
            Self::Activo => Ok(Self::Anulado),
            Self::Anulado => Err(DocumentError::AlreadyVoided),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default payment terms on new documents.
pub const DEFAULT_PAYMENT_TERMS: &str = "Contado";

/// Placeholder generation code shown until the authority assigns one.
pub const PENDING_GENERATION_CODE: &str = "(Asignado por MH)";

/// Placeholder reception seal shown until the authority assigns one.
pub const PENDING_RECEPTION_SEAL: &str = "(Pendiente)";
