//! String-backed active enums shared by several tables.
//!
//! Values are stored as short strings so the schema stays portable between
//! Postgres and SQLite. Each enum converts to and from its domain counterpart.

use omnigest_core::{
    auth::Role,
    document::{DocumentStatus, DteType},
    inventory::MovementDirection,
    receipt::ReceiptKind,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role column of `user_profiles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProfileRole {
    /// Administrador.
    #[sea_orm(string_value = "Administrador")]
    Administrador,
    /// Gerente.
    #[sea_orm(string_value = "Gerente")]
    Gerente,
    /// Contador.
    #[sea_orm(string_value = "Contador")]
    Contador,
    /// Empleado.
    #[sea_orm(string_value = "Empleado")]
    Empleado,
}

impl From<Role> for ProfileRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Administrador => Self::Administrador,
            Role::Gerente => Self::Gerente,
            Role::Contador => Self::Contador,
            Role::Empleado => Self::Empleado,
        }
    }
}

impl From<ProfileRole> for Role {
    fn from(role: ProfileRole) -> Self {
        match role {
            ProfileRole::Administrador => Self::Administrador,
            ProfileRole::Gerente => Self::Gerente,
            ProfileRole::Contador => Self::Contador,
            ProfileRole::Empleado => Self::Empleado,
        }
    }
}

/// Type column of `documents`, stored as the two-digit DTE code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum DteCode {
    /// 01.
    #[sea_orm(string_value = "01")]
    Invoice,
    /// 03.
    #[sea_orm(string_value = "03")]
    TaxCreditVoucher,
    /// 05.
    #[sea_orm(string_value = "05")]
    CreditNote,
    /// 06.
    #[sea_orm(string_value = "06")]
    DebitNote,
    /// 07.
    #[sea_orm(string_value = "07")]
    Withholding,
    /// 11.
    #[sea_orm(string_value = "11")]
    Settlement,
}

impl From<DteType> for DteCode {
    fn from(value: DteType) -> Self {
        match value {
            DteType::Invoice => Self::Invoice,
            DteType::TaxCreditVoucher => Self::TaxCreditVoucher,
            DteType::CreditNote => Self::CreditNote,
            DteType::DebitNote => Self::DebitNote,
            DteType::Withholding => Self::Withholding,
            DteType::Settlement => Self::Settlement,
        }
    }
}

impl From<DteCode> for DteType {
    fn from(value: DteCode) -> Self {
        match value {
            DteCode::Invoice => Self::Invoice,
            DteCode::TaxCreditVoucher => Self::TaxCreditVoucher,
            DteCode::CreditNote => Self::CreditNote,
            DteCode::DebitNote => Self::DebitNote,
            DteCode::Withholding => Self::Withholding,
            DteCode::Settlement => Self::Settlement,
        }
    }
}

/// Status column of `documents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum DocumentState {
    /// Activo.
    #[sea_orm(string_value = "Activo")]
    Activo,
    /// Anulado.
    #[sea_orm(string_value = "Anulado")]
    Anulado,
}

impl From<DocumentStatus> for DocumentState {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::Activo => Self::Activo,
            DocumentStatus::Anulado => Self::Anulado,
        }
    }
}

impl From<DocumentState> for DocumentStatus {
    fn from(value: DocumentState) -> Self {
        match value {
            DocumentState::Activo => Self::Activo,
            DocumentState::Anulado => Self::Anulado,
        }
    }
}

/// Direction column of `stock_movements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum MovementKind {
    /// Entrada.
    #[sea_orm(string_value = "Entrada")]
    Entrada,
    /// Salida.
    #[sea_orm(string_value = "Salida")]
    Salida,
}

impl From<MovementDirection> for MovementKind {
    fn from(value: MovementDirection) -> Self {
        match value {
            MovementDirection::Entrada => Self::Entrada,
            MovementDirection::Salida => Self::Salida,
        }
    }
}

impl From<MovementKind> for MovementDirection {
    fn from(value: MovementKind) -> Self {
        match value {
            MovementKind::Entrada => Self::Entrada,
            MovementKind::Salida => Self::Salida,
        }
    }
}

/// Kind column of `email_jobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum EmailJobKind {
    /// Receipt sent after the authority accepted the document.
    #[sea_orm(string_value = "approval")]
    Approval,
    /// Receipt re-sent after the client data changed.
    #[sea_orm(string_value = "update")]
    Update,
}

impl From<ReceiptKind> for EmailJobKind {
    fn from(value: ReceiptKind) -> Self {
        match value {
            ReceiptKind::Approval => Self::Approval,
            ReceiptKind::Update => Self::Update,
        }
    }
}

impl From<EmailJobKind> for ReceiptKind {
    fn from(value: EmailJobKind) -> Self {
        match value {
            EmailJobKind::Approval => Self::Approval,
            EmailJobKind::Update => Self::Update,
        }
    }
}

/// Delivery status of an email job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum EmailJobStatus {
    /// Waiting for the worker.
    #[sea_orm(string_value = "queued")]
    Queued,
    /// Delivered to the SMTP server.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Delivery failed; see `last_error`.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl EmailJobStatus {
    /// Returns the stored string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dte_code_round_trips_every_type() {
        for dte in DteType::ALL {
            let code = DteCode::from(dte);
            assert_eq!(code.to_value(), dte.code());
            assert_eq!(DteType::from(code), dte);
        }
    }

    #[test]
    fn test_role_values_match_domain_names() {
        for role in Role::ALL {
            assert_eq!(ProfileRole::from(role).to_value(), role.as_str());
        }
    }

    #[test]
    fn test_email_status_values() {
        assert_eq!(EmailJobStatus::Queued.to_value(), "queued");
        assert_eq!(EmailJobStatus::Failed.as_str(), "failed");
    }
}
