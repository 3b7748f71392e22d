//! Role sets required by each operation.
//!
//! Administrators pass every check regardless of these sets.

use crate::auth::Role;

use Role::{Administrador, Contador, Empleado, Gerente};

/// Any authenticated profile.
pub const ANY: &[Role] = &Role::ALL;

/// List and view documents.
pub const VIEW_DOCUMENTS: &[Role] = &[Administrador, Contador, Empleado];

/// Issue a document or register a sale.
pub const ISSUE_DOCUMENTS: &[Role] = &[Administrador, Empleado];

/// Void a document.
pub const VOID_DOCUMENTS: &[Role] = &[Administrador, Contador];

/// Edit the client data on a document and resend the receipt.
pub const EDIT_DOCUMENT_CLIENT: &[Role] = &[Administrador, Gerente];

/// Update a document and recompute its totals.
pub const UPDATE_DOCUMENTS: &[Role] = &[Administrador, Gerente, Contador];

/// Read the sales report.
pub const SALES_REPORT: &[Role] = &[Administrador, Contador];

/// List and create clients.
pub const MANAGE_CLIENTS: &[Role] = &[Administrador, Empleado];

/// Edit a client.
pub const EDIT_CLIENTS: &[Role] = &[Administrador, Contador];

/// Delete a client.
pub const DELETE_CLIENTS: &[Role] = &[Administrador];

/// User administration.
pub const MANAGE_USERS: &[Role] = &[Administrador];

/// Register companies.
pub const MANAGE_COMPANIES: &[Role] = &[Administrador];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gerente_cannot_issue_documents() {
        assert!(!ISSUE_DOCUMENTS.contains(&Gerente));
        assert!(EDIT_DOCUMENT_CLIENT.contains(&Gerente));
        assert!(UPDATE_DOCUMENTS.contains(&Gerente));
    }

    #[test]
    fn test_admin_only_sets() {
        assert_eq!(DELETE_CLIENTS, &[Administrador]);
        assert_eq!(MANAGE_USERS, &[Administrador]);
        assert_eq!(MANAGE_COMPANIES, &[Administrador]);
    }

    #[test]
    fn test_any_covers_every_role() {
        for role in Role::ALL {
            assert!(ANY.contains(&role));
        }
    }
}
