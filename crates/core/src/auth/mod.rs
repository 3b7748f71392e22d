//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Profile role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Role attached to a user profile.
///
/// Serialized with the Spanish names used across the product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access across every company.
    Administrador,
    /// Manages documents and resends receipts.
    Gerente,
    /// Voids documents and reads reports.
    Contador,
    /// Issues documents and registers sales.
    #[default]
    Empleado,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 4] = [
        Self::Administrador,
        Self::Gerente,
        Self::Contador,
        Self::Empleado,
    ];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Administrador => "Administrador",
            Self::Gerente => "Gerente",
            Self::Contador => "Contador",
            Self::Empleado => "Empleado",
        }
    }

    /// Parses a role name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Returns true for the administrator role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Administrador)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("Administrador"), Some(Role::Administrador));
        assert_eq!(Role::parse("administrador"), Some(Role::Administrador));
        assert_eq!(Role::parse(" contador "), Some(Role::Contador));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_role_default_is_empleado() {
        assert_eq!(Role::default(), Role::Empleado);
    }

    #[test]
    fn test_role_serde_uses_spanish_names() {
        assert_eq!(
            serde_json::to_string(&Role::Gerente).unwrap(),
            "\"Gerente\""
        );
        let role: Role = serde_json::from_str("\"Empleado\"").unwrap();
        assert_eq!(role, Role::Empleado);
    }

    #[test]
    fn test_only_administrador_is_admin() {
        for role in Role::ALL {
            assert_eq!(role.is_admin(), role == Role::Administrador);
        }
    }
}
