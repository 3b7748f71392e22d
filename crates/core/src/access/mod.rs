//! Access guard: role and tenant checks evaluated before every operation.
//!
//! `authorize` returns a typed [`AccessDecision`] instead of redirecting, so the
//! policy can be tested on its own and composed at the top of each handler.

pub mod policy;

#[cfg(test)]
mod access_props;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;

/// Profile attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Role assigned to the profile.
    pub role: Role,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
}

/// Caller identity as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Authenticated user.
    pub user_id: Uuid,
    /// Profile, when one exists.
    pub profile: Option<Profile>,
}

impl Principal {
    /// Creates a principal with a profile.
    #[must_use]
    pub const fn with_profile(user_id: Uuid, role: Role, company_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            profile: Some(Profile { role, company_id }),
        }
    }

    /// Creates a principal without a profile.
    #[must_use]
    pub const fn without_profile(user_id: Uuid) -> Self {
        Self {
            user_id,
            profile: None,
        }
    }
}

/// Where a denied caller should be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Sign-in page.
    Login,
    /// Main menu, the "no access" landing.
    MenuPrincipal,
}

impl RedirectTarget {
    /// Returns the route name of the target.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::MenuPrincipal => "menu_principal",
        }
    }
}

/// Reason an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated caller.
    Unauthenticated,
    /// The user has no profile.
    MissingProfile,
    /// The profile role is not in the required set.
    RoleNotAllowed(Role),
    /// The profile is not attached to any company.
    NoCompany,
    /// The profile belongs to a different company.
    WrongCompany,
}

impl DenyReason {
    /// Returns where the caller should be redirected.
    #[must_use]
    pub const fn redirect(&self) -> RedirectTarget {
        match self {
            Self::Unauthenticated | Self::MissingProfile => RedirectTarget::Login,
            Self::RoleNotAllowed(_) | Self::NoCompany | Self::WrongCompany => {
                RedirectTarget::MenuPrincipal
            }
        }
    }

    /// Returns the user-visible warning.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Debe iniciar sesión para continuar.",
            Self::MissingProfile => "El usuario no tiene perfil asignado.",
            Self::RoleNotAllowed(_) => "No tiene permisos para acceder a esta sección.",
            Self::NoCompany => "El usuario no está asociado a ninguna empresa.",
            Self::WrongCompany => "No tiene acceso a la empresa solicitada.",
        }
    }

    /// Returns true when the caller is not authenticated at all.
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::MissingProfile)
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The operation may proceed.
    Allow,
    /// The operation is refused.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns true for `Allow`.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the deny reason when the decision is `Deny`.
    pub const fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// Checks role membership.
///
/// Allows iff the caller is authenticated, has a profile, and is either an
/// administrator or holds one of `required`. Non-administrators must also be
/// attached to a company.
#[must_use]
pub fn authorize(principal: Option<&Principal>, required: &[Role]) -> AccessDecision {
    let Some(principal) = principal else {
        return AccessDecision::Deny(DenyReason::Unauthenticated);
    };
    let Some(profile) = principal.profile else {
        return AccessDecision::Deny(DenyReason::MissingProfile);
    };

    if profile.role.is_admin() {
        return AccessDecision::Allow;
    }
    if !required.contains(&profile.role) {
        return AccessDecision::Deny(DenyReason::RoleNotAllowed(profile.role));
    }
    if profile.company_id.is_none() {
        return AccessDecision::Deny(DenyReason::NoCompany);
    }

    AccessDecision::Allow
}

/// Checks role membership and that the caller may act on `company_id`.
///
/// Administrators may act on any company; everyone else only on their own.
#[must_use]
pub fn authorize_company(
    principal: Option<&Principal>,
    required: &[Role],
    company_id: Uuid,
) -> AccessDecision {
    match authorize(principal, required) {
        AccessDecision::Allow => {}
        deny @ AccessDecision::Deny(_) => return deny,
    }

    let profile = principal.and_then(|p| p.profile);
    match profile {
        Some(p) if p.role.is_admin() || p.company_id == Some(company_id) => AccessDecision::Allow,
        _ => AccessDecision::Deny(DenyReason::WrongCompany),
    }
}
