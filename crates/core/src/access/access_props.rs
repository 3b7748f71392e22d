//! Property-based tests for the access guard.

use proptest::prelude::*;
use uuid::Uuid;

use super::{AccessDecision, DenyReason, Principal, authorize, authorize_company};
use crate::auth::Role;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Administrador),
        Just(Role::Gerente),
        Just(Role::Contador),
        Just(Role::Empleado),
    ]
}

fn required_strategy() -> impl Strategy<Value = Vec<Role>> {
    proptest::collection::vec(role_strategy(), 0..4)
}

fn company_strategy() -> impl Strategy<Value = Option<Uuid>> {
    proptest::option::of(any::<u128>().prop_map(Uuid::from_u128))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Administrators are allowed whatever the required set or company.
    #[test]
    fn prop_admin_always_allowed(
        required in required_strategy(),
        company in company_strategy(),
        target in any::<u128>(),
    ) {
        let admin = Principal::with_profile(Uuid::now_v7(), Role::Administrador, company);
        prop_assert!(authorize(Some(&admin), &required).is_allowed());
        prop_assert!(authorize_company(Some(&admin), &required, Uuid::from_u128(target)).is_allowed());
    }

    /// A caller without a profile is always denied.
    #[test]
    fn prop_missing_profile_always_denied(required in required_strategy()) {
        let principal = Principal::without_profile(Uuid::now_v7());
        prop_assert_eq!(
            authorize(Some(&principal), &required),
            AccessDecision::Deny(DenyReason::MissingProfile)
        );
    }

    /// Non-admins are allowed exactly when their role is required and they have a company.
    #[test]
    fn prop_non_admin_rule(
        role in role_strategy(),
        required in required_strategy(),
        company in company_strategy(),
    ) {
        prop_assume!(role != Role::Administrador);
        let principal = Principal::with_profile(Uuid::now_v7(), role, company);
        let expected = required.contains(&role) && company.is_some();
        prop_assert_eq!(authorize(Some(&principal), &required).is_allowed(), expected);
    }

    /// Non-admins never reach a company other than their own.
    #[test]
    fn prop_foreign_company_denied(role in role_strategy(), own in any::<u128>(), other in any::<u128>()) {
        prop_assume!(role != Role::Administrador && own != other);
        let principal = Principal::with_profile(Uuid::now_v7(), role, Some(Uuid::from_u128(own)));
        prop_assert!(!authorize_company(Some(&principal), &Role::ALL, Uuid::from_u128(other)).is_allowed());
    }
}
