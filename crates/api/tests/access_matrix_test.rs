//! Role requirements of the document and report endpoints.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use omnigest_core::auth::Role;
use rstest::rstest;

#[rstest]
#[case::employee_lists_documents(Role::Empleado, "documents", StatusCode::OK)]
#[case::accountant_lists_documents(Role::Contador, "documents", StatusCode::OK)]
#[case::manager_cannot_list_documents(Role::Gerente, "documents", StatusCode::FORBIDDEN)]
#[case::accountant_reads_report(Role::Contador, "reports/sales", StatusCode::OK)]
#[case::manager_cannot_read_report(Role::Gerente, "reports/sales", StatusCode::FORBIDDEN)]
#[case::employee_manages_clients(Role::Empleado, "clients", StatusCode::OK)]
#[case::accountant_cannot_list_clients(Role::Contador, "clients", StatusCode::FORBIDDEN)]
#[case::anyone_reads_sales_book(Role::Gerente, "reports/sales-book", StatusCode::OK)]
#[case::anyone_reads_inventory(Role::Contador, "inventory", StatusCode::OK)]
#[tokio::test]
async fn test_role_matrix(#[case] role: Role, #[case] path: &str, #[case] expected: StatusCode) {
    let app = TestApp::new().await;
    let company = app.company().await;
    let user = app.user("usuario", role, Some(company.id)).await;

    let (status, body) = app
        .get(
            &format!("/api/v1/companies/{}/{path}", company.id),
            &app.token_for(&user),
        )
        .await;

    assert_eq!(status, expected, "{body}");
}

#[rstest]
#[case(Role::Gerente)]
#[case(Role::Contador)]
#[case(Role::Empleado)]
#[tokio::test]
async fn test_profile_without_company_is_denied(#[case] role: Role) {
    let app = TestApp::new().await;
    let company = app.company().await;
    let user = app.user("suelto", role, None).await;

    let (status, body) = app
        .get(
            &format!("/api/v1/companies/{}/inventory", company.id),
            &app.token_for(&user),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "El usuario no está asociado a ninguna empresa.");
}

#[tokio::test]
async fn test_administrator_reaches_any_company() {
    let app = TestApp::new().await;
    let company = app.company().await;
    let root = app.user("root", Role::Administrador, None).await;

    let (status, body) = app
        .get(&format!("/api/v1/companies/{}", company.id), &app.token_for(&root))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nit"], company.nit);
}
