//! Catalogue, documents, sales and purchases through the router.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use omnigest_core::auth::Role;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use uuid::Uuid;

fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

struct Fixture {
    app: TestApp,
    company_id: Uuid,
    admin: String,
    employee: String,
}

impl Fixture {
    async fn new() -> Self {
        let app = TestApp::new().await;
        let company = app.company().await;
        let root = app.user("root", Role::Administrador, None).await;
        let ana = app.user("ana", Role::Empleado, Some(company.id)).await;
        Self {
            admin: app.token_for(&root),
            employee: app.token_for(&ana),
            company_id: company.id,
            app,
        }
    }

    fn uri(&self, path: &str) -> String {
        format!("/api/v1/companies/{}/{path}", self.company_id)
    }

    async fn client(&self, email: Option<&str>) -> String {
        let (status, body) = self
            .app
            .post(
                &self.uri("clients"),
                &self.employee,
                json!({ "name": "María López", "nit": "0614-010101-101-1", "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn product(&self, price: &str, stock: i64) -> String {
        let (status, body) = self
            .app
            .post(
                &self.uri("products"),
                &self.employee,
                json!({ "description": "Café molido", "unit_price": price, "initial_stock": stock }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_product_codes_are_generated() {
    let f = Fixture::new().await;

    let (_, next) = f.app.get(&f.uri("products/next-code"), &f.employee).await;
    assert_eq!(next["code"], "PRD0001");

    f.product("3.50", 0).await;
    let (_, next) = f.app.get(&f.uri("products/next-code"), &f.employee).await;
    assert_eq!(next["code"], "PRD0002");

    let (status, page) = f.app.get(&f.uri("products?q=caf"), &f.employee).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["data"][0]["code"], "PRD0001");
}

#[tokio::test]
async fn test_issue_document_computes_totals() {
    let f = Fixture::new().await;
    let client = f.client(None).await;
    let cafe = f.product("10.00", 0).await;
    let azucar = f.product("5.00", 0).await;

    let (status, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [
                    { "product_id": cafe, "quantity": "2", "unit_price": "10.00" },
                    { "product_id": azucar, "quantity": "1", "unit_price": "5.00" },
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{doc}");
    assert_eq!(doc["dte_type"], "01");
    assert_eq!(doc["status"], "Activo");
    assert_eq!(money(&doc["subtotal"]), dec!(25.00));
    assert_eq!(money(&doc["iva"]), dec!(3.25));
    assert_eq!(money(&doc["total"]), dec!(28.25));
    assert_eq!(doc["lines"].as_array().unwrap().len(), 2);

    let id = doc["id"].as_str().unwrap();
    let (status, updated) = f
        .app
        .post(
            &f.uri(&format!("documents/{id}/lines")),
            &f.employee,
            json!({ "product_id": azucar, "quantity": "3", "unit_price": "5.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&updated["subtotal"]), dec!(35.00));
    assert_eq!(money(&updated["total"]), dec!(39.55));

    let control = doc["control_number"].as_str().unwrap();
    let (_, found) = f
        .app
        .get(&f.uri(&format!("documents/search?q={control}")), &f.employee)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["client_name"], "María López");
}

#[tokio::test]
async fn test_amounts_beyond_money_columns_are_rejected() {
    let f = Fixture::new().await;
    let client = f.client(None).await;
    let cafe = f.product("10.00", 0).await;

    let (status, body) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{
                    "product_id": cafe,
                    "quantity": "79228162514264337593543950335",
                    "unit_price": "10.00",
                }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // Still serving after the rejected request.
    let (status, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": cafe, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{doc}");

    let id = doc["id"].as_str().unwrap();
    let (status, _) = f
        .app
        .post(
            &f.uri(&format!("documents/{id}/lines")),
            &f.employee,
            json!({ "product_id": cafe, "quantity": "1.005", "unit_price": "10.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = f
        .app
        .post(
            &f.uri(&format!("documents/{id}/lines")),
            &f.employee,
            json!({ "product_id": cafe, "quantity": "9000000000.00", "unit_price": "1.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, unchanged) = f
        .app
        .get(&f.uri(&format!("documents/{id}")), &f.employee)
        .await;
    assert_eq!(money(&unchanged["total"]), dec!(11.30));

    let (status, _) = f
        .app
        .post(
            &f.uri("products"),
            &f.employee,
            json!({ "description": "Oro", "unit_price": "10000000000.00", "initial_stock": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_cannot_void_but_accountant_can() {
    let f = Fixture::new().await;
    let client = f.client(None).await;
    let product = f.product("10.00", 0).await;
    let (_, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": product, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;
    let void_uri = f.uri(&format!("documents/{}/void", doc["id"].as_str().unwrap()));

    let (status, _) = f.app.post(&void_uri, &f.employee, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let carla = f
        .app
        .user("carla", Role::Contador, Some(f.company_id))
        .await;
    let (status, voided) = f
        .app
        .post(&void_uri, &f.app.token_for(&carla), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["status"], "Anulado");

    let (status, _) = f.app.post(&void_uri, &f.admin, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_submit_queues_approval_email() {
    let mut f = Fixture::new().await;
    let client = f.client(Some("maria@example.com")).await;
    let product = f.product("10.00", 0).await;
    let (_, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": product, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;
    let id = doc["id"].as_str().unwrap().to_string();

    let (status, submitted) = f
        .app
        .post(&f.uri(&format!("documents/{id}/submit")), &f.employee, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{submitted}");
    assert!(submitted["generation_code"].as_str().unwrap().starts_with("MH-"));
    assert!(submitted["reception_seal"].as_str().unwrap().starts_with("SELLO-"));
    assert_eq!(submitted["email_job"]["status"], "queued");
    assert_eq!(submitted["email_job"]["kind"], "approval");
    assert_eq!(submitted["email_job"]["recipient"], "maria@example.com");

    let job_id: Uuid = f.app.email_receiver.try_recv().unwrap();
    assert_eq!(submitted["email_job"]["id"], job_id.to_string());
    f.app.worker.process(job_id).await.unwrap();

    let (status, job) = f
        .app
        .get(&f.uri(&format!("email-jobs/{job_id}")), &f.employee)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "failed");
    assert_eq!(job["attempts"], 1);
    assert!(
        job["last_error"]
            .as_str()
            .unwrap()
            .ends_with("Email delivery is disabled")
    );

    let (status, _) = f
        .app
        .post(&f.uri(&format!("documents/{id}/submit")), &f.employee, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_editing_document_client_resends_receipt() {
    let mut f = Fixture::new().await;
    let client = f.client(None).await;
    let product = f.product("10.00", 0).await;
    let (_, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": product, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;
    let uri = f.uri(&format!("documents/{}/client", doc["id"].as_str().unwrap()));

    let (status, _) = f
        .app
        .put(&uri, &f.employee, json!({ "email": "nuevo@example.com" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = f
        .app
        .put(&uri, &f.admin, json!({ "email": "nuevo@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["client"]["email"], "nuevo@example.com");
    assert_eq!(body["email_job"]["kind"], "update");
    assert!(f.app.email_receiver.try_recv().is_ok());
}

#[tokio::test]
async fn test_receipt_includes_qr_payload() {
    let f = Fixture::new().await;
    let client = f.client(None).await;
    let product = f.product("10.00", 0).await;
    let (_, doc) = f
        .app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": product, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;

    let (status, body) = f
        .app
        .get(
            &f.uri(&format!("documents/{}/receipt", doc["id"].as_str().unwrap())),
            &f.employee,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let control = doc["control_number"].as_str().unwrap();
    assert_eq!(body["receipt"]["numero_control"], control);
    assert_eq!(body["receipt"]["total"], "11.30");
    assert!(
        body["qr_payload"]
            .as_str()
            .unwrap()
            .starts_with(&format!("{control}|"))
    );
    assert!(body["qr_payload"].as_str().unwrap().ends_with("|0614-010101-101-1|11.30"));
}

#[tokio::test]
async fn test_sale_takes_stock_and_rejects_oversell() {
    let f = Fixture::new().await;
    let product = f.product("2.00", 5).await;

    let (status, sale) = f
        .app
        .post(
            &f.uri("sales"),
            &f.employee,
            json!({ "product_id": product, "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{sale}");
    assert_eq!(sale["client"]["name"], "Consumidor Final");
    assert_eq!(sale["movement"]["balance_after"], 2);
    assert_eq!(money(&sale["document"]["total"]), dec!(6.78));

    let (status, body) = f
        .app
        .post(
            &f.uri("sales"),
            &f.employee,
            json!({ "product_id": product, "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");

    let (_, levels) = f.app.get(&f.uri("inventory"), &f.employee).await;
    assert_eq!(levels[0]["on_hand"], 2);

    let (_, movements) = f
        .app
        .get(&f.uri(&format!("products/{product}/movements")), &f.employee)
        .await;
    assert_eq!(movements.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_manual_movement() {
    let f = Fixture::new().await;
    let product = f.product("2.00", 1).await;

    let (status, movement) = f
        .app
        .post(
            &f.uri("inventory/movements"),
            &f.employee,
            json!({ "product_id": product, "direction": "entrada", "quantity": 4, "description": "Ajuste" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(movement["balance_after"], 5);

    let (status, _) = f
        .app
        .post(
            &f.uri("inventory/movements"),
            &f.employee,
            json!({ "product_id": product, "direction": "traslado", "quantity": 1, "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_purchase_and_book_export() {
    let f = Fixture::new().await;
    let product = f.product("20.00", 2).await;
    let (status, supplier) = f
        .app
        .post(
            &f.uri("suppliers"),
            &f.employee,
            json!({ "name": "Distribuidora Central" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, purchase) = f
        .app
        .post(
            &f.uri("purchases"),
            &f.employee,
            json!({
                "supplier_id": supplier["id"],
                "product_id": product,
                "quantity": 4,
                "amount": "100.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{purchase}");
    assert_eq!(money(&purchase["unit_price"]), dec!(25.00));
    assert_eq!(money(&purchase["iva"]), dec!(13.00));
    assert_eq!(money(&purchase["total"]), dec!(113.00));
    assert_eq!(purchase["registry_number"], "REG-00001");

    let (_, product_now) = f
        .app
        .get(&f.uri(&format!("products/{product}")), &f.employee)
        .await;
    assert_eq!(product_now["on_hand"], 6);

    let (status, csv) = f.app.get(&f.uri("purchases/export"), &f.employee).await;
    assert_eq!(status, StatusCode::OK);
    let csv = csv.as_str().unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("N°,Fecha"));
    let row = lines.next().unwrap();
    assert!(row.contains("REG-00001"));
    assert!(row.ends_with("25.00,100.00,13.00,113.00"));
}

#[tokio::test]
async fn test_client_in_use_cannot_be_deleted() {
    let f = Fixture::new().await;
    let client = f.client(None).await;
    let product = f.product("10.00", 0).await;
    f.app
        .post(
            &f.uri("documents"),
            &f.employee,
            json!({
                "client_id": client,
                "lines": [{ "product_id": product, "quantity": "1", "unit_price": "10.00" }],
            }),
        )
        .await;

    let (status, _) = f
        .app
        .send(
            Method::DELETE,
            &f.uri(&format!("clients/{client}")),
            Some(&f.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
