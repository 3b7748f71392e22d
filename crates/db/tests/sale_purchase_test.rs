//! Sale and purchase registration integration tests.

mod common;

use chrono::NaiveDate;
use common::{create_client, create_company, create_product, create_supplier, setup_db};
use omnigest_core::inventory::InventoryError;
use omnigest_core::purchase::PurchaseError;
use omnigest_db::{
    ClientRepository, DocumentRepository, InventoryRepository, ProductRepository, PurchaseRepository,
    SaleRepository,
    entities::enums::{DteCode, MovementKind},
    repositories::{PurchaseRepoError, RegisterPurchaseInput, RegisterSaleInput, SaleError},
};
use omnigest_shared::types::PageRequest;
use rust_decimal_macros::dec;

fn voucher_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 13).expect("valid date")
}

#[tokio::test]
async fn test_sale_without_client_uses_final_consumer() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let product = create_product(&db, company.id, dec!(12.50), 10).await;
    let repo = SaleRepository::new(db.clone());

    let sale = repo
        .register(
            company.id,
            RegisterSaleInput {
                product_id: product.id,
                quantity: 2,
                client_id: None,
            },
        )
        .await
        .expect("Failed to register sale");

    assert_eq!(sale.client.name, "Consumidor Final");
    assert_eq!(sale.document.dte_type, DteCode::Invoice);
    assert_eq!(sale.document.subtotal, dec!(25.00));
    assert_eq!(sale.document.iva, dec!(3.25));
    assert_eq!(sale.document.total, dec!(28.25));
    assert_eq!(sale.line.unit_price, dec!(12.50));
    assert_eq!(sale.movement.direction, MovementKind::Salida);
    assert_eq!(sale.movement.balance_after, 8);
    assert_eq!(
        sale.movement.description,
        format!("Venta {}", sale.document.control_number)
    );

    // The final consumer is reused, not duplicated.
    let second = repo
        .register(
            company.id,
            RegisterSaleInput {
                product_id: product.id,
                quantity: 1,
                client_id: None,
            },
        )
        .await
        .expect("Failed to register second sale");
    assert_eq!(second.client.id, sale.client.id);

    let (clients, _) = ClientRepository::new(db.clone())
        .list(company.id, Some("consumidor"), &PageRequest::default())
        .await
        .expect("Failed to list clients");
    assert_eq!(clients.len(), 1);
}

#[tokio::test]
async fn test_sale_to_named_client() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let client = create_client(&db, company.id, "Ana Lopez").await;
    let product = create_product(&db, company.id, dec!(3.00), 5).await;

    let sale = SaleRepository::new(db.clone())
        .register(
            company.id,
            RegisterSaleInput {
                product_id: product.id,
                quantity: 5,
                client_id: Some(client.id),
            },
        )
        .await
        .expect("Failed to register sale");

    assert_eq!(sale.client.id, client.id);
    assert_eq!(sale.movement.balance_after, 0);
}

#[tokio::test]
async fn test_sale_with_insufficient_stock_writes_nothing() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let product = create_product(&db, company.id, dec!(3.00), 1).await;

    let result = SaleRepository::new(db.clone())
        .register(
            company.id,
            RegisterSaleInput {
                product_id: product.id,
                quantity: 2,
                client_id: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(SaleError::Inventory(InventoryError::InsufficientStock { .. }))
    ));

    let (documents, total) = DocumentRepository::new(db.clone())
        .list(company.id, None, &PageRequest::default())
        .await
        .expect("Failed to list documents");
    assert!(documents.is_empty());
    assert_eq!(total, 0);

    let movements = InventoryRepository::new(db.clone())
        .list_movements(company.id, product.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements.len(), 1);

    let (clients, _) = ClientRepository::new(db.clone())
        .list(company.id, None, &PageRequest::default())
        .await
        .expect("Failed to list clients");
    assert!(clients.is_empty());
}

#[tokio::test]
async fn test_purchase_records_amounts_and_stock() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let supplier = create_supplier(&db, company.id).await;
    let product = create_product(&db, company.id, dec!(20.00), 2).await;
    let repo = PurchaseRepository::new(db.clone());

    let record = repo
        .register(
            company.id,
            RegisterPurchaseInput {
                supplier_id: supplier.id,
                product_id: product.id,
                quantity: 4,
                amount: dec!(100),
                voucher_date: voucher_date(),
            },
        )
        .await
        .expect("Failed to register purchase");

    assert_eq!(record.sequence, 1);
    assert_eq!(record.voucher_number, "COMP-20251113-0001");
    assert_eq!(record.registry_number, "REG-00001");
    assert_eq!(record.unit_price, dec!(25.00));
    assert_eq!(record.taxed_amount, dec!(100.00));
    assert_eq!(record.iva, dec!(13.00));
    assert_eq!(record.total, dec!(113.00));
    assert_eq!(record.supplier_name, supplier.name);

    let product = ProductRepository::new(db.clone())
        .find(company.id, product.id)
        .await
        .expect("query")
        .expect("Product missing");
    assert_eq!(product.on_hand, 6);
    assert_eq!(product.unit_price, dec!(25.00));

    let movements = InventoryRepository::new(db.clone())
        .list_movements(company.id, product.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements[0].description, "Compra COMP-20251113-0001");

    let second = repo
        .register(
            company.id,
            RegisterPurchaseInput {
                supplier_id: supplier.id,
                product_id: product.id,
                quantity: 1,
                amount: dec!(25),
                voucher_date: voucher_date(),
            },
        )
        .await
        .expect("Failed to register second purchase");
    assert_eq!(second.voucher_number, "COMP-20251113-0002");
    assert_eq!(second.registry_number, "REG-00002");

    let rows = repo.book_rows(company.id).await.expect("Failed to load book rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].voucher_number, "COMP-20251113-0001");

    let found = repo
        .list(company.id, Some("reg-00002"), None)
        .await
        .expect("Failed to search purchases");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, second.id);
}

#[tokio::test]
async fn test_purchase_validation() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let supplier = create_supplier(&db, company.id).await;
    let product = create_product(&db, company.id, dec!(20.00), 0).await;
    let repo = PurchaseRepository::new(db.clone());

    let zero_amount = repo
        .register(
            company.id,
            RegisterPurchaseInput {
                supplier_id: supplier.id,
                product_id: product.id,
                quantity: 1,
                amount: dec!(0),
                voucher_date: voucher_date(),
            },
        )
        .await;
    assert!(matches!(
        zero_amount,
        Err(PurchaseRepoError::Purchase(PurchaseError::NonPositiveAmount))
    ));

    let other = create_company(&db).await;
    let foreign = repo
        .register(
            other.id,
            RegisterPurchaseInput {
                supplier_id: supplier.id,
                product_id: product.id,
                quantity: 1,
                amount: dec!(10),
                voucher_date: voucher_date(),
            },
        )
        .await;
    assert!(matches!(foreign, Err(PurchaseRepoError::SupplierNotFound(_))));

    assert!(repo.book_rows(company.id).await.expect("book rows").is_empty());
}
