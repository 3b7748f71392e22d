//! Company, client, supplier and product repository integration tests.

mod common;

use common::{create_client, create_company, create_product, create_supplier, setup_db};
use omnigest_core::document::{DteType, LineInput};
use omnigest_db::{
    ClientRepository, CompanyRepository, DocumentRepository, ProductRepository, SupplierRepository,
    repositories::{
        ClientError, ClientInput, CompanyError, CreateCompanyInput, CreateProductInput,
        IssueDocumentInput, ProductError, UpdateProductInput,
    },
};
use omnigest_shared::types::PageRequest;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_company_nit_is_unique() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = CompanyRepository::new(db.clone());

    let duplicate = repo
        .create(CreateCompanyInput {
            name: "Copia".to_string(),
            nit: company.nit.clone(),
            nrc: "otro-nrc".to_string(),
            address: "Santa Ana".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(duplicate, Err(CompanyError::Duplicate)));

    let found = repo.get(company.id).await.expect("Failed to get company");
    assert_eq!(found.name, company.name);
}

#[tokio::test]
async fn test_generated_product_codes_follow_sequence() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = ProductRepository::new(db.clone());

    let first = create_product(&db, company.id, dec!(1.00), 0).await;
    let second = create_product(&db, company.id, dec!(1.00), 0).await;
    assert_eq!(first.code, "PRD0001");
    assert_eq!(second.code, "PRD0002");
    assert_eq!(first.unit_of_measure, "C/U");

    // Hand-entered codes outside the pattern do not disturb the sequence.
    repo.create(
        company.id,
        CreateProductInput {
            code: Some("PRD-ESPECIAL".to_string()),
            description: "Especial".to_string(),
            unit_price: dec!(3.00),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create product with explicit code");
    assert_eq!(repo.next_code(company.id).await.expect("next code"), "PRD0003");

    // Each company has its own sequence.
    let other = create_company(&db).await;
    let foreign = create_product(&db, other.id, dec!(1.00), 0).await;
    assert_eq!(foreign.code, "PRD0001");
}

#[tokio::test]
async fn test_explicit_code_rules() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = ProductRepository::new(db.clone());

    let input = CreateProductInput {
        code: Some("CAFE-01".to_string()),
        description: "Cafe".to_string(),
        unit_of_measure: Some("Bolsa".to_string()),
        unit_price: dec!(4.75),
        initial_stock: 6,
    };
    let product = repo
        .create(company.id, input.clone())
        .await
        .expect("Failed to create product");
    assert_eq!(product.code, "CAFE-01");
    assert_eq!(product.on_hand, 6);

    let taken = repo.create(company.id, input).await;
    assert!(matches!(taken, Err(ProductError::CodeTaken(code)) if code == "CAFE-01"));

    let blank = repo
        .create(
            company.id,
            CreateProductInput {
                code: Some("   ".to_string()),
                description: "Sin codigo".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(blank, Err(ProductError::BlankCode)));

    let negative = repo
        .create(
            company.id,
            CreateProductInput {
                description: "Negativo".to_string(),
                unit_price: dec!(-1.00),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(negative, Err(ProductError::NegativePrice(_))));
}

#[tokio::test]
async fn test_product_update_and_search() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let product = create_product(&db, company.id, dec!(1.00), 0).await;
    let repo = ProductRepository::new(db.clone());

    let updated = repo
        .update(
            company.id,
            product.id,
            UpdateProductInput {
                description: Some("Azucar morena 1kg".to_string()),
                unit_price: Some(dec!(1.35)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update product");
    assert_eq!(updated.code, product.code);
    assert_eq!(updated.unit_price, dec!(1.35));

    let (found, total) = repo
        .list(company.id, Some("MORENA"), &PageRequest::default())
        .await
        .expect("Failed to search products");
    assert_eq!(total, 1);
    assert_eq!(found[0].id, product.id);

    let (none, _) = repo
        .list(company.id, Some("harina"), &PageRequest::default())
        .await
        .expect("Failed to search products");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_referenced_product_and_client_cannot_be_deleted() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let client = create_client(&db, company.id, "Ana Lopez").await;
    let product = create_product(&db, company.id, dec!(2.00), 0).await;
    let spare = create_product(&db, company.id, dec!(2.00), 3).await;

    DocumentRepository::new(db.clone())
        .issue(
            company.id,
            IssueDocumentInput {
                client_id: client.id,
                dte_type: DteType::Invoice,
                payment_terms: None,
                lines: vec![LineInput {
                    product_id: product.id,
                    quantity: dec!(1),
                    unit_price: dec!(2.00),
                }],
            },
        )
        .await
        .expect("Failed to issue document");

    let products = ProductRepository::new(db.clone());
    assert!(matches!(
        products.delete(company.id, product.id).await,
        Err(ProductError::InUse)
    ));
    products
        .delete(company.id, spare.id)
        .await
        .expect("Failed to delete unreferenced product");

    let clients = ClientRepository::new(db.clone());
    assert!(matches!(
        clients.delete(company.id, client.id).await,
        Err(ClientError::InUse(1))
    ));
}

#[tokio::test]
async fn test_client_crud_and_search() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let repo = ClientRepository::new(db.clone());
    let client = create_client(&db, company.id, "Carlos Mejia").await;
    create_client(&db, company.id, "Diana Ruiz").await;

    let (found, total) = repo
        .list(company.id, Some("mejia"), &PageRequest::default())
        .await
        .expect("Failed to search clients");
    assert_eq!(total, 1);
    assert_eq!(found[0].id, client.id);

    let updated = repo
        .update(
            company.id,
            client.id,
            ClientInput {
                name: "Carlos Mejia Rivas".to_string(),
                phone: Some("7777-0000".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update client");
    assert_eq!(updated.name, "Carlos Mejia Rivas");
    assert_eq!(updated.phone.as_deref(), Some("7777-0000"));

    repo.delete(company.id, client.id).await.expect("Failed to delete client");
    assert!(repo.find(company.id, client.id).await.expect("query").is_none());

    let other = create_company(&db).await;
    let (foreign, _) = repo
        .list(other.id, None, &PageRequest::default())
        .await
        .expect("Failed to list clients");
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn test_supplier_crud() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let supplier = create_supplier(&db, company.id).await;
    let repo = SupplierRepository::new(db.clone());

    let (found, total) = repo
        .list(company.id, Some("central"), &PageRequest::default())
        .await
        .expect("Failed to search suppliers");
    assert_eq!(total, 1);
    assert_eq!(found[0].id, supplier.id);

    repo.delete(company.id, supplier.id)
        .await
        .expect("Failed to delete supplier");
    assert!(repo.find(company.id, supplier.id).await.expect("query").is_none());
}
