//! Sales book and sales report integration tests.

mod common;

use chrono::NaiveDate;
use chrono_tz::America::El_Salvador;
use common::{create_client, create_company, create_product, setup_db};
use omnigest_core::document::{DteType, LineInput};
use omnigest_db::{
    BooksRepository, DocumentRepository, SaleRepository,
    repositories::{IssueDocumentInput, RegisterSaleInput},
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_sales_report_and_book_skip_voided_documents() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let client = create_client(&db, company.id, "Ana Lopez").await;
    let product = create_product(&db, company.id, dec!(10.00), 100).await;

    let sales = SaleRepository::new(db.clone());
    let mut control_numbers = Vec::new();
    for quantity in [1, 2, 3] {
        let sale = sales
            .register(
                company.id,
                RegisterSaleInput {
                    product_id: product.id,
                    quantity,
                    client_id: Some(client.id),
                },
            )
            .await
            .expect("Failed to register sale");
        control_numbers.push((sale.document.id, sale.document.control_number));
    }

    let documents = DocumentRepository::new(db.clone());
    documents
        .void(company.id, control_numbers[1].0)
        .await
        .expect("Failed to void");

    // A tax credit voucher shows in the report but not in the invoice book.
    documents
        .issue(
            company.id,
            IssueDocumentInput {
                client_id: client.id,
                dte_type: DteType::TaxCreditVoucher,
                payment_terms: None,
                lines: vec![LineInput {
                    product_id: product.id,
                    quantity: dec!(10),
                    unit_price: dec!(10.00),
                }],
            },
        )
        .await
        .expect("Failed to issue document");

    let books = BooksRepository::new(db.clone());
    let report = books.sales_report(company.id, 10).await.expect("Failed to load report");
    assert_eq!(report.documents.len(), 3);
    // 11.30 + 33.90 + 113.00
    assert_eq!(report.total, dec!(158.20));
    assert_eq!(report.documents[0].dte_type, DteType::TaxCreditVoucher);
    assert_eq!(report.documents[1].client_name, "Ana Lopez");

    let limited = books.sales_report(company.id, 1).await.expect("Failed to load report");
    assert_eq!(limited.documents.len(), 1);
    assert_eq!(limited.total, dec!(113.00));

    let book = books
        .sales_book(company.id, El_Salvador, 30)
        .await
        .expect("Failed to load sales book");
    assert_eq!(book.len(), 1);
    let day = &book[0];
    assert_eq!(day.first_control_number, control_numbers[0].1);
    assert_eq!(day.last_control_number, control_numbers[2].1);
    assert_eq!(day.taxed_sales, dec!(40.00));
    assert_eq!(day.total, dec!(45.20));
    assert!(day.day >= NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"));
}

#[tokio::test]
async fn test_empty_books() {
    let db = setup_db().await;
    let company = create_company(&db).await;
    let books = BooksRepository::new(db.clone());

    let report = books.sales_report(company.id, 10).await.expect("Failed to load report");
    assert!(report.documents.is_empty());
    assert_eq!(report.total, dec!(0));
    assert!(
        books
            .sales_book(company.id, El_Salvador, 30)
            .await
            .expect("Failed to load sales book")
            .is_empty()
    );
}
