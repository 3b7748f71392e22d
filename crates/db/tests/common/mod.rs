//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use omnigest_db::{
    ClientRepository, CompanyRepository, ProductRepository, SupplierRepository,
    entities::{clients, companies, products, suppliers},
    migration::{Migrator, MigratorTrait},
    repositories::{ClientInput, CreateCompanyInput, CreateProductInput, SupplierInput},
};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Opens a fresh in-memory database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// Registers a company with a unique NIT and NRC.
pub async fn create_company(db: &DatabaseConnection) -> companies::Model {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    CompanyRepository::new(db.clone())
        .create(CreateCompanyInput {
            name: format!("Empresa {suffix}"),
            nit: format!("0614-{suffix}"),
            nrc: format!("NRC-{suffix}"),
            address: "San Salvador".to_string(),
            email: Some("ventas@empresa.sv".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create company")
}

/// Creates a client with an email address.
pub async fn create_client(db: &DatabaseConnection, company_id: Uuid, name: &str) -> clients::Model {
    ClientRepository::new(db.clone())
        .create(
            company_id,
            ClientInput {
                name: name.to_string(),
                nit: Some("0614-010101-101-1".to_string()),
                email: Some(format!("{}@correo.sv", name.to_lowercase().replace(' ', "."))),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create client")
}

/// Creates a product with a generated code.
pub async fn create_product(
    db: &DatabaseConnection,
    company_id: Uuid,
    unit_price: Decimal,
    initial_stock: i64,
) -> products::Model {
    ProductRepository::new(db.clone())
        .create(
            company_id,
            CreateProductInput {
                description: "Producto de prueba".to_string(),
                unit_price,
                initial_stock,
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create product")
}

/// Creates a supplier.
pub async fn create_supplier(db: &DatabaseConnection, company_id: Uuid) -> suppliers::Model {
    SupplierRepository::new(db.clone())
        .create(
            company_id,
            SupplierInput {
                name: "Distribuidora Central".to_string(),
                nit: Some("0614-020202-102-2".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create supplier")
}
