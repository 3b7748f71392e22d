//! Database seeder for OMNIGEST development and testing.
//!
//! Seeds a demo company, an administrator, an employee, a small catalogue,
//! a client and a supplier. Running it twice leaves existing rows alone.
//!
//! Usage: cargo run --bin seeder

use omnigest_core::auth::{Role, hash_password};
use omnigest_db::{
    ClientRepository, CompanyRepository, ProductRepository, SupplierRepository, UserRepository,
    entities::companies,
    repositories::{
        ClientInput, CompanyError, CreateCompanyInput, CreateProductInput, CreateUserInput,
        SupplierInput, UserError,
    },
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

const DEMO_NIT: &str = "0614-150190-101-1";

/// (description, unit price in cents, opening stock)
const CATALOGUE: &[(&str, i64, i64)] = &[
    ("Café molido 400g", 450, 40),
    ("Azúcar morena 1kg", 135, 60),
    ("Leche entera 1L", 110, 24),
    ("Pan dulce", 35, 100),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")?;
    let admin_password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-omnigest".to_string());

    println!("Connecting to database...");
    let db = omnigest_db::connect(&database_url).await?;

    println!("Seeding demo company...");
    let Some(company) = seed_company(&db).await? else {
        println!("  Demo company already exists, skipping the rest...");
        return Ok(());
    };

    println!("Seeding users...");
    seed_user(&db, "admin", &admin_password, Role::Administrador, None).await?;
    seed_user(&db, "empleado", &admin_password, Role::Empleado, Some(company.id)).await?;
    seed_user(&db, "contador", &admin_password, Role::Contador, Some(company.id)).await?;

    println!("Seeding catalogue...");
    let products = ProductRepository::new(db.clone());
    for &(description, cents, stock) in CATALOGUE {
        let product = products
            .create(
                company.id,
                CreateProductInput {
                    code: None,
                    description: description.to_string(),
                    unit_of_measure: None,
                    unit_price: Decimal::new(cents, 2),
                    initial_stock: stock,
                },
            )
            .await?;
        println!("  {} {}", product.code, product.description);
    }

    println!("Seeding client and supplier...");
    ClientRepository::new(db.clone())
        .create(
            company.id,
            ClientInput {
                name: "Comercial La Ceiba".to_string(),
                dui: None,
                nit: Some("0614-010101-101-1".to_string()),
                nrc: Some("12345-6".to_string()),
                address: Some("Santa Tecla, La Libertad".to_string()),
                email: Some("compras@laceiba.example".to_string()),
                phone: Some("2222-0000".to_string()),
            },
        )
        .await?;
    SupplierRepository::new(db.clone())
        .create(
            company.id,
            SupplierInput {
                name: "Distribuidora Central".to_string(),
                nit: Some("0614-020202-102-2".to_string()),
                nrc: Some("65432-1".to_string()),
                address: Some("San Salvador".to_string()),
                phone: None,
                email: None,
                legal_representative: None,
            },
        )
        .await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_company(db: &DatabaseConnection) -> anyhow::Result<Option<companies::Model>> {
    let result = CompanyRepository::new(db.clone())
        .create(CreateCompanyInput {
            name: "OMNIGEST Demo S.A. de C.V.".to_string(),
            nit: DEMO_NIT.to_string(),
            nrc: "100200-3".to_string(),
            address: "Colonia Escalón, San Salvador".to_string(),
            phone: Some("2250-0000".to_string()),
            email: Some("facturacion@omnigest.example".to_string()),
            economic_activity: Some("Venta al por menor".to_string()),
            legal_representative: Some("Ana Martínez".to_string()),
        })
        .await;

    match result {
        Ok(company) => Ok(Some(company)),
        Err(CompanyError::Duplicate) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn seed_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Role,
    company_id: Option<uuid::Uuid>,
) -> anyhow::Result<()> {
    let result = UserRepository::new(db.clone())
        .create(CreateUserInput {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            email: None,
            role,
            company_id,
        })
        .await;

    match result {
        Ok(_) => println!("  {username} ({role})"),
        Err(UserError::UsernameTaken(_)) => println!("  {username} already exists, skipping..."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
