//! Initial database migration.
//!
//! Creates the tenant, user, catalogue, document, inventory, purchase and
//! email job tables. Built with the schema builder so the same migration runs
//! on Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: TENANTS AND USERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Companies::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Companies::Nit).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Companies::Nrc).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Companies::Address).text().not_null())
                    .col(ColumnDef::new(Companies::Phone).string_len(20).null())
                    .col(ColumnDef::new(Companies::Email).string_len(254).null())
                    .col(ColumnDef::new(Companies::EconomicActivity).string_len(200).null())
                    .col(ColumnDef::new(Companies::LegalRepresentative).string_len(200).null())
                    .col(timestamp(Companies::CreatedAt))
                    .col(timestamp(Companies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string_len(150).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(254).null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::UserId).uuid().not_null().unique_key())
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .string_len(20)
                            .not_null()
                            .default("Empleado"),
                    )
                    .col(ColumnDef::new(UserProfiles::CompanyId).uuid().null())
                    .col(timestamp(UserProfiles::CreatedAt))
                    .col(timestamp(UserProfiles::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_company")
                            .from(UserProfiles::Table, UserProfiles::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: CATALOGUE
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Clients::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Clients::Dui).string_len(10).null())
                    .col(ColumnDef::new(Clients::Nit).string_len(20).null())
                    .col(ColumnDef::new(Clients::Nrc).string_len(20).null())
                    .col(ColumnDef::new(Clients::Address).text().null())
                    .col(ColumnDef::new(Clients::Email).string_len(254).null())
                    .col(ColumnDef::new(Clients::Phone).string_len(20).null())
                    .col(timestamp(Clients::CreatedAt))
                    .col(timestamp(Clients::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clients_company")
                            .from(Clients::Table, Clients::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Suppliers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Suppliers::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Suppliers::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Suppliers::Nit).string_len(20).null())
                    .col(ColumnDef::new(Suppliers::Nrc).string_len(20).null())
                    .col(ColumnDef::new(Suppliers::Address).text().null())
                    .col(ColumnDef::new(Suppliers::Phone).string_len(20).null())
                    .col(ColumnDef::new(Suppliers::Email).string_len(254).null())
                    .col(ColumnDef::new(Suppliers::LegalRepresentative).string_len(200).null())
                    .col(timestamp(Suppliers::CreatedAt))
                    .col(timestamp(Suppliers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suppliers_company")
                            .from(Suppliers::Table, Suppliers::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Products::Code).string_len(20).not_null())
                    .col(ColumnDef::new(Products::Description).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Products::UnitOfMeasure)
                            .string_len(20)
                            .not_null()
                            .default("C/U"),
                    )
                    .col(money(Products::UnitPrice))
                    .col(ColumnDef::new(Products::OnHand).big_integer().not_null().default(0))
                    .col(timestamp(Products::CreatedAt))
                    .col(timestamp(Products::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_company")
                            .from(Products::Table, Products::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_products_company_code")
                    .table(Products::Table)
                    .col(Products::CompanyId)
                    .col(Products::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: DOCUMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Documents::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Documents::DteType).string_len(2).not_null())
                    .col(
                        ColumnDef::new(Documents::ControlNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp(Documents::IssuedAt))
                    .col(
                        ColumnDef::new(Documents::PaymentTerms)
                            .string_len(50)
                            .not_null()
                            .default("Contado"),
                    )
                    .col(money(Documents::Subtotal))
                    .col(money(Documents::Iva))
                    .col(money(Documents::Total))
                    .col(ColumnDef::new(Documents::GenerationCode).string_len(100).null())
                    .col(ColumnDef::new(Documents::ReceptionSeal).string_len(100).null())
                    .col(
                        ColumnDef::new(Documents::Status)
                            .string_len(10)
                            .not_null()
                            .default("Activo"),
                    )
                    .col(timestamp(Documents::CreatedAt))
                    .col(timestamp(Documents::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_company")
                            .from(Documents::Table, Documents::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_client")
                            .from(Documents::Table, Documents::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_company_issued")
                    .table(Documents::Table)
                    .col(Documents::CompanyId)
                    .col(Documents::IssuedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DocumentLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DocumentLines::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(DocumentLines::ProductId).uuid().not_null())
                    .col(money(DocumentLines::Quantity))
                    .col(money(DocumentLines::UnitPrice))
                    .col(money(DocumentLines::Total))
                    .col(timestamp(DocumentLines::CreatedAt))
                    .col(timestamp(DocumentLines::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_document")
                            .from(DocumentLines::Table, DocumentLines::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_product")
                            .from(DocumentLines::Table, DocumentLines::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_document_lines_document_product")
                    .table(DocumentLines::Table)
                    .col(DocumentLines::DocumentId)
                    .col(DocumentLines::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: INVENTORY AND PURCHASES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(StockMovements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StockMovements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StockMovements::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(StockMovements::ProductId).uuid().not_null())
                    .col(ColumnDef::new(StockMovements::Direction).string_len(10).not_null())
                    .col(ColumnDef::new(StockMovements::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(StockMovements::BalanceAfter).big_integer().not_null())
                    .col(ColumnDef::new(StockMovements::Description).text().not_null())
                    .col(timestamp(StockMovements::OccurredAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_movements_product")
                            .from(StockMovements::Table, StockMovements::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PurchaseRecords::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseRecords::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseRecords::ProductId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseRecords::SupplierName).string_len(200).not_null())
                    .col(ColumnDef::new(PurchaseRecords::Sequence).big_integer().not_null())
                    .col(ColumnDef::new(PurchaseRecords::VoucherNumber).string_len(30).not_null())
                    .col(ColumnDef::new(PurchaseRecords::RegistryNumber).string_len(30).not_null())
                    .col(ColumnDef::new(PurchaseRecords::Quantity).big_integer().not_null())
                    .col(money(PurchaseRecords::UnitPrice))
                    .col(money(PurchaseRecords::TaxedAmount))
                    .col(money(PurchaseRecords::Iva))
                    .col(money(PurchaseRecords::Total))
                    .col(timestamp(PurchaseRecords::PurchasedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_records_company")
                            .from(PurchaseRecords::Table, PurchaseRecords::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_records_supplier")
                            .from(PurchaseRecords::Table, PurchaseRecords::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_records_product")
                            .from(PurchaseRecords::Table, PurchaseRecords::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("uq_purchase_records_sequence", PurchaseRecords::Sequence),
            ("uq_purchase_records_voucher", PurchaseRecords::VoucherNumber),
            ("uq_purchase_records_registry", PurchaseRecords::RegistryNumber),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(PurchaseRecords::Table)
                        .col(PurchaseRecords::CompanyId)
                        .col(column)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // ============================================================
        // PART 5: EMAIL JOBS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(EmailJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EmailJobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(EmailJobs::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(EmailJobs::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(EmailJobs::Recipient).string_len(254).not_null())
                    .col(ColumnDef::new(EmailJobs::Subject).string_len(255).not_null())
                    .col(ColumnDef::new(EmailJobs::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(EmailJobs::Status)
                            .string_len(10)
                            .not_null()
                            .default("queued"),
                    )
                    .col(ColumnDef::new(EmailJobs::Attempts).integer().not_null().default(0))
                    .col(ColumnDef::new(EmailJobs::LastError).text().null())
                    .col(timestamp(EmailJobs::CreatedAt))
                    .col(timestamp(EmailJobs::UpdatedAt))
                    .col(ColumnDef::new(EmailJobs::SentAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_email_jobs_document")
                            .from(EmailJobs::Table, EmailJobs::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_email_jobs_status")
                    .table(EmailJobs::Table)
                    .col(EmailJobs::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailJobs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseRecords::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockMovements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

/// `DECIMAL(12, 2) NOT NULL DEFAULT 0`.
fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(12, 2)
        .not_null()
        .default(0)
        .to_owned()
}

/// `TIMESTAMPTZ NOT NULL`.
fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Nit,
    Nrc,
    Address,
    Phone,
    Email,
    EconomicActivity,
    LegalRepresentative,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    UserId,
    Role,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    CompanyId,
    Name,
    Dui,
    Nit,
    Nrc,
    Address,
    Email,
    Phone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    CompanyId,
    Name,
    Nit,
    Nrc,
    Address,
    Phone,
    Email,
    LegalRepresentative,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    CompanyId,
    Code,
    Description,
    UnitOfMeasure,
    UnitPrice,
    OnHand,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    CompanyId,
    ClientId,
    DteType,
    ControlNumber,
    IssuedAt,
    PaymentTerms,
    Subtotal,
    Iva,
    Total,
    GenerationCode,
    ReceptionSeal,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentLines {
    Table,
    Id,
    DocumentId,
    ProductId,
    Quantity,
    UnitPrice,
    Total,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StockMovements {
    Table,
    Id,
    CompanyId,
    ProductId,
    Direction,
    Quantity,
    BalanceAfter,
    Description,
    OccurredAt,
}

#[derive(DeriveIden)]
enum PurchaseRecords {
    Table,
    Id,
    CompanyId,
    SupplierId,
    ProductId,
    SupplierName,
    Sequence,
    VoucherNumber,
    RegistryNumber,
    Quantity,
    UnitPrice,
    TaxedAmount,
    Iva,
    Total,
    PurchasedAt,
}

#[derive(DeriveIden)]
enum EmailJobs {
    Table,
    Id,
    CompanyId,
    DocumentId,
    Recipient,
    Subject,
    Kind,
    Status,
    Attempts,
    LastError,
    CreatedAt,
    UpdatedAt,
    SentAt,
}
