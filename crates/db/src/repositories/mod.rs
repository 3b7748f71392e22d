//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Writes that touch stock or a numbering sequence run inside one transaction.

pub mod books;
pub mod client;
pub mod company;
pub mod document;
pub mod email_job;
pub mod inventory;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;
pub mod user;

pub use books::BooksRepository;
pub use client::{ClientError, ClientInput, ClientRepository};
pub use company::{CompanyError, CompanyRepository, CreateCompanyInput};
pub use document::{
    DocumentDetail, DocumentRepoError, DocumentRepository, DocumentSummary, IssueDocumentInput,
    UpdateDocumentClientInput, UpdateDocumentInput,
};
pub use email_job::{EmailJobRepository, NewEmailJob};
pub use inventory::{InventoryRepository, StockError};
pub use product::{CreateProductInput, ProductError, ProductRepository, UpdateProductInput};
pub use purchase::{PurchaseRepoError, PurchaseRepository, RegisterPurchaseInput};
pub use sale::{RegisterSaleInput, SaleError, SaleOutcome, SaleRepository};
pub use supplier::{SupplierError, SupplierInput, SupplierRepository};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository, UserWithProfile};

use sea_orm::{
    DbErr, SqlErr,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func, IntoColumnRef},
};

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Current instant as stored in timestamp columns.
pub(crate) fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

/// `%term%` pattern for case-insensitive `LIKE` searches.
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_lowercase())
}

/// `LOWER(column)`, ready for a `LIKE` comparison.
pub(crate) fn lower<T: IntoColumnRef>(column: T) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_lowercases_and_trims() {
        assert_eq!(like_pattern("  DTE-01 "), "%dte-01%");
    }

    #[test]
    fn test_plain_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::RecordNotFound("x".into())));
    }
}
