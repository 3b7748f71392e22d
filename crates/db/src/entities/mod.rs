//! `SeaORM` entity definitions.

pub mod clients;
pub mod companies;
pub mod document_lines;
pub mod documents;
pub mod email_jobs;
pub mod enums;
pub mod products;
pub mod purchase_records;
pub mod stock_movements;
pub mod suppliers;
pub mod user_profiles;
pub mod users;
