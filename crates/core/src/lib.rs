//! Core business logic for OMNIGEST.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `access` - Role and tenant guard
//! - `auth` - Roles and password hashing
//! - `document` - DTE totals and status transitions
//! - `inventory` - Stock movement arithmetic
//! - `sequence` - Product codes, control numbers, purchase numbering
//! - `purchase` - Purchase amounts
//! - `books` - Sales book, purchase book, sales report
//! - `receipt` - Receipt JSON, QR payload, email text, rendering
//! - `authority` - Tax authority seam and its simulation

pub mod access;
pub mod auth;
pub mod authority;
pub mod books;
pub mod document;
pub mod inventory;
pub mod purchase;
pub mod receipt;
pub mod sequence;
