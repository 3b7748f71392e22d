//! Shared types, errors, and configuration for OMNIGEST.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding helpers with two-decimal precision
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT tokens and auth payloads
//! - SMTP email delivery

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenPair};
pub use config::{AppConfig, EmailConfig};
pub use email::{EmailAttachment, EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
