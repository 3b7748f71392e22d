//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{
    MAX_STORED_AMOUNT, format_money, is_cent_precise, is_storable_amount, round_money,
};
pub use pagination::{PageMeta, PageRequest, PageResponse};
