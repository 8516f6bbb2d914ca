//! Parties domain module: the suppliers the shop orders from.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod supplier;

pub use supplier::{Supplier, SupplierDraft, is_valid_email};
