//! `stockroom-core`: domain building blocks shared by the record crates.
//!
//! This crate contains **pure domain** primitives shared by the record
//! crates and the client (no IO, no async, no transport concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod record;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use record::{CollectionKind, FieldValue, Record};
