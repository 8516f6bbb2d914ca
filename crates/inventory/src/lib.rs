//! Inventory domain module.
//!
//! Inventory items and the partial drafts used to create or update them,
//! plus the low-stock rule the dashboard relies on. Pure domain logic (no IO).

pub mod item;

pub use item::{DEFAULT_REORDER_LEVEL, InventoryItem, ItemDraft};
