//! `stockroom-client`
//!
//! **Responsibility:** the data core of the stockroom front-end.
//!
//! This crate provides:
//! - The record store (single source of truth for items and suppliers)
//! - The query engine (search, category filter, sort toggling)
//! - The transport boundary to a remote persistence service (stub or HTTP)
//! - Plain view data and an `App` controller for whatever renders it
//!
//! The core never touches a UI; renderers receive [`view::Screen`] snapshots.

pub mod app;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod query;
pub mod seed;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use app::{App, Notice, NoticeLevel, Renderer};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::DashboardSummary;
pub use query::{Filter, QueryEngine, SortDirection, SortSpec};
pub use store::{RecordStore, StoreError};
pub use transport::{HttpTransport, StubTransport, Transport, TransportError, TransportKind};
pub use types::{DeleteOutcome, LoadReport, LoadSource, Persistence, SaveOutcome};
