//! Presentation controller: turns user actions into store operations and
//! pushes a fresh [`Screen`] to the renderer after each successful change.

use std::sync::Arc;

use serde::Serialize;

use stockroom_core::{CollectionKind, RecordId};
use stockroom_inventory::{InventoryItem, ItemDraft};
use stockroom_parties::{Supplier, SupplierDraft};

use crate::query::{Filter, QueryEngine};
use crate::store::RecordStore;
use crate::types::{LoadReport, LoadSource};
use crate::view::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A short message for the user (toast, status bar, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Whatever draws the UI.
pub trait Renderer {
    fn render(&mut self, screen: &Screen);
    fn notify(&mut self, notice: Notice);
}

pub struct App<R: Renderer> {
    store: Arc<RecordStore>,
    engine: QueryEngine,
    inventory_filter: Filter,
    supplier_filter: Filter,
    renderer: R,
}

impl<R: Renderer> App<R> {
    pub fn new(store: Arc<RecordStore>, renderer: R) -> Self {
        Self {
            store,
            engine: QueryEngine::new(),
            inventory_filter: Filter::default(),
            supplier_filter: Filter::default(),
            renderer,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Load the initial data and paint the first screen.
    pub async fn start(&mut self) -> LoadReport {
        let report = self.store.load_initial().await;
        if let Some(err) = &report.error {
            let notice = match report.source {
                LoadSource::Seed => Notice::info(format!("Server unavailable ({err}); showing demo data.")),
                _ => Notice::error(format!("Failed to load data: {err}")),
            };
            self.renderer.notify(notice);
        }
        self.render();
        report
    }

    pub fn screen(&self) -> Screen {
        Screen::build(
            &self.store,
            &self.engine,
            &self.inventory_filter,
            &self.supplier_filter,
        )
    }

    fn render(&mut self) {
        let screen = self.screen();
        self.renderer.render(&screen);
    }

    pub fn search(&mut self, kind: CollectionKind, term: &str) {
        match kind {
            CollectionKind::Inventory => self.inventory_filter.term = term.to_string(),
            CollectionKind::Suppliers => self.supplier_filter.term = term.to_string(),
        }
        self.render();
    }

    /// Restrict the inventory table to one category; empty clears the filter.
    pub fn set_category(&mut self, category: &str) {
        self.inventory_filter.category = (!category.is_empty()).then(|| category.to_string());
        self.render();
    }

    /// Sort a table by a column header, toggling direction on repeats.
    pub fn sort(&mut self, kind: CollectionKind, key: &str) {
        let requested = match kind {
            CollectionKind::Inventory => self.engine.request_sort::<InventoryItem>(key),
            CollectionKind::Suppliers => self.engine.request_sort::<Supplier>(key),
        };
        match requested {
            Ok(_) => self.render(),
            Err(err) => self.renderer.notify(Notice::error(err.to_string())),
        }
    }

    /// Prefilled draft for the edit form, if the item exists.
    pub fn edit_item(&self, id: &RecordId) -> Option<ItemDraft> {
        self.store.find_item(id).as_ref().map(ItemDraft::from)
    }

    pub fn edit_supplier(&self, id: &RecordId) -> Option<SupplierDraft> {
        self.store.find_supplier(id).as_ref().map(SupplierDraft::from)
    }

    /// Submit the item form. `edit_id` is set when editing an existing item.
    pub async fn submit_item(&mut self, draft: ItemDraft, edit_id: Option<RecordId>) -> bool {
        match self.store.save_item(draft, edit_id.as_ref()).await {
            Ok(outcome) => {
                let verb = if outcome.created { "added" } else { "updated" };
                self.renderer.notify(Notice::success(format!("Inventory item {verb}!")));
                self.render();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "inventory save failed");
                self.renderer.notify(Notice::error(format!("Failed to save: {err}")));
                false
            }
        }
    }

    /// Submit the supplier form. `edit_id` is set when editing an existing supplier.
    pub async fn submit_supplier(&mut self, draft: SupplierDraft, edit_id: Option<RecordId>) -> bool {
        match self.store.save_supplier(draft, edit_id.as_ref()).await {
            Ok(outcome) => {
                let verb = if outcome.created { "added" } else { "updated" };
                self.renderer.notify(Notice::success(format!("Supplier {verb}!")));
                self.render();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "supplier save failed");
                self.renderer.notify(Notice::error(format!("Failed to save: {err}")));
                false
            }
        }
    }

    pub async fn delete_item(&mut self, id: &RecordId) -> bool {
        match self.store.delete_item(id).await {
            Ok(outcome) if !outcome.removed => {
                self.renderer.notify(Notice::info(format!("Inventory item {id} was already gone.")));
                true
            }
            Ok(_) => {
                self.renderer.notify(Notice::info(format!("Inventory item {id} deleted.")));
                self.render();
                true
            }
            Err(err) => {
                self.renderer.notify(Notice::error(format!("Failed to delete: {err}")));
                false
            }
        }
    }

    pub async fn delete_supplier(&mut self, id: &RecordId) -> bool {
        match self.store.delete_supplier(id).await {
            Ok(outcome) if !outcome.removed => {
                self.renderer.notify(Notice::info(format!("Supplier {id} was already gone.")));
                true
            }
            Ok(_) => {
                self.renderer.notify(Notice::info(format!("Supplier {id} deleted.")));
                self.render();
                true
            }
            Err(err) => {
                self.renderer.notify(Notice::error(format!("Failed to delete: {err}")));
                false
            }
        }
    }
}
