//! Dashboard summary: totals and the low-stock alert list.

use serde::Serialize;

use stockroom_core::{Entity, RecordId};
use stockroom_inventory::InventoryItem;
use stockroom_parties::Supplier;

/// How many low-stock items the dashboard lists before collapsing the rest.
pub const LOW_STOCK_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockEntry {
    pub id: RecordId,
    pub name: String,
    pub stock: f64,
}

impl LowStockEntry {
    /// Display line, e.g. `Artisan Cheese (8 left)`.
    pub fn label(&self) -> String {
        format!("{} ({} left)", self.name, self.stock)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_items: usize,
    pub total_suppliers: usize,
    pub low_stock_count: usize,
    /// First low-stock items in collection order.
    pub low_stock_preview: Vec<LowStockEntry>,
    /// Low-stock items not shown in the preview.
    pub more_low_stock: usize,
}

impl DashboardSummary {
    pub fn from_records(items: &[InventoryItem], suppliers: &[Supplier]) -> Self {
        let low: Vec<&InventoryItem> = items.iter().filter(|i| i.is_low_stock()).collect();
        let low_stock_preview = low
            .iter()
            .take(LOW_STOCK_PREVIEW_LIMIT)
            .map(|i| LowStockEntry {
                id: i.id().clone(),
                name: i.name().to_string(),
                stock: i.stock(),
            })
            .collect();

        Self {
            total_items: items.len(),
            total_suppliers: suppliers.len(),
            low_stock_count: low.len(),
            low_stock_preview,
            more_low_stock: low.len().saturating_sub(LOW_STOCK_PREVIEW_LIMIT),
        }
    }

    /// The "...and N more." line, when the preview is truncated.
    pub fn more_label(&self) -> Option<String> {
        (self.more_low_stock > 0).then(|| format!("...and {} more.", self.more_low_stock))
    }
}
