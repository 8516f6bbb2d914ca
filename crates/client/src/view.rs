//! Plain view data handed to renderers.

use serde::Serialize;

use stockroom_core::{CollectionKind, Record};
use stockroom_inventory::InventoryItem;
use stockroom_parties::Supplier;

use crate::dashboard::DashboardSummary;
use crate::query::{Filter, QueryEngine, SortSpec};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub stock: String,
    pub cost: String,
    pub low_stock: bool,
}

impl From<&InventoryItem> for InventoryRow {
    fn from(item: &InventoryItem) -> Self {
        let mut cells = item.cells().into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            id: next(),
            name: next(),
            category: next(),
            stock: next(),
            cost: next(),
            low_stock: item.is_low_stock(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Supplier> for SupplierRow {
    fn from(supplier: &Supplier) -> Self {
        let mut cells = supplier.cells().into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            id: next(),
            name: next(),
            email: next(),
            phone: next(),
        }
    }
}

/// Distinct non-empty categories, in order of first appearance.
pub fn category_options(items: &[InventoryItem]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for category in items.iter().filter_map(|i| i.category()) {
        if !out.iter().any(|c| c == category) {
            out.push(category.to_string());
        }
    }
    out
}

/// Everything a renderer needs for one full repaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub inventory: Vec<InventoryRow>,
    pub suppliers: Vec<SupplierRow>,
    pub categories: Vec<String>,
    pub dashboard: DashboardSummary,
    pub inventory_sort: Option<SortSpec>,
    pub supplier_sort: Option<SortSpec>,
}

impl Screen {
    pub fn build(
        store: &RecordStore,
        engine: &QueryEngine,
        inventory_filter: &Filter,
        supplier_filter: &Filter,
    ) -> Self {
        let items = store.items();
        let suppliers = store.suppliers();

        Self {
            inventory: engine
                .view(&items, inventory_filter)
                .iter()
                .map(InventoryRow::from)
                .collect(),
            suppliers: engine
                .view(&suppliers, supplier_filter)
                .iter()
                .map(SupplierRow::from)
                .collect(),
            categories: category_options(&items),
            dashboard: DashboardSummary::from_records(&items, &suppliers),
            inventory_sort: engine.current_sort(CollectionKind::Inventory).cloned(),
            supplier_sort: engine.current_sort(CollectionKind::Suppliers).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use stockroom_core::RecordId;

    #[test]
    fn inventory_row_formats_cells() {
        let row = InventoryRow::from(&seed::demo_items().unwrap()[4]);
        assert_eq!(
            row,
            InventoryRow {
                id: "SKU005".to_string(),
                name: "Artisan Cheese".to_string(),
                category: "Dairy".to_string(),
                stock: "8".to_string(),
                cost: "$5.50".to_string(),
                low_stock: true,
            }
        );
    }

    #[test]
    fn supplier_row_uses_placeholders() {
        let supplier = Supplier::new(RecordId::parse("SUP09").unwrap(), "No Contact LLC");
        let row = SupplierRow::from(&supplier);
        assert_eq!(row.email, "--");
        assert_eq!(row.phone, "--");
    }

    #[test]
    fn category_options_are_distinct_and_skip_missing() {
        let mut items = seed::demo_items().unwrap();
        items.push(InventoryItem::new(RecordId::parse("SKU006").unwrap(), "Baguette", 12, 3.0).with_category("Bakery"));
        items.push(InventoryItem::new(RecordId::parse("SKU007").unwrap(), "Mystery Box", 1, 9.0));

        assert_eq!(
            category_options(&items),
            vec!["Produce", "Bakery", "Drinks", "Apparel", "Dairy"]
        );
    }
}
