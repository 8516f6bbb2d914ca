//! Demo data installed when no persistence service is reachable.

use stockroom_core::{DomainResult, RecordId};
use stockroom_inventory::InventoryItem;
use stockroom_parties::Supplier;

/// Initial contents for both collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seed {
    pub items: Vec<InventoryItem>,
    pub suppliers: Vec<Supplier>,
}

impl Seed {
    /// The shop's demo catalogue.
    pub fn demo() -> DomainResult<Self> {
        Ok(Self {
            items: demo_items()?,
            suppliers: demo_suppliers()?,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

pub fn demo_items() -> DomainResult<Vec<InventoryItem>> {
    let id = RecordId::parse;
    Ok(vec![
        InventoryItem::new(id("SKU001")?, "Organic Avocados", 15, 1.50)
            .with_category("Produce")
            .with_reorder_level(20),
        InventoryItem::new(id("SKU002")?, "Sourdough Loaf", 30, 2.75).with_category("Bakery"),
        InventoryItem::new(id("SKU003")?, "Cold Brew Cans", 100, 2.10).with_category("Drinks"),
        InventoryItem::new(id("SKU004")?, "LA Map T-Shirt", 75, 8.00).with_category("Apparel"),
        InventoryItem::new(id("SKU005")?, "Artisan Cheese", 8, 5.50)
            .with_category("Dairy")
            .with_reorder_level(10),
    ])
}

pub fn demo_suppliers() -> DomainResult<Vec<Supplier>> {
    let id = RecordId::parse;
    Ok(vec![
        Supplier::new(id("SUP01")?, "California Farms Co.")
            .with_email("orders@cafarms.com")
            .with_phone("213-555-1234"),
        Supplier::new(id("SUP02")?, "LA Bread Bakers")
            .with_email("hello@labread.com")
            .with_phone("310-555-5678"),
        Supplier::new(id("SUP03")?, "Local Threads Inc.")
            .with_email("sales@localthreads.co")
            .with_phone("818-555-9012"),
    ])
}
