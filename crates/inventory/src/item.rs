use serde::{Deserialize, Serialize};

use stockroom_core::{CollectionKind, DomainError, DomainResult, Entity, FieldValue, Record, RecordId};

/// Reorder level assumed when an item does not define one.
pub const DEFAULT_REORDER_LEVEL: f64 = 20.0;

/// Record: InventoryItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: RecordId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    stock: f64,
    cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reorder_level: Option<f64>,
}

impl InventoryItem {
    pub fn new(id: RecordId, name: impl Into<String>, stock: impl Into<f64>, cost: f64) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            stock: stock.into(),
            cost,
            reorder_level: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(Some(category.into()));
        self
    }

    pub fn with_reorder_level(mut self, level: impl Into<f64>) -> Self {
        self.reorder_level = Some(level.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock(&self) -> f64 {
        self.stock
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn reorder_level(&self) -> Option<f64> {
        self.reorder_level
    }

    /// Reorder level used for low-stock evaluation.
    pub fn effective_reorder_level(&self) -> f64 {
        self.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL)
    }

    /// An item is low on stock when it holds fewer units than its reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.effective_reorder_level()
    }

    /// Unit cost formatted for display (`$1.50`).
    pub fn display_cost(&self) -> String {
        format!("${:.2}", self.cost)
    }
}

impl Entity for InventoryItem {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial inventory item: the payload of a create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A blank category clears the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<f64>,
}

impl ItemDraft {
    pub fn id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn stock(mut self, stock: impl Into<f64>) -> Self {
        self.stock = Some(stock.into());
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn reorder_level(mut self, level: impl Into<f64>) -> Self {
        self.reorder_level = Some(level.into());
        self
    }
}

impl From<&InventoryItem> for ItemDraft {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: Some(item.name.clone()),
            category: item.category.clone(),
            stock: Some(item.stock),
            cost: Some(item.cost),
            reorder_level: item.reorder_level,
        }
    }
}

impl Record for InventoryItem {
    type Draft = ItemDraft;

    const KIND: CollectionKind = CollectionKind::Inventory;
    const SORT_KEYS: &'static [&'static str] =
        &["id", "name", "category", "stock", "cost", "reorderLevel"];
    const CATEGORIZED: bool = true;

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::from(self.id.as_str())),
            "name" => Some(FieldValue::from(self.name.as_str())),
            "category" => self.category.as_deref().map(FieldValue::from),
            "stock" => Some(FieldValue::from(self.stock)),
            "cost" => Some(FieldValue::from(self.cost)),
            "reorderLevel" => self.reorder_level.map(FieldValue::from),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.category.clone().unwrap_or_default(),
            self.stock.to_string(),
            self.display_cost(),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn draft_id(draft: &ItemDraft) -> Option<&RecordId> {
        draft.id.as_ref()
    }

    fn validate_draft(draft: &ItemDraft) -> DomainResult<()> {
        if let Some(name) = &draft.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        let numbers = [("stock", draft.stock), ("cost", draft.cost), ("reorder level", draft.reorder_level)];
        for (field, value) in numbers {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(DomainError::validation(format!("{field} must be a finite number")));
            }
        }
        Ok(())
    }

    fn from_draft(id: RecordId, draft: ItemDraft) -> DomainResult<Self> {
        Self::validate_draft(&draft)?;
        let name = draft
            .name
            .ok_or_else(|| DomainError::validation("name is required"))?;
        let stock = draft
            .stock
            .ok_or_else(|| DomainError::validation("stock is required"))?;
        let cost = draft
            .cost
            .ok_or_else(|| DomainError::validation("cost is required"))?;

        Ok(Self {
            id,
            name: name.trim().to_string(),
            category: non_blank(draft.category),
            stock,
            cost,
            reorder_level: draft.reorder_level,
        })
    }

    fn merge(&mut self, draft: ItemDraft) -> DomainResult<()> {
        Self::validate_draft(&draft)?;
        if let Some(name) = draft.name {
            self.name = name.trim().to_string();
        }
        if draft.category.is_some() {
            self.category = non_blank(draft.category);
        }
        if let Some(stock) = draft.stock {
            self.stock = stock;
        }
        if let Some(cost) = draft.cost {
            self.cost = cost;
        }
        if let Some(level) = draft.reorder_level {
            self.reorder_level = Some(level);
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    })
}
