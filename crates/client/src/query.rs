//! Query engine: free-text search, category filter and sortable columns.
//!
//! Filtering and sorting are pure functions over record slices. The only
//! state is the last sort applied to each collection, which drives the
//! ascending/descending toggle of repeated sort requests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{CollectionKind, DomainError, DomainResult, FieldValue, Record};

/// Search term plus optional category constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub term: String,
    /// Exact category to keep; ignored for collections without categories.
    pub category: Option<String>,
}

impl Filter {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether a record is visible under this filter.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let term = self.term.to_lowercase();
        let text_match = term.is_empty()
            || record
                .cells()
                .iter()
                .any(|cell| cell.to_lowercase().contains(&term));

        let category_match = match (R::CATEGORIZED, self.active_category()) {
            (true, Some(wanted)) => record.category() == Some(wanted),
            _ => true,
        };

        text_match && category_match
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Records visible under `filter`, in their original order.
pub fn filter_records<R: Record>(records: &[R], filter: &Filter) -> Vec<R> {
    records
        .iter()
        .filter(|r| filter.matches(*r))
        .cloned()
        .collect()
}

/// Stable sort by one field.
pub fn sort_records<R: Record>(records: &mut [R], spec: &SortSpec) {
    records.sort_by(|a, b| {
        let left = a.field(&spec.key);
        let right = b.field(&spec.key);
        let ord = FieldValue::compare(left.as_ref(), right.as_ref());
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Holds the last applied sort per collection.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    sorts: HashMap<CollectionKind, SortSpec>,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sort request for `R`'s collection and return the sort to apply.
    ///
    /// Repeating the current key flips the direction; a new key starts ascending.
    pub fn request_sort<R: Record>(&mut self, key: &str) -> DomainResult<SortSpec> {
        if !R::SORT_KEYS.iter().any(|k| *k == key) {
            return Err(DomainError::validation(format!(
                "cannot sort {} by unknown field '{key}'",
                R::KIND
            )));
        }

        let direction = match self.sorts.get(&R::KIND) {
            Some(current) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Ascending,
        };
        let spec = SortSpec {
            key: key.to_string(),
            direction,
        };
        tracing::debug!(collection = R::KIND.as_str(), key, direction = direction.as_str(), "sort requested");
        self.sorts.insert(R::KIND, spec.clone());
        Ok(spec)
    }

    pub fn current_sort(&self, kind: CollectionKind) -> Option<&SortSpec> {
        self.sorts.get(&kind)
    }

    /// Filter, then apply the collection's current sort (if any).
    pub fn view<R: Record>(&self, records: &[R], filter: &Filter) -> Vec<R> {
        let mut visible = filter_records(records, filter);
        if let Some(spec) = self.sorts.get(&R::KIND) {
            sort_records(&mut visible, spec);
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use stockroom_core::RecordId;
    use stockroom_inventory::InventoryItem;
    use stockroom_parties::Supplier;

    fn ids<R: Record>(records: &[R]) -> Vec<String> {
        records.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let items = seed::demo_items().unwrap();
        let visible = filter_records(&items, &Filter::default());
        assert_eq!(visible, items);
    }

    #[test]
    fn term_matches_any_cell_case_insensitively() {
        let items = seed::demo_items().unwrap();
        let visible = filter_records(&items, &Filter::new("LOAF"));
        assert_eq!(ids(&visible), vec!["SKU002"]);

        // Rendered cost cells are searchable too.
        let visible = filter_records(&items, &Filter::new("$8.00"));
        assert_eq!(ids(&visible), vec!["SKU004"]);
    }

    #[test]
    fn category_filter_requires_exact_match() {
        let items = seed::demo_items().unwrap();
        let visible = filter_records(&items, &Filter::default().with_category("Dairy"));
        assert_eq!(ids(&visible), vec!["SKU005"]);

        let visible = filter_records(&items, &Filter::default().with_category("dairy"));
        assert!(visible.is_empty());
    }

    #[test]
    fn empty_category_is_no_constraint() {
        let items = seed::demo_items().unwrap();
        let visible = filter_records(&items, &Filter::default().with_category(""));
        assert_eq!(visible.len(), items.len());
    }

    #[test]
    fn category_filter_is_ignored_for_suppliers() {
        let suppliers = seed::demo_suppliers().unwrap();
        let visible = filter_records(&suppliers, &Filter::default().with_category("Produce"));
        assert_eq!(visible.len(), suppliers.len());
    }

    #[test]
    fn supplier_placeholder_cells_are_searchable() {
        let suppliers = vec![Supplier::new(RecordId::parse("SUP09").unwrap(), "No Contact LLC")];
        assert_eq!(filter_records(&suppliers, &Filter::new("--")).len(), 1);
    }

    #[test]
    fn sort_toggles_on_same_key_and_resets_on_new_key() {
        let mut engine = QueryEngine::new();
        assert_eq!(engine.request_sort::<InventoryItem>("stock").unwrap().direction, SortDirection::Ascending);
        assert_eq!(engine.request_sort::<InventoryItem>("stock").unwrap().direction, SortDirection::Descending);
        assert_eq!(engine.request_sort::<InventoryItem>("stock").unwrap().direction, SortDirection::Ascending);
        assert_eq!(engine.request_sort::<InventoryItem>("name").unwrap().direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_state_is_per_collection() {
        let mut engine = QueryEngine::new();
        engine.request_sort::<InventoryItem>("name").unwrap();
        let spec = engine.request_sort::<Supplier>("name").unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);
        assert_eq!(
            engine.current_sort(CollectionKind::Inventory),
            Some(&SortSpec::ascending("name"))
        );
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let mut engine = QueryEngine::new();
        let err = engine.request_sort::<Supplier>("stock").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(engine.current_sort(CollectionKind::Suppliers).is_none());
    }

    #[test]
    fn stock_ascending_and_descending_are_reverses() {
        let mut engine = QueryEngine::new();
        let items = seed::demo_items().unwrap();

        engine.request_sort::<InventoryItem>("stock").unwrap();
        let asc = engine.view(&items, &Filter::default());
        engine.request_sort::<InventoryItem>("stock").unwrap();
        let mut desc = engine.view(&items, &Filter::default());

        assert_eq!(ids(&asc), vec!["SKU005", "SKU001", "SKU002", "SKU004", "SKU003"]);
        let mut direct = items.clone();
        sort_records(&mut direct, &SortSpec::descending("stock"));
        assert_eq!(direct, desc);

        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn text_sort_is_case_insensitive() {
        let mut items = vec![
            InventoryItem::new(RecordId::parse("A").unwrap(), "banana", 1, 1.0),
            InventoryItem::new(RecordId::parse("B").unwrap(), "Apple", 1, 1.0),
            InventoryItem::new(RecordId::parse("C").unwrap(), "cherry", 1, 1.0),
        ];
        sort_records(&mut items, &SortSpec::ascending("name"));
        assert_eq!(ids(&items), vec!["B", "A", "C"]);
    }

    #[test]
    fn missing_values_sort_first_ascending() {
        let mut items = vec![
            InventoryItem::new(RecordId::parse("A").unwrap(), "x", 1, 1.0).with_category("Bakery"),
            InventoryItem::new(RecordId::parse("B").unwrap(), "y", 1, 1.0),
        ];
        sort_records(&mut items, &SortSpec::ascending("category"));
        assert_eq!(ids(&items), vec!["B", "A"]);
    }

    #[test]
    fn view_filters_before_sorting() {
        let mut engine = QueryEngine::new();
        engine.request_sort::<InventoryItem>("cost").unwrap();
        engine.request_sort::<InventoryItem>("cost").unwrap();

        let visible = engine.view(&seed::demo_items().unwrap(), &Filter::new("o"));
        let costs: Vec<f64> = visible.iter().map(|i| i.cost()).collect();
        let mut expected = costs.clone();
        expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(costs, expected);
        assert!(visible.iter().all(|i| Filter::new("o").matches(i)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn items_from(stocks: &[f64]) -> Vec<InventoryItem> {
            stocks
                .iter()
                .enumerate()
                .map(|(i, s)| InventoryItem::new(RecordId::parse(&format!("P{i}")).unwrap(), format!("p{i}"), *s, 1.0))
                .collect()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                .. ProptestConfig::default()
            })]

            #[test]
            fn filtered_view_is_an_ordered_subsequence(stocks in proptest::collection::vec(-50.0f64..50.0, 0..30), term in "[0-9p]{0,2}") {
                let items = items_from(&stocks);
                let visible = filter_records(&items, &Filter::new(term.clone()));
                let mut cursor = items.iter();
                for record in &visible {
                    prop_assert!(cursor.any(|r| r == record));
                    prop_assert!(Filter::new(term.clone()).matches(record));
                }
            }

            #[test]
            fn ascending_stock_sort_is_ordered(stocks in proptest::collection::vec(-50.0f64..50.0, 0..30)) {
                let mut items = items_from(&stocks);
                sort_records(&mut items, &SortSpec::ascending("stock"));
                prop_assert!(items.windows(2).all(|w| w[0].stock() <= w[1].stock()));
            }
        }
    }
}
