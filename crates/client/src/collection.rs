//! Insertion-ordered collection of records keyed by their id.

use stockroom_core::{DomainError, DomainResult, Entity, Record, RecordId};

/// What [`Collection::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEffect {
    Appended,
    Merged,
}

/// Ordered sequence of records with unique ids.
///
/// All mutation goes through `save`/`remove`, which keep ids unique and
/// never rewrite an existing record's id.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from records, keeping the first of any duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let mut out = Self::new();
        for record in records {
            if out.position(record.id()).is_some() {
                tracing::warn!(collection = R::KIND.as_str(), id = %record.id(), "dropping duplicate record id");
                continue;
            }
            out.records.push(record);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.is(id))
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.is(id))
    }

    /// Resolve the id a save targets, rejecting a draft whose own id
    /// disagrees with the requested one.
    pub fn target_id(target: Option<&RecordId>, draft: &R::Draft) -> DomainResult<RecordId> {
        match (target, R::draft_id(draft)) {
            (Some(target), Some(inner)) if target != inner => Err(DomainError::validation(format!(
                "payload id '{inner}' does not match target id '{target}'"
            ))),
            (Some(target), _) => Ok(target.clone()),
            (None, Some(inner)) => Ok(inner.clone()),
            (None, None) => Err(DomainError::validation("id is required")),
        }
    }

    /// Check a save would succeed without applying it.
    pub fn check_save(&self, target: Option<&RecordId>, draft: &R::Draft) -> DomainResult<()> {
        let id = Self::target_id(target, draft)?;
        match (target, self.get(&id)) {
            (Some(_), Some(existing)) => {
                let mut merged = existing.clone();
                merged.merge(draft.clone())
            }
            (None, Some(_)) => Err(DomainError::conflict(format!(
                "{} record '{id}' already exists",
                R::KIND
            ))),
            (_, None) => R::from_draft(id, draft.clone()).map(|_| ()),
        }
    }

    /// Merge into the record matching `target`, or append a new record.
    ///
    /// Without an explicit target a draft whose id already exists is a
    /// conflict: the caller meant to create, and ids must stay unique.
    pub fn save(&mut self, target: Option<&RecordId>, draft: R::Draft) -> DomainResult<(R, SaveEffect)> {
        let id = Self::target_id(target, &draft)?;
        match (target, self.position(&id)) {
            (Some(_), Some(idx)) => {
                let mut updated = self.records[idx].clone();
                updated.merge(draft)?;
                self.records[idx] = updated.clone();
                Ok((updated, SaveEffect::Merged))
            }
            (None, Some(_)) => Err(DomainError::conflict(format!(
                "{} record '{id}' already exists",
                R::KIND
            ))),
            (_, None) => {
                let record = R::from_draft(id, draft)?;
                self.records.push(record.clone());
                Ok((record, SaveEffect::Appended))
            }
        }
    }

    /// Remove the record with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.records.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn to_vec(&self) -> Vec<R> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::{InventoryItem, ItemDraft};

    fn test_id(raw: &str) -> RecordId {
        RecordId::parse(raw).unwrap()
    }

    fn item(id: &str, stock: f64) -> InventoryItem {
        InventoryItem::new(test_id(id), format!("Item {id}"), stock, 1.0)
    }

    fn new_draft(id: &str) -> ItemDraft {
        ItemDraft::default().id(test_id(id)).name("Test").stock(5).cost(1.0)
    }

    #[test]
    fn save_with_fresh_id_appends() {
        let mut items = Collection::from_records(vec![item("SKU001", 1.0)]);
        let (saved, effect) = items.save(None, new_draft("SKU010")).unwrap();

        assert_eq!(effect, SaveEffect::Appended);
        assert_eq!(items.len(), 2);
        assert_eq!(items.as_slice()[1], saved);
    }

    #[test]
    fn save_with_target_that_does_not_exist_appends() {
        let mut items: Collection<InventoryItem> = Collection::new();
        let draft = ItemDraft::default().name("Test").stock(5).cost(1.0);
        let (saved, effect) = items.save(Some(&test_id("SKU011")), draft).unwrap();

        assert_eq!(effect, SaveEffect::Appended);
        assert_eq!(saved.id().as_str(), "SKU011");
    }

    #[test]
    fn save_with_existing_target_merges_in_place() {
        let mut items = Collection::from_records(vec![item("SKU001", 1.0), item("SKU002", 2.0)]);
        let (saved, effect) = items
            .save(Some(&test_id("SKU001")), ItemDraft::default().stock(40))
            .unwrap();

        assert_eq!(effect, SaveEffect::Merged);
        assert_eq!(items.len(), 2);
        assert_eq!(saved.stock(), 40.0);
        assert_eq!(items.as_slice()[0].stock(), 40.0);
        assert_eq!(items.as_slice()[0].name(), "Item SKU001");
    }

    #[test]
    fn create_with_existing_id_is_a_conflict() {
        let mut items = Collection::from_records(vec![item("SKU001", 1.0)]);
        let err = items.save(None, new_draft("SKU001")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn mismatched_payload_id_is_rejected() {
        let mut items = Collection::from_records(vec![item("SKU001", 1.0)]);
        let draft = ItemDraft::default().id(test_id("SKU999")).stock(3);
        let err = items.save(Some(&test_id("SKU001")), draft).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(items.as_slice()[0].stock(), 1.0);
    }

    #[test]
    fn missing_id_is_rejected() {
        let mut items: Collection<InventoryItem> = Collection::new();
        let draft = ItemDraft::default().name("Test").stock(5).cost(1.0);
        assert!(matches!(items.save(None, draft), Err(DomainError::Validation(_))));
    }

    #[test]
    fn check_save_matches_save() {
        let items = Collection::from_records(vec![item("SKU001", 1.0)]);
        assert!(items.check_save(None, &new_draft("SKU002")).is_ok());
        assert!(items.check_save(None, &new_draft("SKU001")).is_err());
        assert!(items
            .check_save(Some(&test_id("SKU001")), &ItemDraft::default().name(" "))
            .is_err());
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let mut items = Collection::from_records(vec![item("SKU001", 1.0)]);
        assert!(!items.remove(&test_id("SKU404")));
        assert_eq!(items.len(), 1);
        assert!(items.remove(&test_id("SKU001")));
        assert!(items.is_empty());
    }

    #[test]
    fn from_records_drops_duplicate_ids() {
        let items = Collection::from_records(vec![item("SKU001", 1.0), item("SKU001", 9.0)]);
        assert_eq!(items.len(), 1);
        assert_eq!(items.as_slice()[0].stock(), 1.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn seeded(n: usize) -> Collection<InventoryItem> {
            Collection::from_records((0..n).map(|i| item(&format!("SKU{i:03}"), i as f64)))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                .. ProptestConfig::default()
            })]

            #[test]
            fn fresh_save_grows_by_one(n in 0usize..20, stock in -1.0e9f64..1.0e9) {
                let mut items = seeded(n);
                let draft = ItemDraft::default().id(test_id("NEW")).name("Fresh").stock(stock).cost(2.5);
                let (saved, _) = items.save(None, draft).unwrap();

                prop_assert_eq!(items.len(), n + 1);
                prop_assert_eq!(saved.stock(), stock);
                prop_assert_eq!(saved.name(), "Fresh");
                prop_assert_eq!(items.get(&test_id("NEW")), Some(&saved));
            }

            #[test]
            fn update_keeps_length_and_untouched_fields(n in 1usize..20, pick in any::<prop::sample::Index>(), stock in -1.0e9f64..1.0e9) {
                let mut items = seeded(n);
                let before = items.as_slice()[pick.index(n)].clone();
                let (after, _) = items.save(Some(before.id()), ItemDraft::default().stock(stock)).unwrap();

                prop_assert_eq!(items.len(), n);
                prop_assert_eq!(after.stock(), stock);
                prop_assert_eq!(after.name(), before.name());
                prop_assert_eq!(after.cost(), before.cost());
                prop_assert_eq!(after.id(), before.id());
            }

            #[test]
            fn delete_existing_shrinks_by_one(n in 1usize..20, pick in any::<prop::sample::Index>()) {
                let mut items = seeded(n);
                let id = items.as_slice()[pick.index(n)].id().clone();

                prop_assert!(items.remove(&id));
                prop_assert_eq!(items.len(), n - 1);
                prop_assert!(items.get(&id).is_none());
            }
        }
    }
}
