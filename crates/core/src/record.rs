//! The `Record` abstraction shared by every collection the client manages.
//!
//! A record is an entity with a user-assigned [`RecordId`], a set of named
//! fields the query layer can sort on, and the rendered cells a table shows
//! (which is what free-text search matches against).

use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainResult;
use crate::id::RecordId;

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Inventory,
    Suppliers,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Inventory => "inventory",
            CollectionKind::Suppliers => "suppliers",
        }
    }
}

impl core::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value as seen by sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Lower-cased string form used for case-insensitive comparison.
    pub fn folded(&self) -> String {
        match self {
            FieldValue::Text(s) => s.to_lowercase(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    /// Compare two (possibly missing) field values.
    ///
    /// Numbers compare numerically when both sides are numbers; every other
    /// combination compares the case-insensitive string forms, with a missing
    /// value treated as the empty string.
    pub fn compare(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        if let (Some(x), Some(y)) = (a.and_then(FieldValue::as_number), b.and_then(FieldValue::as_number)) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
        let x = a.map(FieldValue::folded).unwrap_or_default();
        let y = b.map(FieldValue::folded).unwrap_or_default();
        x.cmp(&y)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// A record stored in one of the client's collections.
///
/// `Draft` is the partial form of the record used as the payload of save
/// operations: every field is optional, a create requires the mandatory
/// ones, an update overlays whatever is present.
pub trait Record: Entity<Id = RecordId> + Clone + core::fmt::Debug + Send + Sync + 'static {
    type Draft: Clone + core::fmt::Debug + Serialize + Send + Sync + 'static;

    /// Collection this record type lives in.
    const KIND: CollectionKind;

    /// Field keys a table may be sorted by.
    const SORT_KEYS: &'static [&'static str];

    /// Whether the collection supports the category filter.
    const CATEGORIZED: bool = false;

    /// Value of the named field, `None` if unset or unknown.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Rendered table cells, in column order.
    fn cells(&self) -> Vec<String>;

    fn category(&self) -> Option<&str> {
        None
    }

    /// Identifier carried inside a draft, if any.
    fn draft_id(draft: &Self::Draft) -> Option<&RecordId>;

    /// Check the fields present in a draft are well-formed.
    fn validate_draft(draft: &Self::Draft) -> DomainResult<()>;

    /// Build a new record from a draft; required fields must be present.
    fn from_draft(id: RecordId, draft: Self::Draft) -> DomainResult<Self>;

    /// Overlay the fields present in `draft` onto `self`. The id never changes.
    fn merge(&mut self, draft: Self::Draft) -> DomainResult<()>;
}
