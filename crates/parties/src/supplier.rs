use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use stockroom_core::{CollectionKind, DomainError, DomainResult, Entity, FieldValue, Record, RecordId};

/// Placeholder shown for missing contact details.
const MISSING_CELL: &str = "--";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("email pattern is valid")
});

/// Basic email shape check (lower-case local part and domain, 2-4 letter TLD).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Record: Supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: RecordId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl Supplier {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(Some(email.into()));
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = non_blank(Some(phone.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

impl Entity for Supplier {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial supplier: the payload of a create or update.
///
/// Blank `email`/`phone` values clear the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl SupplierDraft {
    pub fn id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl From<&Supplier> for SupplierDraft {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: Some(supplier.id.clone()),
            name: Some(supplier.name.clone()),
            email: supplier.email.clone(),
            phone: supplier.phone.clone(),
        }
    }
}

impl Record for Supplier {
    type Draft = SupplierDraft;

    const KIND: CollectionKind = CollectionKind::Suppliers;
    const SORT_KEYS: &'static [&'static str] = &["id", "name", "email", "phone"];

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::from(self.id.as_str())),
            "name" => Some(FieldValue::from(self.name.as_str())),
            "email" => self.email.as_deref().map(FieldValue::from),
            "phone" => self.phone.as_deref().map(FieldValue::from),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone().unwrap_or_else(|| MISSING_CELL.to_string()),
            self.phone.clone().unwrap_or_else(|| MISSING_CELL.to_string()),
        ]
    }

    fn draft_id(draft: &SupplierDraft) -> Option<&RecordId> {
        draft.id.as_ref()
    }

    fn validate_draft(draft: &SupplierDraft) -> DomainResult<()> {
        if let Some(name) = &draft.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(email) = &draft.email {
            let email = email.trim();
            if !email.is_empty() && !is_valid_email(email) {
                return Err(DomainError::validation(format!("invalid email format: {email}")));
            }
        }
        Ok(())
    }

    fn from_draft(id: RecordId, draft: SupplierDraft) -> DomainResult<Self> {
        Self::validate_draft(&draft)?;
        let name = draft
            .name
            .ok_or_else(|| DomainError::validation("name is required"))?;

        Ok(Self {
            id,
            name: name.trim().to_string(),
            email: non_blank(draft.email),
            phone: non_blank(draft.phone),
        })
    }

    fn merge(&mut self, draft: SupplierDraft) -> DomainResult<()> {
        Self::validate_draft(&draft)?;
        if let Some(name) = draft.name {
            self.name = name.trim().to_string();
        }
        if draft.email.is_some() {
            self.email = non_blank(draft.email);
        }
        if draft.phone.is_some() {
            self.phone = non_blank(draft.phone);
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
