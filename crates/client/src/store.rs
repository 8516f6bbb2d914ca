//! Record store: the single source of truth for items and suppliers.
//!
//! Every mutation goes through a named operation that validates locally,
//! asks the transport to persist, and then updates the in-memory collection
//! before returning. Mutations are serialized by an async write gate; reads
//! take a snapshot under a short read lock and never wait on the transport.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use stockroom_core::{DomainError, Record, RecordId};
use stockroom_inventory::{InventoryItem, ItemDraft};
use stockroom_parties::{Supplier, SupplierDraft};

use crate::collection::{Collection, SaveEffect};
use crate::config::ClientConfig;
use crate::seed::Seed;
use crate::transport::{HttpTransport, StubTransport, Transport, TransportError, TransportKind};
use crate::types::{DeleteOutcome, LoadReport, LoadSource, Persistence, SaveOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Default)]
struct StoreState {
    items: Collection<InventoryItem>,
    suppliers: Collection<Supplier>,
    loaded_at: Option<DateTime<Utc>>,
}

/// Per-record-type plumbing: which collection it lives in and which
/// transport operations persist it.
#[async_trait]
trait Stored: Record {
    fn slot(state: &StoreState) -> &Collection<Self>;
    fn slot_mut(state: &mut StoreState) -> &mut Collection<Self>;

    async fn persist_save(
        transport: &dyn Transport,
        draft: &Self::Draft,
        id: Option<&RecordId>,
    ) -> Result<(), TransportError>;

    async fn persist_delete(transport: &dyn Transport, id: &RecordId) -> Result<(), TransportError>;
}

#[async_trait]
impl Stored for InventoryItem {
    fn slot(state: &StoreState) -> &Collection<Self> {
        &state.items
    }

    fn slot_mut(state: &mut StoreState) -> &mut Collection<Self> {
        &mut state.items
    }

    async fn persist_save(
        transport: &dyn Transport,
        draft: &ItemDraft,
        id: Option<&RecordId>,
    ) -> Result<(), TransportError> {
        transport.save_item(draft, id).await
    }

    async fn persist_delete(transport: &dyn Transport, id: &RecordId) -> Result<(), TransportError> {
        transport.delete_item(id).await
    }
}

#[async_trait]
impl Stored for Supplier {
    fn slot(state: &StoreState) -> &Collection<Self> {
        &state.suppliers
    }

    fn slot_mut(state: &mut StoreState) -> &mut Collection<Self> {
        &mut state.suppliers
    }

    async fn persist_save(
        transport: &dyn Transport,
        draft: &SupplierDraft,
        id: Option<&RecordId>,
    ) -> Result<(), TransportError> {
        transport.save_supplier(draft, id).await
    }

    async fn persist_delete(transport: &dyn Transport, id: &RecordId) -> Result<(), TransportError> {
        transport.delete_supplier(id).await
    }
}

pub struct RecordStore {
    transport: Arc<dyn Transport>,
    seed: Option<Seed>,
    state: RwLock<StoreState>,
    write_gate: tokio::sync::Mutex<()>,
}

impl core::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordStore")
            .field("transport", &self.transport.kind())
            .field("seeded", &self.seed.is_some())
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Create an empty store backed by `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            seed: None,
            state: RwLock::new(StoreState::default()),
            write_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a store that falls back to `seed` when the initial load fails.
    pub fn with_seed(transport: Arc<dyn Transport>, seed: Seed) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(transport)
        }
    }

    /// Build the transport selected by `config` and a store around it.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreError> {
        let transport: Arc<dyn Transport> = match &config.api_url {
            Some(url) => {
                let http = HttpTransport::new(url.clone(), config.timeout)?;
                tracing::info!(endpoint = http.endpoint(), timeout = ?config.timeout, "using HTTP transport");
                Arc::new(http)
            }
            None => Arc::new(StubTransport::with_latency(config.stub_latency)),
        };
        tracing::info!(transport = ?transport.kind(), seed_demo_data = config.seed_demo_data, "record store created");

        Ok(if config.seed_demo_data {
            Self::with_seed(transport, Seed::demo()?)
        } else {
            Self::new(transport)
        })
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Populate both collections from the transport.
    ///
    /// On failure the seed (if any) is installed, otherwise both collections
    /// are left empty; the failure is reported, never raised.
    pub async fn load_initial(&self) -> LoadReport {
        let _gate = self.write_gate.lock().await;

        let fetched = async {
            let items = self.transport.fetch_items().await?;
            let suppliers = self.transport.fetch_suppliers().await?;
            Ok::<_, TransportError>((items, suppliers))
        }
        .await;

        let (items, suppliers, source, error) = match fetched {
            Ok((items, suppliers)) => (items, suppliers, LoadSource::Remote, None),
            Err(err) => {
                tracing::warn!(error = %err, seeded = self.seed.is_some(), "failed to load initial data");
                match &self.seed {
                    Some(seed) => (seed.items.clone(), seed.suppliers.clone(), LoadSource::Seed, Some(err)),
                    None => (Vec::new(), Vec::new(), LoadSource::Empty, Some(err)),
                }
            }
        };

        let loaded_at = Utc::now();
        let (item_count, supplier_count) = self.write(|state| {
            state.items = Collection::from_records(items);
            state.suppliers = Collection::from_records(suppliers);
            state.loaded_at = Some(loaded_at);
            (state.items.len(), state.suppliers.len())
        });

        tracing::info!(
            source = ?source,
            items = item_count,
            suppliers = supplier_count,
            "initial data loaded"
        );

        LoadReport {
            source,
            items: item_count,
            suppliers: supplier_count,
            error,
            loaded_at,
        }
    }

    /// Drop all in-memory state; the store can be loaded again afterwards.
    pub async fn teardown(&self) {
        let _gate = self.write_gate.lock().await;
        self.write(|state| {
            state.items.clear();
            state.suppliers.clear();
            state.loaded_at = None;
        });
        tracing::info!("record store torn down");
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.read(|state| state.loaded_at)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at().is_some()
    }

    /// Snapshot of the inventory, in collection order.
    pub fn items(&self) -> Vec<InventoryItem> {
        self.read(|state| state.items.to_vec())
    }

    /// Snapshot of the suppliers, in collection order.
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.read(|state| state.suppliers.to_vec())
    }

    pub fn find_item(&self, id: &RecordId) -> Option<InventoryItem> {
        self.read(|state| state.items.get(id).cloned())
    }

    pub fn find_supplier(&self, id: &RecordId) -> Option<Supplier> {
        self.read(|state| state.suppliers.get(id).cloned())
    }

    /// Create (no match for `id`) or update (match) an inventory item.
    pub async fn save_item(
        &self,
        draft: ItemDraft,
        id: Option<&RecordId>,
    ) -> Result<SaveOutcome<InventoryItem>, StoreError> {
        self.save_record(draft, id).await
    }

    /// Create (no match for `id`) or update (match) a supplier.
    pub async fn save_supplier(
        &self,
        draft: SupplierDraft,
        id: Option<&RecordId>,
    ) -> Result<SaveOutcome<Supplier>, StoreError> {
        self.save_record(draft, id).await
    }

    /// Delete an inventory item; a missing id is a no-op.
    pub async fn delete_item(&self, id: &RecordId) -> Result<DeleteOutcome, StoreError> {
        self.delete_record::<InventoryItem>(id).await
    }

    /// Delete a supplier; a missing id is a no-op.
    pub async fn delete_supplier(&self, id: &RecordId) -> Result<DeleteOutcome, StoreError> {
        self.delete_record::<Supplier>(id).await
    }

    async fn save_record<R: Stored>(
        &self,
        draft: R::Draft,
        id: Option<&RecordId>,
    ) -> Result<SaveOutcome<R>, StoreError> {
        let _gate = self.write_gate.lock().await;

        self.read(|state| R::slot(state).check_save(id, &draft))?;

        let persisted = R::persist_save(self.transport.as_ref(), &draft, id).await;
        let persistence = settle(persisted)?;

        let (record, effect) = self.write(|state| R::slot_mut(state).save(id, draft))?;
        let created = effect == SaveEffect::Appended;

        tracing::info!(
            collection = R::KIND.as_str(),
            id = %record.id(),
            created,
            persistence = ?persistence,
            "record saved"
        );

        Ok(SaveOutcome {
            record,
            created,
            persistence,
        })
    }

    async fn delete_record<R: Stored>(&self, id: &RecordId) -> Result<DeleteOutcome, StoreError> {
        let _gate = self.write_gate.lock().await;

        let persisted = R::persist_delete(self.transport.as_ref(), id).await;
        let persistence = settle(persisted)?;

        let removed = self.write(|state| R::slot_mut(state).remove(id));
        if removed {
            tracing::info!(collection = R::KIND.as_str(), %id, persistence = ?persistence, "record deleted");
        } else {
            tracing::debug!(collection = R::KIND.as_str(), %id, "delete target not found; nothing removed");
        }

        Ok(DeleteOutcome {
            id: id.clone(),
            removed,
            persistence,
        })
    }
}

/// Map a transport result onto where the change lives.
///
/// A missing persistence service means the change is kept in memory only;
/// any other failure aborts the operation.
fn settle(result: Result<(), TransportError>) -> Result<Persistence, TransportError> {
    match result {
        Ok(()) => Ok(Persistence::Remote),
        Err(err) if err.is_not_implemented() => {
            tracing::debug!(error = %err, "no persistence service; applying change locally");
            Ok(Persistence::LocalOnly)
        }
        Err(err) => {
            tracing::warn!(error = %err, "persistence failed; in-memory state unchanged");
            Err(err)
        }
    }
}
