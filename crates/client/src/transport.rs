//! Boundary to the remote persistence service.
//!
//! Every operation is a single request/response exchange using the
//! [`ApiRequest`]/[`ApiResponse`] envelope. Implementations only provide
//! [`Transport::call`]; the typed operations are built on top of it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use stockroom_core::RecordId;
use stockroom_inventory::{InventoryItem, ItemDraft};
use stockroom_parties::{Supplier, SupplierDraft};

use crate::types::{Action, ApiRequest, ApiResponse, ApiStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{action}: persistence service is not implemented")]
    NotImplemented { action: Action },
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("server error: {0}")]
    Server(String),
}

impl TransportError {
    /// The stub transport's failure: there is no service to talk to at all.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, TransportError::NotImplemented { .. })
    }
}

/// Which transport variant a client was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stub,
    Http,
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Perform one exchange; returns the response `data` (`Null` when absent).
    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError>;

    async fn fetch_items(&self) -> Result<Vec<InventoryItem>, TransportError> {
        let data = self.call(ApiRequest::new(Action::GetInventory)).await?;
        decode(data)
    }

    async fn fetch_suppliers(&self) -> Result<Vec<Supplier>, TransportError> {
        let data = self.call(ApiRequest::new(Action::GetSuppliers)).await?;
        decode(data)
    }

    async fn save_item(&self, draft: &ItemDraft, id: Option<&RecordId>) -> Result<(), TransportError> {
        let request = with_id(ApiRequest::new(Action::SaveInventoryItem), id)
            .with("itemData", encode(draft)?);
        self.call(request).await.map(|_| ())
    }

    async fn save_supplier(
        &self,
        draft: &SupplierDraft,
        id: Option<&RecordId>,
    ) -> Result<(), TransportError> {
        let request = with_id(ApiRequest::new(Action::SaveSupplier), id)
            .with("supplierData", encode(draft)?);
        self.call(request).await.map(|_| ())
    }

    async fn delete_item(&self, id: &RecordId) -> Result<(), TransportError> {
        let request = with_id(ApiRequest::new(Action::DeleteInventoryItem), Some(id));
        self.call(request).await.map(|_| ())
    }

    async fn delete_supplier(&self, id: &RecordId) -> Result<(), TransportError> {
        let request = with_id(ApiRequest::new(Action::DeleteSupplier), Some(id));
        self.call(request).await.map(|_| ())
    }
}

fn with_id(request: ApiRequest, id: Option<&RecordId>) -> ApiRequest {
    match id {
        Some(id) => request.with("id", Value::String(id.to_string())),
        None => request,
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, TransportError> {
    serde_json::to_value(value)
        .map_err(|e| TransportError::Malformed(format!("failed to encode payload: {e}")))
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, TransportError> {
    if data.is_null() {
        return Err(TransportError::Malformed("response carried no data".to_string()));
    }
    serde_json::from_value(data)
        .map_err(|e| TransportError::Malformed(format!("failed to decode data: {e}")))
}

/// Transport used while no persistence service exists: every call fails
/// with [`TransportError::NotImplemented`].
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    latency: Duration,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, to exercise the UI against a slow "network".
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Stub
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::debug!(action = %request.action, "stub transport call (not implemented)");
        Err(TransportError::NotImplemented {
            action: request.action,
        })
    }
}

/// JSON-over-HTTP transport: POSTs the envelope to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let action = request.action;
        tracing::debug!(%action, endpoint = %self.endpoint, "sending request");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%action, status = status.as_u16(), "persistence service returned an error status");
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Malformed(e.to_string()))?;

        match parsed.status {
            ApiStatus::Ok => Ok(parsed.data.unwrap_or(Value::Null)),
            ApiStatus::Error => {
                let message = parsed
                    .message
                    .unwrap_or_else(|| "unknown API error".to_string());
                tracing::warn!(%action, %message, "persistence service reported an error");
                Err(TransportError::Server(message))
            }
        }
    }
}
