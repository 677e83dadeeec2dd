//! Contract with the protocol collaborator that actually shoots requests.
mod client;

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::error::TransportError;

pub use client::HttpTransport;

/// Materialized request for one step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// What the collaborator hands back after a request completes.
#[derive(Debug, Clone, Default)]
pub struct ResponseParts {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseParts {
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the call described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or the exchange fails.
    async fn send(&self, request: RequestParts) -> Result<ResponseParts, TransportError>;
}
