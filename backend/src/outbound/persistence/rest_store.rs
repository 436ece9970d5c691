//! Reqwest-backed client for the hosted data store's REST API.
//!
//! This adapter owns transport details only: request serialisation, auth
//! headers, timeout and HTTP error mapping, and JSON decoding into wire
//! rows. The store exposes one endpoint per table and accepts
//! `column=op.value` query filters.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Transport and protocol errors raised by [`RestStore`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The request never completed: connect failure or timeout.
    #[error("data store unreachable: {0}")]
    Unreachable(String),
    /// The store rejected a write with a uniqueness conflict.
    #[error("data store conflict: {0}")]
    Conflict(String),
    /// Any other non-success status.
    #[error("data store returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The response body did not decode into the expected rows.
    #[error("data store response did not decode: {0}")]
    Decode(String),
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    StoreError::Unreachable(error.to_string())
}

/// Shared client for the table endpoints.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
    service_key: String,
}

impl RestStore {
    /// Build a store client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            service_key: service_key.into(),
        })
    }

    fn table_url(&self, table: &str, query: &[(&str, String)]) -> Result<Url, StoreError> {
        let mut url = self
            .base
            .join(table)
            .map_err(|e| StoreError::Decode(format!("invalid table url: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(header::ACCEPT, "application/json")
    }

    async fn decode_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict(
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        if body.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Select rows matching the filters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, query)?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::decode_rows(response).await
    }

    /// Insert one row and return its stored representation.
    pub async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.table_url(table, &[])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let mut rows: Vec<T> = Self::decode_rows(response).await?;
        rows.pop()
            .ok_or_else(|| StoreError::Decode("insert returned no representation".to_owned()))
    }

    /// Patch rows matching the filters and return their stored
    /// representations.
    pub async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, query)?;
        let response = self
            .request(reqwest::Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::decode_rows(response).await
    }

    /// Delete rows matching the filters, returning how many were removed.
    pub async fn delete(&self, table: &str, query: &[(&str, String)]) -> Result<u64, StoreError> {
        let url = self.table_url(table, query)?;
        let response = self
            .request(reqwest::Method::DELETE, url)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(map_transport_error)?;
        let rows: Vec<serde_json::Value> = Self::decode_rows(response).await?;
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls_preserve_base_path() {
        let base: Url = "https://store.example/rest/v1/".parse().expect("valid url");
        let store =
            RestStore::new(base, "key", Duration::from_secs(5)).expect("client builds");
        let url = store
            .table_url("cards", &[("status", "eq.pending".to_owned())])
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://store.example/rest/v1/cards?status=eq.pending",
        );
    }
}
