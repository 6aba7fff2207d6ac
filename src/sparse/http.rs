//! JSON-over-HTTP fetcher.

use std::marker::PhantomData;
use std::ops::Range;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::config::SparseArrayConfig;
use super::fetch::Fetch;
use crate::error::BoxError;

/// Fetches pages from a JSON endpoint described by a [`SparseArrayConfig`].
///
/// The request URL is `json_url` with the range substituted; the elements are
/// the array stored under `json_items_key` in the response object. The total
/// length, when `length_url` is set, is read from a `length` field (or from
/// the body itself, if it is a bare number).
#[derive(Debug, Clone)]
pub struct JsonFetcher<T> {
    client: reqwest::Client,
    config: SparseArrayConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFetcher<T> {
    /// Create a fetcher with a default client.
    pub fn new(config: SparseArrayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a fetcher sharing an existing client.
    pub fn with_client(client: reqwest::Client, config: SparseArrayConfig) -> Self {
        Self {
            client,
            config,
            _marker: PhantomData,
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, BoxError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl<T> Fetch<T> for JsonFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, range: Range<usize>) -> Result<Vec<T>, BoxError> {
        let url = self.config.format_url(&range);
        debug!(%url, "requesting page");
        let body = self.get_json(&url).await?;
        extract_items(body, &self.config.json_items_key)
    }

    async fn length(&self) -> Result<Option<usize>, BoxError> {
        let Some(url) = &self.config.length_url else {
            return Ok(None);
        };
        let body = self.get_json(url).await?;
        extract_length(&body)
            .map(Some)
            .ok_or_else(|| BoxError::from(format!("no length in response from {url}")))
    }
}

fn extract_items<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<Vec<T>, BoxError> {
    let items = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| BoxError::from(format!("response has no '{key}' field")))?;
    Ok(serde_json::from_value(items)?)
}

fn extract_length(body: &Value) -> Option<usize> {
    body.get("length")
        .unwrap_or(body)
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
}
