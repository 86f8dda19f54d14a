//! Shared blocking HTTP client for API calls and page scraping

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::types::{MovieHeatError, Result};

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Rating sites serve bot user agents a stripped page
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Thin wrapper over a reqwest blocking client
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MovieHeatError::Http(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }

    /// GET a JSON document, failing on any non-success status
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// GET a JSON document; `None` when the server answers with a non-200
    pub fn try_get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<serde_json::Value>> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!("{} -> {}", url, status);
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }

    /// GET an HTML page with a browser user agent; `None` on non-200
    pub fn get_page(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!("{} -> {}", url, status);
            return Ok(None);
        }
        Ok(Some(response.text()?))
    }
}
