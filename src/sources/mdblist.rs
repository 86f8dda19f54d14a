//! MDBList client
//!
//! The list API has no single stable "browse" endpoint, so a fixed
//! sequence of endpoints is probed until one yields movie items. Response
//! shapes vary between endpoints; [`read_shape`] classifies them.

use serde_json::Value;

use super::fields::{has_rating_fields, record_from_json};
use crate::services::http::HttpClient;
use crate::types::{MovieRecord, Result};

const MDBLIST_BASE_URL: &str = "https://api.mdblist.com";

/// What an endpoint response turned out to hold
#[derive(Debug, PartialEq)]
pub(crate) enum ListShape {
    /// Movie items, ready to adapt
    Movies(Vec<Value>),
    /// A list descriptor whose items live at `/list/{id}`
    FollowList(String),
    Empty,
}

/// Rated movies from MDBList
pub struct MdbListClient {
    api_key: String,
    base_url: String,
}

impl MdbListClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, MDBLIST_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Probe endpoints in order and return up to `limit` rated movies.
    ///
    /// Individual endpoint failures are logged and skipped; an empty result
    /// means no endpoint produced rated items.
    pub fn rated_movies(&self, http: &HttpClient, limit: usize, year: i32) -> Vec<MovieRecord> {
        let items = self.probe(http, limit, year);
        select_rated(&items, limit)
            .iter()
            .filter_map(record_from_json)
            .collect()
    }

    fn probe(&self, http: &HttpClient, limit: usize, year: i32) -> Vec<Value> {
        let limit = limit.to_string();
        let year = year.to_string();
        let primary: [(&str, Vec<(&str, &str)>); 5] = [
            ("/list/1", vec![("limit", limit.as_str())]),
            ("/list/popular", vec![("limit", limit.as_str())]),
            ("/list/latest", vec![("limit", limit.as_str())]),
            (
                "/media",
                vec![("type", "movie"), ("limit", limit.as_str()), ("year", year.as_str())],
            ),
            ("/user/lists", vec![]),
        ];

        for (path, extra) in &primary {
            let items = match self.fetch_shape(http, path, extra) {
                Ok(ListShape::Movies(items)) => items,
                Ok(ListShape::FollowList(id)) => {
                    let path = format!("/list/{}", id);
                    match self.fetch_shape(http, &path, &[("limit", limit.as_str())]) {
                        Ok(ListShape::Movies(items)) => items,
                        Ok(_) => Vec::new(),
                        Err(e) => {
                            tracing::debug!("mdblist {}: {}", path, e);
                            Vec::new()
                        }
                    }
                }
                Ok(ListShape::Empty) => Vec::new(),
                Err(e) => {
                    tracing::debug!("mdblist {}: {}", path, e);
                    Vec::new()
                }
            };
            if !items.is_empty() {
                tracing::info!("mdblist {}: {} items", path, items.len());
                return items;
            }
        }

        for path in ["/list/1/items", "/lists/1"] {
            match self.fetch_shape(http, path, &[]) {
                Ok(ListShape::Movies(items)) if !items.is_empty() => {
                    tracing::info!("mdblist {}: {} items", path, items.len());
                    return items;
                }
                Ok(_) => {}
                Err(e) => tracing::debug!("mdblist {}: {}", path, e),
            }
        }

        Vec::new()
    }

    fn fetch_shape(
        &self,
        http: &HttpClient,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<ListShape> {
        let url = format!("{}{}", self.base_url, path);
        let mut query = vec![("apikey", self.api_key.as_str())];
        query.extend_from_slice(extra);

        tracing::debug!("trying {}", url);
        Ok(http
            .try_get_json(&url, &query)?
            .map_or(ListShape::Empty, |data| read_shape(&data)))
    }
}

/// Classify an endpoint response
pub(crate) fn read_shape(data: &Value) -> ListShape {
    match data {
        Value::Array(entries) => {
            let Some(first) = entries.first().and_then(Value::as_object) else {
                return ListShape::Empty;
            };
            if let Some(items) = first.get("items").and_then(Value::as_array) {
                return ListShape::Movies(items.clone());
            }
            if let Some(id) = ["id", "list_id"]
                .iter()
                .filter_map(|k| first.get(*k))
                .find_map(list_id)
            {
                return ListShape::FollowList(id);
            }
            ListShape::Movies(entries.clone())
        }
        Value::Object(obj) => ["items", "results", "movies", "data"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .map_or(ListShape::Empty, |items| ListShape::Movies(items.clone())),
        _ => ListShape::Empty,
    }
}

/// Keep object items carrying a rating, up to `limit`
pub(crate) fn select_rated(items: &[Value], limit: usize) -> Vec<Value> {
    items
        .iter()
        .filter(|item| item.is_object() && has_rating_fields(item))
        .take(limit)
        .cloned()
        .collect()
}

fn list_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
