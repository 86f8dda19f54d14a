//! Built-in sample dataset for offline previews

use serde_json::Value;

use super::fields::record_from_json;
use crate::types::{MovieRecord, Result};

const SAMPLE_MOVIES: &str = include_str!("../../assets/sample_movies.json");

/// Sample movies as records, through the same field adapter as list data
pub fn sample_records() -> Result<Vec<MovieRecord>> {
    let movies: Vec<Value> = serde_json::from_str(SAMPLE_MOVIES)?;
    Ok(movies.iter().filter_map(record_from_json).collect())
}
