//! CinemaScore provider: opening-night audience letter grade

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

use super::RatingProvider;
use crate::services::http::HttpClient;
use crate::types::{MovieRecord, RatingValue, Result, Source, SourceRating};

const CINEMASCORE_SEARCH_URL: &str = "https://webapp.cinemascore.com/guest/search/title";

/// One search hit
#[derive(Debug, Deserialize)]
pub(crate) struct CinemaScoreHit {
    #[serde(rename = "TITLE", default)]
    title: String,
    #[serde(rename = "YEAR", default)]
    year: Value,
    #[serde(rename = "GRADE", default)]
    grade: Option<String>,
}

impl CinemaScoreHit {
    /// YEAR comes back as either a number or a string
    fn year(&self) -> Option<i32> {
        match &self.year {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// CinemaScore grades via the public search API
pub struct CinemaScoreProvider {
    search_url: String,
}

impl CinemaScoreProvider {
    pub fn new() -> Self {
        Self {
            search_url: CINEMASCORE_SEARCH_URL.to_string(),
        }
    }

    /// Search endpoint for a title; the API takes it base64-encoded
    fn title_url(&self, title: &str) -> String {
        format!("{}/{}", self.search_url, STANDARD.encode(title))
    }
}

impl Default for CinemaScoreProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingProvider for CinemaScoreProvider {
    fn name(&self) -> &str {
        "cinemascore"
    }

    fn sources(&self) -> &[Source] {
        &[Source::CinemaScore]
    }

    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize> {
        let Some(year) = record.details.year else {
            // Every match rule needs the release year
            return Ok(0);
        };

        let url = self.title_url(&record.details.title);
        let Some(body) = http.try_get_json(&url, &[])? else {
            return Ok(0);
        };
        let hits: Vec<CinemaScoreHit> = serde_json::from_value(body)?;

        match find_grade(&hits, &record.details.title, year) {
            Some(grade) => {
                let rating = SourceRating::new(RatingValue::grade(Source::CinemaScore, grade));
                Ok(usize::from(record.add_rating(rating)))
            }
            None => Ok(0),
        }
    }
}

/// Pick the grade for `title` released in `year`.
///
/// Tried in order: a hit whose title contains the query, then a hit whose
/// title equals the query once `:` and `'` are dropped, then the first hit.
/// The year must match in every case.
pub(crate) fn find_grade(hits: &[CinemaScoreHit], title: &str, year: i32) -> Option<String> {
    let query = title.to_uppercase();
    let stripped = |s: &str| s.replace([':', '\''], "");
    let year_matches = |hit: &&CinemaScoreHit| hit.year() == Some(year);

    let hit = hits
        .iter()
        .filter(year_matches)
        .find(|h| h.title.to_uppercase().contains(&query))
        .or_else(|| {
            hits.iter()
                .filter(year_matches)
                .find(|h| stripped(&h.title.to_uppercase()) == stripped(&query))
        })
        .or_else(|| hits.first().filter(year_matches))?;

    hit.grade
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
}
