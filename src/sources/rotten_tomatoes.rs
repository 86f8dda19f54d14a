//! Rotten Tomatoes scraper: Tomatometer and Popcornmeter
//!
//! Movie pages embed their score card as a JSON blob in a `<script>` tag;
//! the first JSON object carrying both `criticsScore` and `audienceScore`
//! is taken as the source of truth.

use regex::Regex;
use serde_json::Value;

use super::{slugify, RatingProvider};
use crate::services::http::HttpClient;
use crate::types::{MovieRecord, RatingValue, Result, Source, SourceRating};

const RT_BASE_URL: &str = "https://www.rottentomatoes.com/m";

/// Critics and audience scores scraped from Rotten Tomatoes
pub struct RottenTomatoesProvider;

impl RottenTomatoesProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RottenTomatoesProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingProvider for RottenTomatoesProvider {
    fn name(&self) -> &str {
        "rotten-tomatoes"
    }

    fn sources(&self) -> &[Source] {
        &[Source::Tomato, Source::Popcorn]
    }

    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize> {
        for url in candidate_urls(&record.details.title, record.details.year) {
            let page = match http.get_page(&url) {
                Ok(Some(page)) => page,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("{}: {}", url, e);
                    continue;
                }
            };

            // A scorecard ends the search even when it holds no scores
            if let Some(ratings) = extract_scores(&page) {
                tracing::debug!("{}: {} scores", url, ratings.len());
                return Ok(record.extend_ratings(ratings));
            }
        }
        Ok(0)
    }
}

/// `/m/{slug}` then `/m/{slug}_{year}`
pub(crate) fn candidate_urls(title: &str, year: Option<i32>) -> Vec<String> {
    let slug = slugify(title, '_');
    let mut urls = vec![format!("{}/{}", RT_BASE_URL, slug)];
    if let Some(year) = year {
        urls.push(format!("{}/{}_{}", RT_BASE_URL, slug, year));
    }
    urls
}

/// Tomatometer and Popcornmeter from the page's embedded JSON; `None` when
/// the page has no scorecard
pub(crate) fn extract_scores(html: &str) -> Option<Vec<SourceRating>> {
    let re = Regex::new(r#"(?s)<script[^>]*type="application/(?:ld\+)?json"[^>]*>(.*?)</script>"#)
        .expect("valid regex");

    for cap in re.captures_iter(html) {
        let Ok(data) = serde_json::from_str::<Value>(&cap[1]) else {
            continue;
        };
        let (Some(critics), Some(audience)) = (data.get("criticsScore"), data.get("audienceScore"))
        else {
            continue;
        };

        let ratings = [(Source::Tomato, critics), (Source::Popcorn, audience)]
            .into_iter()
            .filter_map(|(source, card)| {
                score_text(card.get("score")?)
                    .map(|s| SourceRating::new(RatingValue::percentage(source, format!("{}%", s))))
            })
            .collect();
        return Some(ratings);
    }

    None
}

/// Scores arrive as either `"92"` or `92`; null and empty mean no score
fn score_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
