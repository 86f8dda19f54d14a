//! Letterboxd scraper: average star rating from the film page

use regex::Regex;

use super::{slugify, RatingProvider};
use crate::services::http::HttpClient;
use crate::types::{MovieRecord, RatingValue, Result, Source, SourceRating};

const LETTERBOXD_BASE_URL: &str = "https://letterboxd.com/film";

/// Letterboxd average rating (5-star scale)
pub struct LetterboxdProvider;

impl LetterboxdProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LetterboxdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingProvider for LetterboxdProvider {
    fn name(&self) -> &str {
        "letterboxd"
    }

    fn sources(&self) -> &[Source] {
        &[Source::Letterboxd]
    }

    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize> {
        for url in candidate_urls(&record.details.title, record.details.year) {
            match http.get_page(&url) {
                Ok(Some(page)) => {
                    if let Some(stars) = extract_rating(&page) {
                        let rating = SourceRating::new(RatingValue::decimal(Source::Letterboxd, stars));
                        return Ok(usize::from(record.add_rating(rating)));
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("{}: {}", url, e),
            }
        }
        Ok(0)
    }
}

/// `/film/{slug}/` then `/film/{slug}-{year}/`
pub(crate) fn candidate_urls(title: &str, year: Option<i32>) -> Vec<String> {
    let slug = slugify(title, '-');
    let mut urls = vec![format!("{}/{}/", LETTERBOXD_BASE_URL, slug)];
    if let Some(year) = year {
        urls.push(format!("{}/{}-{}/", LETTERBOXD_BASE_URL, slug, year));
    }
    urls
}

/// `<meta name="twitter:data2" content="3.92 out of 5">` -> 3.92
pub(crate) fn extract_rating(html: &str) -> Option<f64> {
    let re = Regex::new(r#"<meta name="twitter:data2" content="([\d.]+) out of 5""#)
        .expect("valid regex");
    re.captures(html)?.get(1)?.as_str().parse().ok()
}
