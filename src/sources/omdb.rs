//! OMDb provider: IMDb rating and Metascore

use serde::Deserialize;

use super::fields::parse_count;
use super::RatingProvider;
use crate::services::http::HttpClient;
use crate::types::{MovieRecord, RatingValue, Result, Source, SourceRating};

const OMDB_BASE_URL: &str = "http://www.omdbapi.com/";

/// OMDb title lookup response (fields we use)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbResponse {
    #[serde(default)]
    response: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes", default)]
    imdb_votes: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(default)]
    metascore: Option<String>,
}

/// IMDb and Metacritic ratings via the OMDb API
pub struct OmdbProvider {
    api_key: String,
    base_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OMDB_BASE_URL.to_string(),
        }
    }
}

impl RatingProvider for OmdbProvider {
    fn name(&self) -> &str {
        "omdb"
    }

    fn sources(&self) -> &[Source] {
        &[Source::Imdb, Source::Metacritic]
    }

    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize> {
        let year = record.details.year.map(|y| y.to_string()).unwrap_or_default();
        let query = [
            ("apikey", self.api_key.as_str()),
            ("t", record.details.title.as_str()),
            ("y", year.as_str()),
            ("type", "movie"),
        ];

        let response: OmdbResponse = http.get_json(&self.base_url, &query)?;
        let (ratings, imdb_id) = ratings_from_response(&response);

        if record.details.imdb_id.is_none() {
            record.details.imdb_id = imdb_id;
        }
        Ok(record.extend_ratings(ratings))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "N/A")
}

pub(crate) fn ratings_from_response(response: &OmdbResponse) -> (Vec<SourceRating>, Option<String>) {
    if response.response != "True" {
        return (Vec::new(), None);
    }

    let mut ratings = Vec::new();

    if let Some(imdb) = present(&response.imdb_rating) {
        let votes = present(&response.imdb_votes).and_then(parse_count);
        ratings.push(
            SourceRating::new(RatingValue::fraction(Source::Imdb, format!("{}/10", imdb)))
                .with_votes(votes),
        );
    }

    if let Some(metascore) = present(&response.metascore) {
        ratings.push(SourceRating::new(RatingValue::fraction(
            Source::Metacritic,
            format!("{}/100", metascore),
        )));
    }

    let imdb_id = present(&response.imdb_id).map(String::from);
    (ratings, imdb_id)
}
