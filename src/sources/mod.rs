//! Rating providers: API clients and page scrapers that fill in a
//! [`MovieRecord`]

pub mod cinemascore;
pub mod fields;
pub mod letterboxd;
pub mod mdblist;
pub mod omdb;
pub mod rotten_tomatoes;
pub mod sample;
pub mod tmdb;

pub use cinemascore::CinemaScoreProvider;
pub use letterboxd::LetterboxdProvider;
pub use mdblist::MdbListClient;
pub use omdb::OmdbProvider;
pub use rotten_tomatoes::RottenTomatoesProvider;
pub use sample::sample_records;
pub use tmdb::TmdbClient;

use crate::services::http::HttpClient;
use crate::types::{MovieRecord, Result, Source};

/// A remote source that contributes ratings or metadata to a movie
pub trait RatingProvider: Send + Sync {
    /// Provider name (e.g., "omdb")
    fn name(&self) -> &str;

    /// Rating sources this provider can report
    fn sources(&self) -> &[Source];

    /// Fetch and record this provider's data, returning how many new
    /// ratings were recorded
    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize>;
}

/// Registry of providers run against every movie
pub struct ProviderRegistry {
    providers: Vec<Box<dyn RatingProvider>>,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Every provider used by the latest-releases report
    pub fn latest(tmdb_api_key: &str, omdb_api_key: &str) -> Self {
        Self {
            providers: vec![
                Box::new(TmdbClient::new(tmdb_api_key)),
                Box::new(OmdbProvider::new(omdb_api_key)),
                Box::new(RottenTomatoesProvider::new()),
                Box::new(CinemaScoreProvider::new()),
                Box::new(LetterboxdProvider::new()),
            ],
        }
    }

    /// Providers for list-sourced movies: TMDB fills posters and details
    /// when a key is configured
    pub fn list(tmdb_api_key: Option<&str>) -> Self {
        let registry = Self::empty();
        match tmdb_api_key {
            Some(key) => registry.with(TmdbClient::new(key)),
            None => registry,
        }
    }

    /// Add a provider; runs after those already registered
    pub fn with(mut self, provider: impl RatingProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Get all registered providers
    pub fn providers(&self) -> &[Box<dyn RatingProvider>] {
        &self.providers
    }

    /// Rating sources reported by at least one provider, in display order
    pub fn covered_sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|s| self.providers.iter().any(|p| p.sources().contains(s)))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

/// URL slug: lowercase, spaces and hyphens to `sep`, `:` `'` `.` dropped,
/// then anything other than word characters and `sep` stripped
pub(crate) fn slugify(title: &str, sep: char) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' | '_' => Some(sep),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}
