//! TMDB client: latest theatrical releases, movie details and poster lookup

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use super::RatingProvider;
use crate::services::http::HttpClient;
use crate::types::{MovieDetails, MovieRecord, RatingValue, Result, Source, SourceRating};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Feature films only (minutes)
const MIN_RUNTIME: &str = "40";
/// Movies with at least basic metadata
const MIN_VOTE_COUNT: &str = "5";
/// Limited (2) and wide (3) theatrical releases
const THEATRICAL_RELEASE_TYPES: &str = "2|3";
/// TMDB release type for a wide theatrical release
const WIDE_RELEASE_TYPE: u8 = 3;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Paged<T> {
    #[serde(default)]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiscoverMovie {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u64>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    overview: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Details {
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    production_companies: Vec<Named>,
    #[serde(default)]
    imdb_id: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Credits {
    #[serde(default)]
    cast: Vec<Named>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryReleases {
    iso_3166_1: String,
    #[serde(default)]
    release_dates: Vec<ReleaseDate>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDate {
    #[serde(default)]
    certification: String,
    #[serde(rename = "type", default)]
    release_type: u8,
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, TMDB_BASE_URL)
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Movies released in the `days` days before `today` (today excluded),
    /// most popular first
    pub fn latest_releases(
        &self,
        http: &HttpClient,
        today: NaiveDate,
        days: u32,
        limit: usize,
    ) -> Result<Vec<MovieRecord>> {
        let (start, end) = discover_window(today, days);
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let url = format!("{}/discover/movie", self.base_url);
        let query = [
            ("api_key", self.api_key.as_str()),
            ("language", "en-US"),
            ("region", "US"),
            ("sort_by", "popularity.desc"),
            ("primary_release_date.gte", start.as_str()),
            ("primary_release_date.lte", end.as_str()),
            ("with_release_type", THEATRICAL_RELEASE_TYPES),
            ("with_runtime.gte", MIN_RUNTIME),
            ("vote_count.gte", MIN_VOTE_COUNT),
            ("page", "1"),
        ];

        let page: Paged<DiscoverMovie> = http.get_json(&url, &query)?;
        tracing::info!("TMDB discover {}..{}: {} results", start, end, page.results.len());

        Ok(page
            .results
            .iter()
            .take(limit)
            .map(record_from_discover)
            .collect())
    }

    /// Movie details, credits and per-country release dates
    pub(crate) fn fetch_details(
        &self,
        http: &HttpClient,
        id: u64,
    ) -> Result<(Details, Credits, Vec<CountryReleases>)> {
        let query = [("api_key", self.api_key.as_str()), ("language", "en-US")];
        let movie_url = format!("{}/movie/{}", self.base_url, id);

        let details: Details = http.get_json(&movie_url, &query)?;
        let credits: Credits = http.get_json(&format!("{}/credits", movie_url), &query)?;
        let releases: Paged<CountryReleases> =
            http.get_json(&format!("{}/release_dates", movie_url), &query)?;

        Ok((details, credits, releases.results))
    }

    /// Poster of the first search hit for `title` and `year`
    pub fn poster_lookup(
        &self,
        http: &HttpClient,
        title: &str,
        year: Option<i32>,
    ) -> Result<Option<String>> {
        let url = format!("{}/search/movie", self.base_url);
        let year = year.map(|y| y.to_string()).unwrap_or_default();
        let mut query = vec![
            ("api_key", self.api_key.as_str()),
            ("query", title),
            ("language", "en-US"),
        ];
        if !year.is_empty() {
            query.push(("year", year.as_str()));
        }

        let page: Paged<DiscoverMovie> = http.get_json(&url, &query)?;
        Ok(page
            .results
            .first()
            .and_then(|m| m.poster_path.as_deref())
            .map(poster_url))
    }
}

impl RatingProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn sources(&self) -> &[Source] {
        &[Source::Tmdb]
    }

    fn populate(&self, http: &HttpClient, record: &mut MovieRecord) -> Result<usize> {
        let mut added = 0;

        if let Some(id) = record.details.tmdb_id {
            let (details, credits, releases) = self.fetch_details(http, id)?;
            apply_details(&mut record.details, &details, &credits, &releases);
            if let Some(rating) = tmdb_rating(details.vote_average, details.vote_count) {
                added += usize::from(record.add_rating(rating));
            }
        }

        if record.details.poster_url.is_none() {
            let title = record.details.title.clone();
            record.details.poster_url = self.poster_lookup(http, &title, record.details.year)?;
        }

        Ok(added)
    }
}

/// `[end - (days - 1), end]` where `end` is yesterday
pub(crate) fn discover_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let end = today - Duration::days(1);
    let start = end - Duration::days(i64::from(days.max(1)) - 1);
    (start, end)
}

pub(crate) fn poster_url(path: &str) -> String {
    format!("{}{}", POSTER_BASE_URL, path)
}

pub(crate) fn parse_year(date: &str) -> Option<i32> {
    date.get(..4).and_then(|y| y.parse().ok())
}

/// TMDB's vote average as an x/10 rating; no votes means no rating
fn tmdb_rating(average: Option<f64>, votes: Option<u64>) -> Option<SourceRating> {
    let average = average?;
    if votes == Some(0) {
        return None;
    }
    let value = RatingValue::fraction(Source::Tmdb, format!("{:.1}/10", average));
    Some(SourceRating::new(value).with_votes(votes))
}

pub(crate) fn record_from_discover(movie: &DiscoverMovie) -> MovieRecord {
    let title = movie.title.clone().unwrap_or_else(|| "Unknown".to_string());
    let release_date = movie.release_date.clone().filter(|d| !d.is_empty());
    let year = release_date.as_deref().and_then(parse_year);

    let mut record = MovieRecord::new(title, year);
    record.details.release_date = release_date;
    record.details.tmdb_id = Some(movie.id);
    record.details.poster_url = movie.poster_path.as_deref().map(poster_url);
    record.details.overview = movie.overview.clone().filter(|o| !o.is_empty());
    if let Some(rating) = tmdb_rating(movie.vote_average, movie.vote_count) {
        record.add_rating(rating);
    }
    record
}

pub(crate) fn apply_details(
    target: &mut MovieDetails,
    details: &Details,
    credits: &Credits,
    releases: &[CountryReleases],
) {
    let crew_with = |jobs: &[&str]| {
        credits
            .crew
            .iter()
            .find(|c| jobs.contains(&c.job.as_str()))
            .map(|c| c.name.clone())
    };

    target.director = crew_with(&["Director"]);
    target.writer = crew_with(&["Writer", "Screenplay"]);
    target.producer = crew_with(&["Producer"]);
    target.actors = credits.cast.iter().take(5).map(|c| c.name.clone()).collect();
    target.genres = details.genres.iter().take(3).map(|g| g.name.clone()).collect();
    target.runtime_minutes = details.runtime.filter(|r| *r > 0);
    target.studio = details.production_companies.first().map(|c| c.name.clone());

    if let Some(overview) = details.overview.clone().filter(|o| !o.is_empty()) {
        target.overview = Some(overview);
    }
    if target.imdb_id.is_none() {
        target.imdb_id = details.imdb_id.clone().filter(|id| !id.is_empty());
    }
    if target.poster_url.is_none() {
        target.poster_url = details.poster_path.as_deref().map(poster_url);
    }

    let (certification, release_type) = us_release(releases);
    target.age_rating = Some(certification);
    target.release_type = Some(release_type);
}

/// US certification (default "NR") and "Wide"/"Limited" label
pub(crate) fn us_release(releases: &[CountryReleases]) -> (String, String) {
    let certified = releases
        .iter()
        .find(|r| r.iso_3166_1 == "US")
        .and_then(|us| us.release_dates.iter().find(|d| !d.certification.is_empty()));

    let certification = certified
        .map(|d| d.certification.clone())
        .unwrap_or_else(|| "NR".to_string());
    let release_type = certified.map_or(WIDE_RELEASE_TYPE, |d| d.release_type);
    let label = if release_type >= WIDE_RELEASE_TYPE {
        "Wide"
    } else {
        "Limited"
    };
    (certification, label.to_string())
}
