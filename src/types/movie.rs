//! Per-movie records: the mutable draft filled in by sources and the
//! finalized, scored movie handed to renderers

use serde::Serialize;
use std::collections::BTreeMap;

use super::{RatingValue, Score, Source, Tier};
use crate::services::{aggregator::Aggregator, normalizer::normalize, tier::tier};

/// Descriptive metadata for a movie
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<i32>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub producer: Option<String>,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<u32>,
    /// MPA certification ("PG-13", "R", "NR")
    pub age_rating: Option<String>,
    /// "Wide" or "Limited"
    pub release_type: Option<String>,
    pub studio: Option<String>,
    pub poster_url: Option<String>,
    pub tmdb_id: Option<u64>,
    pub imdb_id: Option<String>,
    /// IMDb MOVIEmeter rank
    pub imdb_popularity: Option<u32>,
}

/// A rating plus the number of votes behind it, when known
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRating {
    pub value: RatingValue,
    pub votes: Option<u64>,
}

impl SourceRating {
    pub fn new(value: RatingValue) -> Self {
        Self { value, votes: None }
    }

    pub fn with_votes(mut self, votes: Option<u64>) -> Self {
        self.votes = votes;
        self
    }

    pub fn source(&self) -> Source {
        self.value.source
    }
}

/// Movie under construction.
///
/// Each source is written at most once; a second write for the same
/// source is ignored so the first responder wins.
#[derive(Debug, Clone, Default)]
pub struct MovieRecord {
    pub details: MovieDetails,
    ratings: BTreeMap<Source, SourceRating>,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            details: MovieDetails {
                title: title.into(),
                year,
                ..MovieDetails::default()
            },
            ratings: BTreeMap::new(),
        }
    }

    /// Record a rating. Returns false if the source already reported.
    pub fn add_rating(&mut self, rating: SourceRating) -> bool {
        let source = rating.source();
        if self.ratings.contains_key(&source) {
            tracing::debug!(
                "{}: ignoring second {} rating",
                self.details.title,
                source
            );
            return false;
        }
        self.ratings.insert(source, rating);
        true
    }

    /// Record every rating in `ratings`, returning how many were new
    pub fn extend_ratings(&mut self, ratings: impl IntoIterator<Item = SourceRating>) -> usize {
        ratings
            .into_iter()
            .map(|r| self.add_rating(r))
            .filter(|added| *added)
            .count()
    }

    pub fn rating(&self, source: Source) -> Option<&SourceRating> {
        self.ratings.get(&source)
    }

    pub fn ratings(&self) -> impl Iterator<Item = &SourceRating> {
        self.ratings.values()
    }

    pub fn has_ratings(&self) -> bool {
        !self.ratings.is_empty()
    }

    /// Normalize every rating and compute the overall score and tier
    pub fn finalize(self) -> RatedMovie {
        let pairs: Vec<(Source, RatingValue)> = self
            .ratings
            .values()
            .map(|r| (r.source(), r.value.clone()))
            .collect();
        let overall = Aggregator::aggregate(&pairs);

        let ratings = self
            .ratings
            .into_values()
            .map(|r| ScoredRating {
                score: normalize(&r.value),
                raw: r.value.display_raw(),
                source: r.source(),
                votes: r.votes,
            })
            .collect();

        RatedMovie {
            details: self.details,
            ratings,
            overall,
            tier: tier(overall),
        }
    }
}

/// One source's rating after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRating {
    pub source: Source,
    /// Value as the provider reported it
    pub raw: String,
    pub score: Score,
    pub votes: Option<u64>,
}

/// Finalized movie; never mutated after construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedMovie {
    #[serde(flatten)]
    pub details: MovieDetails,
    pub ratings: Vec<ScoredRating>,
    pub overall: Score,
    pub tier: Tier,
}

impl RatedMovie {
    pub fn rating(&self, source: Source) -> Option<&ScoredRating> {
        self.ratings.iter().find(|r| r.source == source)
    }
}
