//! Aggregator service for computing a movie's overall score

use crate::services::normalizer::normalize;
use crate::types::{RatingValue, Score, Source};

/// Aggregator for combining per-source ratings
pub struct Aggregator;

impl Aggregator {
    /// Overall score: unweighted mean of every available normalized rating.
    ///
    /// Unavailable ratings are dropped; with nothing left the result is
    /// `Unavailable`. The mean is rounded half away from zero.
    pub fn aggregate(records: &[(Source, RatingValue)]) -> Score {
        Self::mean(records.iter().map(|(_, value)| normalize(value)))
    }

    /// Mean of already-normalized scores.
    ///
    /// Sums integers before the single division, so the result does not
    /// depend on the order scores arrive in.
    pub fn mean(scores: impl IntoIterator<Item = Score>) -> Score {
        let (sum, count) = scores
            .into_iter()
            .filter_map(Score::value)
            .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));

        if count == 0 {
            return Score::Unavailable;
        }

        // Integer half-away-from-zero rounding of sum / count (all terms >= 0)
        let rounded = (2 * sum + count) / (2 * count);
        Score::Known(rounded.min(100) as u8)
    }
}
