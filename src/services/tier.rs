//! Score-to-tier classification for badge colors

use crate::types::{Score, Tier};

/// Lower bound (inclusive) of each colored band, highest first
const BANDS: [(u8, Tier); 3] = [(75, Tier::Green), (60, Tier::Yellow), (40, Tier::Orange)];

/// Classify a 0-100 score into a color band
pub fn tier(score: Score) -> Tier {
    match score {
        Score::Unavailable => Tier::Gray,
        Score::Known(v) => BANDS
            .iter()
            .find(|(floor, _)| v >= *floor)
            .map_or(Tier::Red, |(_, t)| *t),
    }
}
