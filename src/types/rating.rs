//! Rating types shared by sources, normalizer and renderers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating provider a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Imdb,
    /// Rotten Tomatoes critics (Tomatometer)
    Tomato,
    /// Rotten Tomatoes audience (Popcornmeter)
    Popcorn,
    Metacritic,
    Tmdb,
    CinemaScore,
    Letterboxd,
    Trakt,
    RogerEbert,
}

impl Source {
    /// All sources in digest order
    pub const ALL: [Source; 9] = [
        Source::Imdb,
        Source::Tomato,
        Source::Popcorn,
        Source::Metacritic,
        Source::Tmdb,
        Source::CinemaScore,
        Source::Letterboxd,
        Source::Trakt,
        Source::RogerEbert,
    ];

    /// Short key used in the plain-text digest
    pub fn key(self) -> &'static str {
        match self {
            Source::Imdb => "imdb",
            Source::Tomato => "tomato",
            Source::Popcorn => "popcorn",
            Source::Metacritic => "meta",
            Source::Tmdb => "tmdb",
            Source::CinemaScore => "cinemascore",
            Source::Letterboxd => "boxd",
            Source::Trakt => "trakt",
            Source::RogerEbert => "ebert",
        }
    }

    /// Display label used in the HTML report
    pub fn label(self) -> &'static str {
        match self {
            Source::Imdb => "IMDb",
            Source::Tomato => "Tomato",
            Source::Popcorn => "Popcorn",
            Source::Metacritic => "Metacritic",
            Source::Tmdb => "TMDb",
            Source::CinemaScore => "CinemaScore",
            Source::Letterboxd => "Letterboxd",
            Source::Trakt => "Trakt",
            Source::RogerEbert => "RogerEbert",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Native representation of a rating as the provider reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RatingKind {
    /// "8.5/10", "73/100", "3.5/4"
    RawFraction(String),
    /// "92%"
    Percentage(String),
    /// "A+" .. "F"
    LetterGrade(String),
    /// Star rating on a 5-point scale
    Decimal(f64),
}

/// A rating tagged with the provider it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingValue {
    pub source: Source,
    #[serde(flatten)]
    pub kind: RatingKind,
}

impl RatingValue {
    pub fn fraction(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            kind: RatingKind::RawFraction(text.into()),
        }
    }

    pub fn percentage(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            kind: RatingKind::Percentage(text.into()),
        }
    }

    pub fn grade(source: Source, text: impl Into<String>) -> Self {
        Self {
            source,
            kind: RatingKind::LetterGrade(text.into()),
        }
    }

    pub fn decimal(source: Source, value: f64) -> Self {
        Self {
            source,
            kind: RatingKind::Decimal(value),
        }
    }

    /// Rating as the provider wrote it ("8.5/10", "92%", "B+", "4.2")
    pub fn display_raw(&self) -> String {
        match &self.kind {
            RatingKind::RawFraction(s) | RatingKind::Percentage(s) | RatingKind::LetterGrade(s) => {
                s.trim().to_string()
            }
            RatingKind::Decimal(v) if v.is_finite() => format!("{:.1}", v),
            RatingKind::Decimal(_) => String::new(),
        }
    }
}

/// Score on the common 0-100 scale.
///
/// `Unavailable` is distinct from `Known(0)`: zero is a real score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "Option<u8>")]
pub enum Score {
    Known(u8),
    #[default]
    Unavailable,
}

impl Score {
    pub fn value(self) -> Option<u8> {
        match self {
            Score::Known(v) => Some(v),
            Score::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Score::Known(_))
    }
}

impl From<Score> for Option<u8> {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Known(v) => write!(f, "{}", v),
            Score::Unavailable => f.write_str("-"),
        }
    }
}

/// Coarse color band for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Yellow,
    Orange,
    Red,
    Gray,
}

impl Tier {
    /// CSS class name, also the digest label
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Orange => "orange",
            Tier::Red => "red",
            Tier::Gray => "gray",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
