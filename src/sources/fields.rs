//! Field adapter for loosely-shaped movie JSON
//!
//! List APIs spell the same field many ways (`imdb`, `imdb_rating`,
//! `imdbRating`) and mix numbers with strings. This module is the only
//! place that knows about those spellings: it maps an arbitrary JSON
//! object onto a [`MovieRecord`] with typed [`RatingValue`]s, so the
//! normalizer never sees raw keys.

use serde_json::{Map, Value};

use super::tmdb::{parse_year, poster_url};
use crate::types::{MovieRecord, RatingValue, Source, SourceRating};

/// Key variants for one source's score and vote count
struct RatingKeys {
    source: Source,
    score: &'static [&'static str],
    votes: &'static [&'static str],
}

const RATING_KEYS: [RatingKeys; 9] = [
    RatingKeys {
        source: Source::Imdb,
        score: &["imdb", "imdb_rating", "imdbRating"],
        votes: &["imdb_votes", "imdbVotes", "imdbvotes"],
    },
    RatingKeys {
        source: Source::Trakt,
        score: &["trakt", "trakt_rating", "traktRating"],
        votes: &["trakt_votes", "traktVotes"],
    },
    RatingKeys {
        source: Source::Tmdb,
        score: &["tmdb", "tmdb_rating", "tmdbRating", "vote_average"],
        votes: &["tmdb_votes", "tmdbVotes", "vote_count"],
    },
    RatingKeys {
        source: Source::Letterboxd,
        score: &["letterboxd", "letterboxd_rating", "letterboxdRating"],
        votes: &["letterboxd_votes", "letterboxdVotes"],
    },
    RatingKeys {
        source: Source::Tomato,
        score: &["rt_critics", "tomatometer", "rt_critics_score", "rtCritics"],
        votes: &["rt_critics_votes", "rtCriticsVotes"],
    },
    RatingKeys {
        source: Source::Popcorn,
        score: &["rt_audience", "popcornmeter", "rt_audience_score", "rtAudience"],
        votes: &["rt_audience_votes", "rtAudienceVotes"],
    },
    RatingKeys {
        source: Source::Metacritic,
        score: &["metacritic", "metacritic_score", "metacriticScore"],
        votes: &["metacritic_votes", "metacriticVotes"],
    },
    RatingKeys {
        source: Source::RogerEbert,
        score: &["roger_ebert", "ebert", "rogerEbert"],
        votes: &[],
    },
    RatingKeys {
        source: Source::CinemaScore,
        score: &["cinemascore", "cinema_score", "cinemaScore"],
        votes: &[],
    },
];

/// Aggregate fields some lists carry; they mark an item as rated but are
/// never used as a score
const AGGREGATE_FIELDS: [&str; 3] = ["overall_score", "score", "rating"];

/// Build a record from a JSON movie object; `None` for non-objects
pub fn record_from_json(value: &Value) -> Option<MovieRecord> {
    let obj = value.as_object()?;

    let title = first_str(obj, &["title", "name"]).unwrap_or("Unknown");
    let release_date = first_str(obj, &["release_date", "released"]).map(String::from);
    let year = first(obj, &["year"])
        .and_then(value_year)
        .or_else(|| release_date.as_deref().and_then(parse_year));

    let mut record = MovieRecord::new(title, year);
    let details = &mut record.details;
    details.release_date = release_date;
    details.overview = first_str(obj, &["overview", "synopsis", "description"]).map(String::from);
    details.poster_url = first_str(obj, &["poster", "poster_url", "poster_path"]).map(|p| {
        if p.starts_with('/') {
            poster_url(p)
        } else {
            p.to_string()
        }
    });
    details.age_rating =
        first_str(obj, &["age_rating", "mpa_rating", "certification"]).map(String::from);
    details.imdb_id = first_str(obj, &["imdb_id", "imdbId", "imdbid"])
        .or_else(|| first_str(obj, &["imdb"]).filter(|s| is_imdb_id(s)))
        .map(String::from);
    details.tmdb_id = first(obj, &["tmdb_id", "tmdbId", "tmdbid"]).and_then(value_count);
    details.imdb_popularity = first(obj, &["imdb_popularity", "imdbPopularity", "imdbpopular"])
        .and_then(value_count)
        .and_then(|p| u32::try_from(p).ok());

    for keys in &RATING_KEYS {
        let Some(rating) = keys
            .score
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(|v| rating_from_value(keys.source, v))
        else {
            continue;
        };
        let votes = first(obj, keys.votes).and_then(value_count);
        record.add_rating(SourceRating::new(rating).with_votes(votes));
    }

    // Nested `ratings: [{source, value, votes}]` shape
    if let Some(list) = obj.get("ratings").and_then(Value::as_array) {
        for entry in list {
            if let Some(rating) = nested_rating(entry) {
                record.add_rating(rating);
            }
        }
    }

    Some(record)
}

/// Whether an item carries any rating field with a usable value
pub fn has_rating_fields(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let nested = obj
        .get("ratings")
        .and_then(Value::as_array)
        .is_some_and(|list| list.iter().any(|e| nested_rating(e).is_some()));

    let present = |key: &str| match obj.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty() && s.trim() != "N/A",
        Some(_) => true,
    };

    // A bare IMDb id under `imdb` is not a rating
    let rated = |keys: &RatingKeys| {
        keys.score.iter().any(|key| {
            present(key)
                && obj
                    .get(*key)
                    .is_some_and(|v| rating_from_value(keys.source, v).is_some())
        })
    };

    nested
        || RATING_KEYS.iter().any(rated)
        || AGGREGATE_FIELDS.iter().any(|key| present(key))
}

/// Map a JSON score onto the source's native representation
pub fn rating_from_value(source: Source, value: &Value) -> Option<RatingValue> {
    match value {
        Value::Number(n) => n.as_f64().and_then(|f| number_rating(source, f)),
        Value::String(s) => string_rating(source, s),
        _ => None,
    }
}

fn number_rating(source: Source, value: f64) -> Option<RatingValue> {
    Some(match source {
        Source::Imdb | Source::Tmdb => RatingValue::fraction(source, format!("{}/10", value)),
        Source::Metacritic => RatingValue::fraction(source, format!("{}/100", value)),
        Source::RogerEbert => RatingValue::fraction(source, format!("{}/4", value)),
        Source::Letterboxd => RatingValue::decimal(source, value),
        Source::Tomato | Source::Popcorn | Source::Trakt => {
            RatingValue::percentage(source, format!("{}%", value))
        }
        Source::CinemaScore => return None,
    })
}

fn string_rating(source: Source, text: &str) -> Option<RatingValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if source == Source::Imdb && is_imdb_id(text) {
        return None;
    }
    if text.contains('/') && !text.eq_ignore_ascii_case("n/a") {
        return Some(RatingValue::fraction(source, text));
    }
    if text.ends_with('%') {
        return Some(RatingValue::percentage(source, text));
    }
    if source == Source::CinemaScore {
        return Some(RatingValue::grade(source, text));
    }
    match text.parse::<f64>() {
        Ok(f) => number_rating(source, f),
        // "N/A" and friends: keep the source's kind so it reads as unavailable
        Err(_) => Some(RatingValue::fraction(source, text)),
    }
}

/// `{"source": "tomatoes", "value": 92, "votes": 118}`
fn nested_rating(entry: &Value) -> Option<SourceRating> {
    let source = match entry.get("source")?.as_str()?.to_ascii_lowercase().as_str() {
        "imdb" => Source::Imdb,
        "tmdb" => Source::Tmdb,
        "trakt" => Source::Trakt,
        "letterboxd" => Source::Letterboxd,
        "tomatoes" | "rt_critics" => Source::Tomato,
        "popcorn" | "tomatoesaudience" | "rt_audience" => Source::Popcorn,
        "metacritic" => Source::Metacritic,
        "rogerebert" | "roger_ebert" => Source::RogerEbert,
        "cinemascore" => Source::CinemaScore,
        _ => return None,
    };
    let rating = rating_from_value(source, entry.get("value")?)?;
    let votes = entry.get("votes").and_then(value_count);
    Some(SourceRating::new(rating).with_votes(votes))
}

/// First key present with a non-null value
fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// First key holding a non-empty string
fn first_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn value_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => parse_year(s.trim()),
        _ => None,
    }
}

/// Counts arrive as numbers or as "154,502"
pub(crate) fn value_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => parse_count(s),
        _ => None,
    }
}

/// "154,502" -> 154502
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn is_imdb_id(text: &str) -> bool {
    text.len() > 2 && text.starts_with("tt") && text[2..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalize;
    use crate::types::Score;
    use serde_json::json;

    fn score(record: &MovieRecord, source: Source) -> Score {
        record
            .rating(source)
            .map_or(Score::Unavailable, |r| normalize(&r.value))
    }

    #[test]
    fn test_flat_snake_case_shape() {
        let movie = json!({
            "title": "Dune: Part Two",
            "year": 2024,
            "poster": "https://image.tmdb.org/t/p/w500/d5N.jpg",
            "overview": "Paul Atreides unites with Chani.",
            "imdb": 8.5, "imdb_votes": 154502, "imdb_popularity": 20,
            "tmdb": 8.2, "tmdb_votes": 1541,
            "letterboxd": 4.2,
            "trakt": 85,
            "rt_critics": 92, "rt_critics_votes": 118,
            "rt_audience": 95,
            "metacritic": 80,
            "roger_ebert": 4.0,
            "age_rating": "PG-13"
        });

        let record = record_from_json(&movie).unwrap();

        assert_eq!(record.details.title, "Dune: Part Two");
        assert_eq!(record.details.year, Some(2024));
        assert_eq!(record.details.imdb_popularity, Some(20));
        assert_eq!(record.details.age_rating.as_deref(), Some("PG-13"));

        assert_eq!(score(&record, Source::Imdb), Score::Known(85));
        assert_eq!(score(&record, Source::Tmdb), Score::Known(82));
        assert_eq!(score(&record, Source::Letterboxd), Score::Known(84));
        assert_eq!(score(&record, Source::Trakt), Score::Known(85));
        assert_eq!(score(&record, Source::Tomato), Score::Known(92));
        assert_eq!(score(&record, Source::Popcorn), Score::Known(95));
        assert_eq!(score(&record, Source::Metacritic), Score::Known(80));
        assert_eq!(score(&record, Source::RogerEbert), Score::Known(100));
        assert_eq!(record.rating(Source::Imdb).unwrap().votes, Some(154502));
    }

    #[test]
    fn test_camel_case_and_string_values() {
        let movie = json!({
            "name": "Heat",
            "release_date": "1995-12-15",
            "imdbRating": "8.3/10",
            "imdbVotes": "722,000",
            "tomatometer": "88%",
            "metacriticScore": "76",
            "cinemaScore": "a-",
            "imdbId": "tt0113277"
        });

        let record = record_from_json(&movie).unwrap();

        assert_eq!(record.details.title, "Heat");
        assert_eq!(record.details.year, Some(1995));
        assert_eq!(record.details.imdb_id.as_deref(), Some("tt0113277"));
        assert_eq!(score(&record, Source::Imdb), Score::Known(83));
        assert_eq!(record.rating(Source::Imdb).unwrap().votes, Some(722000));
        assert_eq!(score(&record, Source::Tomato), Score::Known(88));
        assert_eq!(score(&record, Source::Metacritic), Score::Known(76));
        assert_eq!(score(&record, Source::CinemaScore), Score::Known(92));
    }

    #[test]
    fn test_first_variant_wins() {
        let movie = json!({"title": "X", "imdb": null, "imdb_rating": 7.0, "imdbRating": 9.9});
        let record = record_from_json(&movie).unwrap();
        assert_eq!(score(&record, Source::Imdb), Score::Known(70));
    }

    #[test]
    fn test_imdb_key_holding_id() {
        let movie = json!({"title": "X", "imdb": "tt1234567"});
        let record = record_from_json(&movie).unwrap();
        assert!(record.rating(Source::Imdb).is_none());
        assert_eq!(record.details.imdb_id.as_deref(), Some("tt1234567"));

        let movie = json!({"title": "X", "imdb": "tt1234567", "imdb_rating": 6.4});
        let record = record_from_json(&movie).unwrap();
        assert_eq!(score(&record, Source::Imdb), Score::Known(64));
    }

    #[test]
    fn test_zero_score_is_recorded() {
        let movie = json!({"title": "Flop", "rt_critics": 0});
        let record = record_from_json(&movie).unwrap();
        assert_eq!(score(&record, Source::Tomato), Score::Known(0));
    }

    #[test]
    fn test_na_string_is_unavailable() {
        let movie = json!({"title": "X", "metacritic": "N/A"});
        let record = record_from_json(&movie).unwrap();
        assert!(record.rating(Source::Metacritic).is_some());
        assert_eq!(score(&record, Source::Metacritic), Score::Unavailable);
    }

    #[test]
    fn test_nested_ratings_shape() {
        let movie = json!({
            "title": "Nested",
            "poster_path": "/abc.jpg",
            "ratings": [
                {"source": "imdb", "value": 7.1, "votes": 1000},
                {"source": "tomatoes", "value": 64},
                {"source": "tomatoesaudience", "value": 81},
                {"source": "unknownsite", "value": 3}
            ]
        });
        let record = record_from_json(&movie).unwrap();
        assert_eq!(
            record.details.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(score(&record, Source::Imdb), Score::Known(71));
        assert_eq!(score(&record, Source::Tomato), Score::Known(64));
        assert_eq!(score(&record, Source::Popcorn), Score::Known(81));
        assert_eq!(record.ratings().count(), 3);
    }

    #[test]
    fn test_non_object_is_none() {
        assert!(record_from_json(&json!([1, 2])).is_none());
        assert!(record_from_json(&json!("movie")).is_none());
    }

    #[test]
    fn test_missing_title_defaults() {
        let record = record_from_json(&json!({})).unwrap();
        assert_eq!(record.details.title, "Unknown");
        assert!(!record.has_ratings());
    }

    #[test]
    fn test_has_rating_fields() {
        assert!(has_rating_fields(&json!({"imdb": 7.5})));
        assert!(has_rating_fields(&json!({"score": 0})));
        assert!(has_rating_fields(&json!({"rtCritics": "92%"})));
        assert!(has_rating_fields(&json!({"ratings": [{"source": "imdb", "value": 7}]})));
        assert!(!has_rating_fields(&json!({"imdb": "N/A", "tmdb": "", "trakt": null})));
        assert!(!has_rating_fields(&json!({"title": "No ratings"})));
        assert!(!has_rating_fields(&json!(42)));
    }

    #[test]
    fn test_imdb_id_alone_is_not_a_rating() {
        let movie = json!({"title": "Unrated", "imdb": "tt1234567"});
        assert!(!has_rating_fields(&movie));
        assert!(!record_from_json(&movie).unwrap().has_ratings());

        assert!(has_rating_fields(&json!({"imdb": "tt1234567", "imdb_rating": 6.4})));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("154,502"), Some(154502));
        assert_eq!(parse_count("N/A"), None);
        assert_eq!(value_count(&json!(12)), Some(12));
        assert_eq!(value_count(&json!(-3)), None);
    }
}
