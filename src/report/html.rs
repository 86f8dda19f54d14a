//! HTML card-grid report rendered through an askama template
//!
//! The template only sees plain strings: every score, link and style is
//! decided here, and askama escapes all interpolated text.

use askama::Template;

use super::{truncate, ReportOptions, REPORT_TITLE};
use crate::sources::slugify;
use crate::types::{MovieHeatError, RatedMovie, Result, Score, Source};

const SYNOPSIS_MAX: usize = 120;
const NO_SYNOPSIS: &str = "No synopsis available.";
const NO_POSTER_URL: &str = "https://via.placeholder.com/120x180?text=No+Poster";

/// Table order in each card
const ROW_ORDER: [Source; 9] = [
    Source::Imdb,
    Source::Trakt,
    Source::Tmdb,
    Source::Letterboxd,
    Source::Tomato,
    Source::Popcorn,
    Source::Metacritic,
    Source::RogerEbert,
    Source::CinemaScore,
];

const DEFAULT_SOURCE_STYLE: &str = "color: #5b9bd5;";

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage {
    heading: &'static str,
    generated: String,
    cards: Vec<Card>,
}

struct Card {
    title: String,
    year: String,
    poster: String,
    overall: String,
    tier: &'static str,
    rows: Vec<Row>,
    age_rating: String,
    synopsis: String,
}

struct Row {
    label: &'static str,
    url: String,
    style: &'static str,
    score: String,
    votes: String,
    popularity: String,
}

/// Render the full HTML page
pub fn render_html(movies: &[RatedMovie], options: &ReportOptions) -> Result<String> {
    let page = ReportPage {
        heading: REPORT_TITLE,
        generated: options.generated.format("%B %-d, %Y").to_string(),
        cards: movies.iter().map(|m| card(m, options)).collect(),
    };
    page.render()
        .map_err(|e| MovieHeatError::Render(format!("HTML template: {}", e)))
}

fn card(movie: &RatedMovie, options: &ReportOptions) -> Card {
    let d = &movie.details;
    let rows = ROW_ORDER
        .iter()
        .filter_map(|source| row(movie, *source, options))
        .collect();

    Card {
        title: d.title.clone(),
        year: d.year.map(|y| y.to_string()).unwrap_or_default(),
        poster: d
            .poster_url
            .clone()
            .unwrap_or_else(|| NO_POSTER_URL.to_string()),
        overall: movie.overall.to_string(),
        tier: movie.tier.as_str(),
        rows,
        age_rating: d.age_rating.clone().unwrap_or_default(),
        synopsis: d
            .overview
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .map_or_else(|| NO_SYNOPSIS.to_string(), |o| truncate(o, SYNOPSIS_MAX)),
    }
}

/// Table row for one source; `None` when there is neither a score nor votes
fn row(movie: &RatedMovie, source: Source, options: &ReportOptions) -> Option<Row> {
    let rating = movie.rating(source)?;

    let score = if options.normalize {
        rating.score.to_string()
    } else {
        match rating.raw.trim() {
            "" => "-".to_string(),
            raw if raw.eq_ignore_ascii_case("n/a") => "-".to_string(),
            raw => raw.to_string(),
        }
    };
    let votes = rating.votes.map(|v| format!("/{}/", v)).unwrap_or_default();
    if score == "-" && votes.is_empty() {
        return None;
    }

    let popularity = match (source, movie.details.imdb_popularity) {
        (Source::Imdb, Some(rank)) => rank.to_string(),
        _ => String::new(),
    };

    Some(Row {
        label: source.label(),
        url: source_url(movie, source).unwrap_or_default(),
        style: source_style(source, rating.score),
        score,
        votes,
        popularity,
    })
}

/// Inline style for the source name; strong scores get the site's colors
pub(crate) fn source_style(source: Source, score: Score) -> &'static str {
    match (source, score) {
        (Source::Tomato, Score::Known(v)) if v >= 60 => {
            "color: #FF4500; text-shadow: 0px 0px 1px #FFD700;"
        }
        (Source::Popcorn, Score::Known(v)) if v >= 80 => {
            "color: #6cbdb4; text-shadow: 0px 0px 1px #FFD700;"
        }
        (Source::Metacritic, Score::Known(v)) if v >= 70 => "color: #ffb74d;",
        _ => DEFAULT_SOURCE_STYLE,
    }
}

/// Link to the movie's page on the rating site, when one can be built
pub(crate) fn source_url(movie: &RatedMovie, source: Source) -> Option<String> {
    let d = &movie.details;
    let with_year = |slug: String, sep: char| match d.year {
        Some(year) => format!("{}{}{}", slug, sep, year),
        None => slug,
    };

    match source {
        Source::Imdb => d
            .imdb_id
            .as_ref()
            .map(|id| format!("https://www.imdb.com/title/{}", id)),
        Source::Letterboxd => d
            .imdb_id
            .as_ref()
            .map(|id| format!("https://letterboxd.com/imdb/{}", id)),
        Source::Tmdb => d
            .tmdb_id
            .map(|id| format!("https://www.themoviedb.org/movie/{}", id)),
        Source::Trakt => Some(format!(
            "https://trakt.tv/movies/{}",
            with_year(slugify(&d.title, '-'), '-')
        )),
        Source::Tomato | Source::Popcorn => Some(format!(
            "https://www.rottentomatoes.com/m/{}",
            with_year(slugify(&d.title, '_'), '_')
        )),
        Source::Metacritic => Some(format!(
            "https://www.metacritic.com/movie/{}",
            slugify(&d.title, '-')
        )),
        Source::RogerEbert | Source::CinemaScore => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovieRecord, RatingValue, SourceRating};
    use chrono::NaiveDate;

    fn options() -> ReportOptions {
        ReportOptions::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    fn movie() -> RatedMovie {
        let mut record = MovieRecord::new("Dune: Part Two", Some(2024));
        record.details.imdb_id = Some("tt15239678".to_string());
        record.details.tmdb_id = Some(693134);
        record.details.imdb_popularity = Some(20);
        record.details.age_rating = Some("PG-13".to_string());
        record.details.overview = Some("y".repeat(150));
        record.extend_ratings([
            SourceRating::new(RatingValue::fraction(Source::Imdb, "8.5/10"))
                .with_votes(Some(154502)),
            SourceRating::new(RatingValue::fraction(Source::Tmdb, "8.2/10"))
                .with_votes(Some(1541)),
            SourceRating::new(RatingValue::percentage(Source::Tomato, "92%")),
            SourceRating::new(RatingValue::percentage(Source::Popcorn, "75%")),
            SourceRating::new(RatingValue::fraction(Source::Metacritic, "N/A")),
        ]);
        record.finalize()
    }

    #[test]
    fn test_page_structure() {
        let html = render_html(&[movie()], &options()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Latest Movie Releases"));
        assert!(html.contains("March 4, 2024"));
        assert!(html.contains("score-badge green"));
        assert!(html.contains("tt15239678"));
        assert!(html.contains("themoviedb.org"));
        assert!(html.contains("693134"));
        assert!(html.contains(">TMDb<"));
        assert!(html.contains("154502"));
        assert!(html.contains("imdb-popularity"));
        assert!(html.contains("PG-13"));
        assert!(html.contains("(2024)"));
    }

    #[test]
    fn test_rows_without_score_or_votes_are_omitted() {
        let html = render_html(&[movie()], &options()).unwrap();
        assert!(html.contains(">IMDb<"));
        assert!(html.contains(">Tomato<"));
        assert!(!html.contains(">Metacritic<"));
        assert!(!html.contains(">Letterboxd<"));
    }

    #[test]
    fn test_synopsis_truncated() {
        let html = render_html(&[movie()], &options()).unwrap();
        assert!(html.contains(&format!("{}...", "y".repeat(117))));
        assert!(!html.contains(&"y".repeat(118)));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut record = MovieRecord::new("<script>alert(1)</script>", None);
        record.details.overview = Some("Tom & Jerry".to_string());
        let html = render_html(&[record.finalize()], &options()).unwrap();

        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("score-badge gray"));
    }

    #[test]
    fn test_missing_poster_and_synopsis_fallbacks() {
        let html = render_html(&[MovieRecord::new("Bare", None).finalize()], &options()).unwrap();
        assert!(html.contains("No synopsis available."));
        assert!(html.contains("No+Poster"));
    }

    #[test]
    fn test_source_style_thresholds() {
        assert_eq!(source_style(Source::Tomato, Score::Known(59)), DEFAULT_SOURCE_STYLE);
        assert!(source_style(Source::Tomato, Score::Known(60)).contains("#FF4500"));
        assert_eq!(source_style(Source::Popcorn, Score::Known(79)), DEFAULT_SOURCE_STYLE);
        assert!(source_style(Source::Popcorn, Score::Known(80)).contains("#6cbdb4"));
        assert_eq!(source_style(Source::Metacritic, Score::Known(69)), DEFAULT_SOURCE_STYLE);
        assert_eq!(source_style(Source::Metacritic, Score::Known(70)), "color: #ffb74d;");
        assert_eq!(source_style(Source::Imdb, Score::Known(100)), DEFAULT_SOURCE_STYLE);
        assert_eq!(source_style(Source::Tomato, Score::Unavailable), DEFAULT_SOURCE_STYLE);
    }

    #[test]
    fn test_source_urls() {
        let movie = movie();
        assert_eq!(
            source_url(&movie, Source::Imdb).as_deref(),
            Some("https://www.imdb.com/title/tt15239678")
        );
        assert_eq!(
            source_url(&movie, Source::Tomato).as_deref(),
            Some("https://www.rottentomatoes.com/m/dune_part_two_2024")
        );
        assert_eq!(
            source_url(&movie, Source::Trakt).as_deref(),
            Some("https://trakt.tv/movies/dune-part-two-2024")
        );
        assert_eq!(
            source_url(&movie, Source::Tmdb).as_deref(),
            Some("https://www.themoviedb.org/movie/693134")
        );
        assert!(source_url(&movie, Source::RogerEbert).is_none());
    }

    #[test]
    fn test_empty_page_renders() {
        let html = render_html(&[], &options()).unwrap();
        assert!(html.contains("No movies to display."));
    }
}
