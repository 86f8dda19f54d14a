//! Plain-text digest

use super::{truncate, ReportOptions, REPORT_TITLE};
use crate::types::{MovieDetails, RatedMovie, Source};

const RULE_WIDTH: usize = 80;
const LOGLINE_MAX: usize = 200;

/// Render the digest; one block per movie separated by rules
pub fn render_text(movies: &[RatedMovie], options: &ReportOptions) -> String {
    if movies.is_empty() {
        return "No movies to display.\n".to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        centered(REPORT_TITLE),
        centered(&options.generated.format("%B %-d, %Y").to_string()),
        rule.clone(),
        String::new(),
    ];

    for (i, movie) in movies.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
            lines.push(rule.clone());
            lines.push(String::new());
        }
        details_lines(&movie.details, &mut lines);
        lines.push("---".to_string());
        for source in Source::ALL {
            lines.push(format!("{}: {}", source.key(), rating_text(movie, source, options)));
        }
        lines.push(format!("overall: {} ({})", movie.overall, movie.tier));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn details_lines(d: &MovieDetails, lines: &mut Vec<String>) {
    lines.push(d.title.clone());
    lines.push(format!(
        "Written by: {} • Directed by: {} • Produced by: {}",
        or_na(d.writer.as_deref()),
        or_na(d.director.as_deref()),
        or_na(d.producer.as_deref())
    ));
    lines.push(format!("Starring: {}", join_or_na(&d.actors)));
    lines.push(format!(
        "Release: {} ({})",
        or_na(d.release_date.as_deref()),
        or_na(d.release_type.as_deref())
    ));
    let runtime = d
        .runtime_minutes
        .map_or_else(|| "N/A".to_string(), |m| format!("{} min", m));
    lines.push(format!(
        "Genres: {} • {} • {}",
        join_or_na(&d.genres),
        runtime,
        d.age_rating.as_deref().unwrap_or("NR")
    ));
    lines.push(format!("Studio: {}", or_na(d.studio.as_deref())));
    let logline = d
        .overview
        .as_deref()
        .map_or_else(|| "N/A".to_string(), |o| truncate(o, LOGLINE_MAX));
    lines.push(format!("Logline: {}", logline));
}

/// Provider value, or normalized score with `--normalize`; "-" when missing
fn rating_text(movie: &RatedMovie, source: Source, options: &ReportOptions) -> String {
    let Some(rating) = movie.rating(source) else {
        return "-".to_string();
    };
    if options.normalize {
        return rating.score.to_string();
    }
    let raw = rating.raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("n/a") {
        "-".to_string()
    } else {
        raw.to_string()
    }
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = RULE_WIDTH)
        .trim_end()
        .to_string()
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        "N/A".to_string()
    } else {
        values.join(", ")
    }
}
