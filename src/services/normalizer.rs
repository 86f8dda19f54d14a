//! Rating normalization service
//!
//! Maps every provider's native rating representation onto one 0-100
//! integer scale so ratings from different sources can be compared and
//! averaged. Normalization is total: anything that cannot be read as a
//! rating becomes [`Score::Unavailable`], never an error.

use crate::types::{RatingKind, RatingValue, Score};

/// Letter grade table (CinemaScore)
const GRADES: [(&str, u8); 13] = [
    ("A+", 98),
    ("A", 95),
    ("A-", 92),
    ("B+", 88),
    ("B", 85),
    ("B-", 82),
    ("C+", 78),
    ("C", 75),
    ("C-", 72),
    ("D+", 68),
    ("D", 65),
    ("D-", 62),
    ("F", 50),
];

/// Normalize a rating to the 0-100 scale.
///
/// # Examples
/// ```
/// use movieheat::services::normalizer::normalize;
/// use movieheat::types::{RatingValue, Score, Source};
///
/// assert_eq!(normalize(&RatingValue::fraction(Source::Imdb, "8.5/10")), Score::Known(85));
/// assert_eq!(normalize(&RatingValue::grade(Source::CinemaScore, "B+")), Score::Known(88));
/// ```
pub fn normalize(value: &RatingValue) -> Score {
    match &value.kind {
        RatingKind::RawFraction(text) => normalize_fraction(text),
        RatingKind::Percentage(text) => normalize_percentage(text),
        RatingKind::LetterGrade(text) => normalize_grade(text),
        RatingKind::Decimal(v) => to_score(v / 5.0 * 100.0),
    }
}

/// "8.5/10" -> 85, "73/100 (Metascore)" -> 73, "3/4" -> 75, bare "8.2" -> 82
fn normalize_fraction(text: &str) -> Score {
    if is_missing(text) {
        return Score::Unavailable;
    }

    let Some((numerator, denominator)) = text.split_once('/') else {
        return parse_number(text).map_or(Score::Unavailable, |x| to_score(x * 10.0));
    };

    let (Some(x), Some(d)) = (parse_number(numerator), leading_number(denominator)) else {
        return Score::Unavailable;
    };

    if d <= 0.0 {
        return Score::Unavailable;
    }

    // Exact scales first so 10- and 100-point values avoid a division
    if d == 10.0 {
        to_score(x * 10.0)
    } else if d == 100.0 {
        to_score(x)
    } else {
        to_score(x * 100.0 / d)
    }
}

/// "92%" -> 92
fn normalize_percentage(text: &str) -> Score {
    if is_missing(text) {
        return Score::Unavailable;
    }
    let stripped = text.trim().trim_end_matches('%');
    parse_number(stripped).map_or(Score::Unavailable, to_score)
}

/// "b+" -> 88; unknown grades are unavailable
fn normalize_grade(text: &str) -> Score {
    if is_missing(text) {
        return Score::Unavailable;
    }
    let grade = text.trim().to_ascii_uppercase();
    GRADES
        .iter()
        .find(|(g, _)| *g == grade)
        .map_or(Score::Unavailable, |(_, v)| Score::Known(*v))
}

/// Placeholder values providers use for "no rating"
fn is_missing(text: &str) -> bool {
    let t = text.trim();
    t.is_empty()
        || t == "-"
        || t.eq_ignore_ascii_case("n/a")
        || t.eq_ignore_ascii_case("null")
}

/// Whole-string number parse (surrounding whitespace allowed)
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Number at the start of `text`, ignoring any trailing unit text
fn leading_number(text: &str) -> Option<f64> {
    let t = text.trim_start();
    let end = t
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map_or(t.len(), |(i, _)| i);
    parse_number(&t[..end])
}

/// Round half away from zero; anything outside 0-100 is unavailable
fn to_score(value: f64) -> Score {
    if !value.is_finite() || value < 0.0 {
        return Score::Unavailable;
    }
    let rounded = value.round();
    if (0.0..=100.0).contains(&rounded) {
        Score::Known(rounded as u8)
    } else {
        Score::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn fraction(text: &str) -> Score {
        normalize(&RatingValue::fraction(Source::Imdb, text))
    }

    fn percent(text: &str) -> Score {
        normalize(&RatingValue::percentage(Source::Tomato, text))
    }

    fn grade(text: &str) -> Score {
        normalize(&RatingValue::grade(Source::CinemaScore, text))
    }

    // ========== Raw fractions ==========

    #[test]
    fn test_imdb_out_of_ten() {
        assert_eq!(fraction("8.5/10"), Score::Known(85));
        assert_eq!(fraction("8.0/10"), Score::Known(80));
    }

    #[test]
    fn test_out_of_ten_rounds_instead_of_truncating() {
        assert_eq!(fraction("7.96/10"), Score::Known(80));
        assert_eq!(fraction("6.25/10"), Score::Known(63));
    }

    #[test]
    fn test_out_of_hundred() {
        assert_eq!(
            normalize(&RatingValue::fraction(Source::Metacritic, "73/100")),
            Score::Known(73)
        );
    }

    #[test]
    fn test_out_of_hundred_with_unit_text() {
        assert_eq!(fraction("73/100 (Metascore)"), Score::Known(73));
        assert_eq!(fraction("64/100critics"), Score::Known(64));
    }

    #[test]
    fn test_other_denominator() {
        assert_eq!(
            normalize(&RatingValue::fraction(Source::RogerEbert, "3.5/4")),
            Score::Known(88)
        );
    }

    #[test]
    fn test_bare_number_treated_as_out_of_ten() {
        assert_eq!(
            normalize(&RatingValue::fraction(Source::Tmdb, "8.2")),
            Score::Known(82)
        );
    }

    #[test]
    fn test_zero_denominator_unavailable() {
        assert_eq!(fraction("5/0"), Score::Unavailable);
    }

    #[test]
    fn test_malformed_fraction_unavailable() {
        assert_eq!(fraction("abc/10"), Score::Unavailable);
        assert_eq!(fraction("8.5/"), Score::Unavailable);
        assert_eq!(fraction("8.5/ten"), Score::Unavailable);
    }

    #[test]
    fn test_fraction_out_of_range_unavailable() {
        assert_eq!(fraction("11/10"), Score::Unavailable);
        assert_eq!(fraction("-1/10"), Score::Unavailable);
        // would round to -0
        assert_eq!(fraction("-0.04/10"), Score::Unavailable);
        assert_eq!(percent("-0.4%"), Score::Unavailable);
        assert_eq!(
            normalize(&RatingValue::decimal(Source::Letterboxd, -0.01)),
            Score::Unavailable
        );
    }

    // ========== Percentages ==========

    #[test]
    fn test_percentage() {
        assert_eq!(percent("92%"), Score::Known(92));
        assert_eq!(percent(" 7% "), Score::Known(7));
        assert_eq!(percent("0%"), Score::Known(0));
    }

    #[test]
    fn test_percentage_without_suffix() {
        assert_eq!(percent("85"), Score::Known(85));
    }

    #[test]
    fn test_fractional_percentage_rounds() {
        assert_eq!(percent("92.5%"), Score::Known(93));
    }

    #[test]
    fn test_percentage_over_hundred_unavailable() {
        assert_eq!(percent("120%"), Score::Unavailable);
    }

    // ========== Letter grades ==========

    #[test]
    fn test_grade_table() {
        let expected = [
            ("A+", 98),
            ("A", 95),
            ("A-", 92),
            ("B+", 88),
            ("B", 85),
            ("B-", 82),
            ("C+", 78),
            ("C", 75),
            ("C-", 72),
            ("D+", 68),
            ("D", 65),
            ("D-", 62),
            ("F", 50),
        ];
        for (g, v) in expected {
            assert_eq!(grade(g), Score::Known(v), "grade {}", g);
        }
    }

    #[test]
    fn test_grade_case_insensitive() {
        assert_eq!(grade("b+"), Score::Known(88));
        assert_eq!(grade(" a- "), Score::Known(92));
    }

    #[test]
    fn test_unknown_grade_unavailable() {
        assert_eq!(grade("E"), Score::Unavailable);
        assert_eq!(grade("A++"), Score::Unavailable);
    }

    // ========== Decimals (5-point scale) ==========

    #[test]
    fn test_five_point_decimal() {
        let boxd = |v| normalize(&RatingValue::decimal(Source::Letterboxd, v));
        assert_eq!(boxd(4.2), Score::Known(84));
        assert_eq!(boxd(3.63), Score::Known(73));
        assert_eq!(boxd(0.0), Score::Known(0));
        assert_eq!(boxd(5.0), Score::Known(100));
    }

    #[test]
    fn test_decimal_nan_unavailable() {
        assert_eq!(
            normalize(&RatingValue::decimal(Source::Letterboxd, f64::NAN)),
            Score::Unavailable
        );
    }

    // ========== Missing values ==========

    #[test]
    fn test_missing_markers_unavailable_for_every_kind() {
        for marker in ["", "   ", "N/A", "n/a", "-", "null", "NULL"] {
            assert_eq!(fraction(marker), Score::Unavailable, "fraction {:?}", marker);
            assert_eq!(percent(marker), Score::Unavailable, "percent {:?}", marker);
            assert_eq!(grade(marker), Score::Unavailable, "grade {:?}", marker);
        }
    }

    // ========== Helpers ==========

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("100 critics"), Some(100.0));
        assert_eq!(leading_number(" 10"), Some(10.0));
        assert_eq!(leading_number("critics"), None);
    }

    #[test]
    fn test_to_score_rounds_half_away_from_zero() {
        assert_eq!(to_score(74.5), Score::Known(75));
        assert_eq!(to_score(74.49), Score::Known(74));
        assert_eq!(to_score(100.4), Score::Known(100));
        assert_eq!(to_score(100.5), Score::Unavailable);
    }
}
