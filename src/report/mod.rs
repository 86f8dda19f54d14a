//! Report renderers: plain-text digest, HTML card grid and JSON

mod html;
mod text;

pub use html::render_html;
pub use text::render_text;

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::types::{MovieHeatError, RatedMovie, Result};

/// Report heading shared by text and HTML output
pub const REPORT_TITLE: &str = "Latest Movie Releases";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Html,
    Json,
}

/// Rendering switches
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Show normalized 0-100 scores instead of provider values
    pub normalize: bool,
    /// Date stamp printed under the heading
    pub generated: NaiveDate,
}

impl ReportOptions {
    pub fn new(generated: NaiveDate) -> Self {
        Self {
            normalize: false,
            generated,
        }
    }

    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// Render finalized movies in the requested format
pub fn render(movies: &[RatedMovie], format: Format, options: &ReportOptions) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(movies, options)),
        Format::Html => render_html(movies, options),
        Format::Json => render_json(movies),
    }
}

pub fn render_json(movies: &[RatedMovie]) -> Result<String> {
    serde_json::to_string_pretty(movies)
        .map_err(|e| MovieHeatError::Render(format!("JSON output: {}", e)))
}

/// Cut `text` to at most `max` characters, ending in "..." when cut
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
