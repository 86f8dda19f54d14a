use thiserror::Error;

/// movieheat error types
#[derive(Error, Debug)]
pub enum MovieHeatError {
    /// HTTP request failed or returned an unusable status
    #[error("http error: {0}")]
    Http(String),

    /// Failed to parse a JSON or HTML response
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (missing API key, bad .env)
    #[error("config error: {0}")]
    Config(String),

    /// Report rendering failed
    #[error("render error: {0}")]
    Render(String),

    /// Building or sending the report email failed
    #[error("email error: {0}")]
    Email(String),
}

impl From<reqwest::Error> for MovieHeatError {
    fn from(err: reqwest::Error) -> Self {
        MovieHeatError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for MovieHeatError {
    fn from(err: serde_json::Error) -> Self {
        MovieHeatError::Parse(err.to_string())
    }
}

/// Result type alias for movieheat
pub type Result<T> = std::result::Result<T, MovieHeatError>;
