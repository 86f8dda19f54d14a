//! API key configuration from the environment and `.env` files

use std::path::PathBuf;

use super::mailer::EmailSettings;
use crate::types::{MovieHeatError, Result};

pub const TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const OMDB_API_KEY: &str = "OMDB_API_KEY";
pub const MDBLIST_API_KEY: &str = "MDBLIST_API_KEY";
pub const GMAIL_USER: &str = "GMAIL_USER";
pub const GMAIL_APP_PASSWORD: &str = "GMAIL_APP_PASSWORD";
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// Where to get each key, shown when one is missing
const KEY_HELP: [(&str, &str); 3] = [
    (TMDB_API_KEY, "https://www.themoviedb.org/settings/api"),
    (OMDB_API_KEY, "http://www.omdbapi.com/apikey.aspx"),
    (MDBLIST_API_KEY, "https://mdblist.com/preferences/"),
];

/// API keys for the remote sources and email credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub mdblist_api_key: Option<String>,
    pub gmail_user: Option<String>,
    pub gmail_app_password: Option<String>,
    pub recipient_email: Option<String>,
}

impl Config {
    /// Load `.env` files, then read keys from the process environment.
    ///
    /// `./.env` is read first, then `~/.movieheat/.env`. Variables that are
    /// already set are never overwritten.
    pub fn load() -> Self {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!("loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("ignoring .env: {}", e),
        }
        if let Some(path) = user_env_path().filter(|p| p.exists()) {
            if let Err(e) = dotenv::from_path(&path) {
                tracing::warn!("ignoring {}: {}", path.display(), e);
            }
        }
        Self::from_env()
    }

    /// Read keys from the process environment only
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            tmdb_api_key: get(TMDB_API_KEY),
            omdb_api_key: get(OMDB_API_KEY),
            mdblist_api_key: get(MDBLIST_API_KEY),
            gmail_user: get(GMAIL_USER),
            gmail_app_password: get(GMAIL_APP_PASSWORD),
            recipient_email: get(RECIPIENT_EMAIL),
        }
    }

    /// Email settings when both Gmail credentials are set; the recipient
    /// defaults to the sender
    pub fn email(&self) -> Option<EmailSettings> {
        let user = self.gmail_user.clone()?;
        let app_password = self.gmail_app_password.clone()?;
        let recipient = self.recipient_email.clone().unwrap_or_else(|| user.clone());
        Some(EmailSettings {
            user,
            app_password,
            recipient,
        })
    }

    /// Keys needed for the latest-releases report: (TMDB, OMDb)
    pub fn require_latest(&self) -> Result<(&str, &str)> {
        match (self.tmdb_api_key.as_deref(), self.omdb_api_key.as_deref()) {
            (Some(tmdb), Some(omdb)) => Ok((tmdb, omdb)),
            (tmdb, omdb) => {
                let mut missing = Vec::new();
                if tmdb.is_none() {
                    missing.push(TMDB_API_KEY);
                }
                if omdb.is_none() {
                    missing.push(OMDB_API_KEY);
                }
                Err(missing_keys_error(&missing))
            }
        }
    }

    /// Key needed for the MDBList report
    pub fn require_mdblist(&self) -> Result<&str> {
        self.mdblist_api_key
            .as_deref()
            .ok_or_else(|| missing_keys_error(&[MDBLIST_API_KEY]))
    }
}

/// `~/.movieheat/.env`
fn user_env_path() -> Option<PathBuf> {
    directories::UserDirs::new().map(|d| d.home_dir().join(".movieheat").join(".env"))
}

fn missing_keys_error(missing: &[&str]) -> MovieHeatError {
    let mut msg = format!("missing required API keys: {}", missing.join(", "));
    for key in missing {
        if let Some((_, url)) = KEY_HELP.iter().find(|(k, _)| k == key) {
            msg.push_str(&format!("\n  {}: get one at {}", key, url));
        }
    }
    msg.push_str("\nSet them in the environment or in a .env file (KEY=value per line).");
    MovieHeatError::Config(msg)
}
