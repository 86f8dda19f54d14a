use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::report::{self, Format, ReportOptions};
use crate::services::config::{GMAIL_APP_PASSWORD, GMAIL_USER};
use crate::services::{mailer, Config, HttpClient, MovieEnricher};
use crate::sources::{sample_records, MdbListClient, ProviderRegistry, TmdbClient};
use crate::types::{MovieRecord, RatedMovie};

const DEFAULT_LATEST_LIMIT: usize = 15;
const DEFAULT_LIST_LIMIT: usize = 10;
const DEFAULT_DAYS: u32 = 7;

/// Rating digest for new movie releases
#[derive(Parser)]
#[command(name = "movieheat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest theatrical releases from TMDB, rated by every source (default)
    Latest {
        /// Maximum number of movies
        #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
        limit: usize,

        /// Size of the release window in days, ending yesterday
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rated movies from MDBList
    List {
        /// Maximum number of movies
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Built-in sample movies (no network)
    Sample {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct OutputArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Show normalized 0-100 scores
    #[arg(long)]
    normalize: bool,

    /// Also email the text and HTML report (GMAIL_USER, GMAIL_APP_PASSWORD, RECIPIENT_EMAIL)
    #[arg(long)]
    email: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let today = Local::now().date_naive();
        let command = self.command.unwrap_or(Commands::Latest {
            limit: DEFAULT_LATEST_LIMIT,
            days: DEFAULT_DAYS,
            output: OutputArgs::default(),
        });

        match command {
            Commands::Latest {
                limit,
                days,
                output,
            } => {
                let movies = run_latest(today, days, limit)?;
                emit(&movies, &output, today)
            }
            Commands::List { limit, output } => {
                let movies = run_list(today, limit)?;
                emit(&movies, &output, today)
            }
            Commands::Sample { output } => {
                let movies: Vec<RatedMovie> = sample_records()?
                    .into_iter()
                    .map(MovieRecord::finalize)
                    .collect();
                emit(&movies, &output, today)
            }
        }
    }
}

fn run_latest(today: NaiveDate, days: u32, limit: usize) -> anyhow::Result<Vec<RatedMovie>> {
    let config = Config::load();
    let (tmdb_key, omdb_key) = config.require_latest()?;
    let http = HttpClient::new()?;

    let records = TmdbClient::new(tmdb_key)
        .latest_releases(&http, today, days, limit)
        .context("failed to fetch latest releases from TMDB")?;
    if records.is_empty() {
        tracing::info!("no theatrical releases in the last {} days", days);
        return Ok(Vec::new());
    }

    tracing::info!("found {} movies, fetching ratings", records.len());
    let enricher = MovieEnricher::new(http, ProviderRegistry::latest(tmdb_key, omdb_key));
    Ok(enricher.enrich(records))
}

fn run_list(today: NaiveDate, limit: usize) -> anyhow::Result<Vec<RatedMovie>> {
    let config = Config::load();
    let mdblist_key = config.require_mdblist()?;
    let http = HttpClient::new()?;

    let mut records = MdbListClient::new(mdblist_key).rated_movies(&http, limit, today.year());
    if records.is_empty() {
        tracing::warn!("MDBList returned no rated movies; using sample data");
        records = sample_records()?;
    } else {
        tracing::info!("fetched {} movies from MDBList", records.len());
    }

    let registry = ProviderRegistry::list(config.tmdb_api_key.as_deref());
    Ok(MovieEnricher::new(http, registry).enrich(records))
}

/// Render and write to `--output` or stdout
fn emit(movies: &[RatedMovie], args: &OutputArgs, today: NaiveDate) -> anyhow::Result<()> {
    let options = ReportOptions::new(today).normalized(args.normalize);
    let rendered = report::render(movies, args.format, &options)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    if args.email {
        send_email(movies, &options)?;
    }
    Ok(())
}

/// Mail both report versions; missing credentials or a failed send only warn
fn send_email(movies: &[RatedMovie], options: &ReportOptions) -> anyhow::Result<()> {
    let Some(settings) = Config::load().email() else {
        tracing::warn!(
            "{} and {} not set; skipping email",
            GMAIL_USER,
            GMAIL_APP_PASSWORD
        );
        return Ok(());
    };

    let text = report::render(movies, Format::Text, options)?;
    let html = report::render(movies, Format::Html, options)?;
    if let Err(e) = mailer::send_report(&settings, text, html, options.generated) {
        tracing::warn!("failed to send email: {}", e);
    }
    Ok(())
}
