//! Services for rating normalization, aggregation and enrichment

pub mod aggregator;
pub mod config;
pub mod enricher;
pub mod http;
pub mod mailer;
pub mod normalizer;
pub mod tier;

pub use aggregator::Aggregator;
pub use config::Config;
pub use enricher::MovieEnricher;
pub use http::HttpClient;
pub use mailer::EmailSettings;
pub use normalizer::normalize;
pub use tier::tier;
