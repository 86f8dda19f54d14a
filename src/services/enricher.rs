//! Runs every registered provider against each movie and finalizes the
//! results

use rayon::prelude::*;

use crate::services::http::HttpClient;
use crate::sources::ProviderRegistry;
use crate::types::{MovieRecord, RatedMovie};

/// Fills movie records from all providers, in parallel across movies
pub struct MovieEnricher {
    http: HttpClient,
    registry: ProviderRegistry,
}

impl MovieEnricher {
    pub fn new(http: HttpClient, registry: ProviderRegistry) -> Self {
        let covered: Vec<&str> = registry.covered_sources().iter().map(|s| s.key()).collect();
        tracing::debug!(
            "{} providers covering: {}",
            registry.providers().len(),
            covered.join(", ")
        );
        Self { http, registry }
    }

    /// Enrich and finalize every record, keeping input order.
    ///
    /// A failing provider is logged and contributes nothing; the movie
    /// still gets whatever the other providers found.
    pub fn enrich(&self, records: Vec<MovieRecord>) -> Vec<RatedMovie> {
        records
            .into_par_iter()
            .map(|mut record| {
                self.populate(&mut record);
                record.finalize()
            })
            .collect()
    }

    /// Run providers in registration order against a single record
    pub fn populate(&self, record: &mut MovieRecord) {
        for provider in self.registry.providers() {
            match provider.populate(&self.http, record) {
                Ok(added) => tracing::debug!(
                    "{} -> {}: {} ratings",
                    provider.name(),
                    record.details.title,
                    added
                ),
                Err(e) => tracing::warn!(
                    "{} failed for {}: {}",
                    provider.name(),
                    record.details.title,
                    e
                ),
            }
        }
    }
}
