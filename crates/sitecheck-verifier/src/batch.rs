//! Chunked, failure-tolerant scheduling of location verification.

use std::time::Duration;

use futures::future::join_all;
use sitecheck_core::{FactCheck, Location, VerificationRecord};

use crate::extract::TextExtractor;
use crate::matcher::{FactMatcher, FactReport};
use crate::probe::ProtocolProbe;

/// Runs the verification pipeline over a snapshot of locations.
///
/// Locations are partitioned into contiguous chunks. Within a chunk every
/// location is processed concurrently; across chunks processing is strictly
/// sequential, with an optional delay in between — the one serialization
/// point, used to cap concurrent outbound connections against scraped sites
/// and the matcher endpoint.
pub struct BatchScheduler {
    probe: ProtocolProbe,
    extractor: TextExtractor,
    matcher: FactMatcher,
    chunk_size: usize,
    inter_chunk_delay_ms: u64,
}

impl BatchScheduler {
    #[must_use]
    pub fn new(
        probe: ProtocolProbe,
        extractor: TextExtractor,
        matcher: FactMatcher,
        chunk_size: usize,
        inter_chunk_delay_ms: u64,
    ) -> Self {
        Self {
            probe,
            extractor,
            matcher,
            chunk_size: chunk_size.max(1),
            inter_chunk_delay_ms,
        }
    }

    /// Verify every location and return one record per location.
    ///
    /// Never fails: every per-location problem is captured inside that
    /// location's record. Chunk N's network calls are not issued until all
    /// of chunk N-1 has resolved.
    pub async fn run(&self, locations: &[Location]) -> Vec<VerificationRecord> {
        if locations.is_empty() {
            tracing::info!("no locations to verify");
            return Vec::new();
        }

        let total_chunks = chunk_count(locations.len(), self.chunk_size);
        let mut records: Vec<VerificationRecord> = Vec::with_capacity(locations.len());

        for (index, chunk) in locations.chunks(self.chunk_size).enumerate() {
            tracing::info!(
                chunk = index + 1,
                total_chunks,
                size = chunk.len(),
                "processing chunk"
            );

            // Per-location futures are infallible (failures are folded into
            // the record), so joining them never aborts a sibling.
            let chunk_records =
                join_all(chunk.iter().map(|location| self.process_location(location))).await;
            records.extend(chunk_records);

            if index + 1 < total_chunks && self.inter_chunk_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_chunk_delay_ms)).await;
            }
        }

        records
    }

    /// Probe reachability and check facts for one location.
    ///
    /// A location without a website URI short-circuits to a record with no
    /// probe result and all facts undetermined — no network calls are made
    /// for it.
    async fn process_location(&self, location: &Location) -> VerificationRecord {
        let Some(uri) = location
            .website_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
        else {
            return VerificationRecord {
                id: location.id,
                business_name: location.business_name.clone(),
                website_uri: location.website_uri.clone(),
                probe: None,
                address: FactCheck::undetermined("no website URI on record"),
                hours: FactCheck::undetermined("no website URI on record"),
                phone: FactCheck::undetermined("no website URI on record"),
            };
        };

        let (probe_result, facts) =
            tokio::join!(self.probe.probe(uri), self.check_facts(location, uri));

        tracing::info!(
            business = %location.business_name,
            url = uri,
            accessible = probe_result.is_accessible,
            https = probe_result.supports_https,
            "checked website"
        );

        VerificationRecord {
            id: location.id,
            business_name: location.business_name.clone(),
            website_uri: location.website_uri.clone(),
            probe: Some(probe_result),
            address: facts.address,
            hours: facts.hours,
            phone: facts.phone,
        }
    }

    async fn check_facts(&self, location: &Location, uri: &str) -> FactReport {
        match self.extractor.extract(uri).await {
            Some(page_text) => self.matcher.check(location, &page_text).await,
            None => FactReport::undetermined("failed to fetch website text"),
        }
    }
}

/// Number of chunks a run of `total` locations forms at `chunk_size`.
pub(crate) fn chunk_count(total: usize, chunk_size: usize) -> usize {
    total.div_ceil(chunk_size.max(1))
}
