//! The `verify` run: the pipeline's invocation boundary.
//!
//! Loads eligible locations, runs the batch scheduler against them, writes
//! results back in chunks, and prints a structured JSON summary. Per-location
//! problems are data on the records; only run-level failures (config, store
//! access) abort the command.

use std::time::Instant;

use serde::Serialize;

use sitecheck_core::{AppConfig, Location, MatcherChoice};
use sitecheck_db::{GmbLocationRow, PoolConfig, VerificationUpdate};
use sitecheck_verifier::{
    AiMatcher, BatchScheduler, FactMatcher, ProtocolProbe, TextExtractor, TextMatcher,
};

/// Base delay for the matcher's transient-failure backoff.
const MATCHER_BACKOFF_BASE_SECS: u64 = 1;

/// Successful run summary, printed as JSON on stdout.
#[derive(Debug, Serialize)]
struct RunSummary {
    message: String,
    processed: usize,
    execution_time_ms: u128,
}

/// Run-level failure summary, printed as JSON on stderr.
#[derive(Debug, Serialize)]
struct RunFailure {
    error: String,
    message: String,
    execution_time_ms: u128,
}

/// Execute a verification run and report its outcome.
///
/// # Errors
///
/// Returns an error for run-level failures only: bad configuration, store
/// connection/query failures, or a failing write-back chunk. Individual
/// unreachable sites and ambiguous matches are normal outcomes.
pub(crate) async fn run_verify(
    config: &AppConfig,
    limit: Option<i64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    match verify_locations(config, limit, dry_run, started).await {
        Ok(summary) => {
            println!("{}", serde_json::to_string(&summary)?);
            Ok(())
        }
        Err(e) => {
            let failure = RunFailure {
                error: "failed to check websites".to_string(),
                message: format!("{e:#}"),
                execution_time_ms: started.elapsed().as_millis(),
            };
            eprintln!("{}", serde_json::to_string(&failure)?);
            Err(e)
        }
    }
}

async fn verify_locations(
    config: &AppConfig,
    limit: Option<i64>,
    dry_run: bool,
    started: Instant,
) -> anyhow::Result<RunSummary> {
    let pool = sitecheck_db::connect_pool(&config.database_url, pool_config(config)).await?;

    let rows = sitecheck_db::list_locations_to_verify(&pool, limit).await?;
    tracing::info!(count = rows.len(), "loaded locations with website URIs");

    if rows.is_empty() {
        return Ok(RunSummary {
            message: "no locations with website URIs found".to_string(),
            processed: 0,
            execution_time_ms: started.elapsed().as_millis(),
        });
    }

    let locations: Vec<Location> = rows.into_iter().map(GmbLocationRow::into_location).collect();

    if dry_run {
        println!("dry-run: would verify {} location(s):", locations.len());
        for location in &locations {
            println!(
                "  {:<35} {}",
                location.business_name,
                location.website_uri.as_deref().unwrap_or("(no website)")
            );
        }
        return Ok(RunSummary {
            message: "dry run, nothing verified".to_string(),
            processed: 0,
            execution_time_ms: started.elapsed().as_millis(),
        });
    }

    let scheduler = BatchScheduler::new(
        ProtocolProbe::new(config.probe_timeout_secs)?,
        TextExtractor::new(config.fetch_timeout_secs, &config.user_agent)?,
        build_matcher(config)?,
        config.chunk_size,
        config.inter_chunk_delay_ms,
    );

    println!("Verifying websites for {} locations...", locations.len());
    let records = scheduler.run(&locations).await;

    for record in &records {
        match record.probe {
            Some(probe) if probe.is_accessible => println!(
                "  \u{2713} {:<35} https={:<5} address={} hours={} phone={}",
                record.business_name,
                probe.supports_https,
                flag(record.address.is_match()),
                flag(record.hours.is_match()),
                flag(record.phone.is_match()),
            ),
            Some(_) => println!("  \u{2717} {:<35} unreachable", record.business_name),
            None => println!("  - {:<35} no website URI", record.business_name),
        }
    }

    let updates: Vec<VerificationUpdate> = records
        .iter()
        .filter_map(VerificationUpdate::from_record)
        .collect();
    let updated =
        sitecheck_db::update_verification_results(&pool, &updates, config.update_chunk_size)
            .await?;

    println!(
        "Run complete: {} locations checked, {updated} rows updated",
        records.len()
    );

    Ok(RunSummary {
        message: "successfully checked websites for all locations".to_string(),
        processed: records.len(),
        execution_time_ms: started.elapsed().as_millis(),
    })
}

/// Map the app config's pool settings into the db crate's `PoolConfig`.
pub(crate) fn pool_config(config: &AppConfig) -> PoolConfig {
    PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    }
}

/// Build the matcher the config selects.
///
/// The AI matcher requires a credential; a missing key with
/// `SITECHECK_MATCHER=ai` is a configuration error, not a degraded run.
fn build_matcher(config: &AppConfig) -> anyhow::Result<FactMatcher> {
    match config.matcher {
        MatcherChoice::Text => Ok(FactMatcher::Text(TextMatcher::new())),
        MatcherChoice::Ai => {
            let api_key = config.matcher_api_key.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "SITECHECK_MATCHER_API_KEY (or OPENAI_API_KEY) must be set when SITECHECK_MATCHER=ai"
                )
            })?;
            let matcher = AiMatcher::new(
                api_key,
                &config.matcher_model,
                config.matcher_timeout_secs,
                config.matcher_max_retries,
                MATCHER_BACKOFF_BASE_SECS,
            )?
            .with_base_url(&config.matcher_base_url);
            Ok(FactMatcher::Ai(matcher))
        }
    }
}

/// Render a nullable match flag for the progress line.
fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "n/a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_to_the_reporting_shape() {
        let summary = RunSummary {
            message: "successfully checked websites for all locations".to_string(),
            processed: 12,
            execution_time_ms: 3456,
        };
        let value: serde_json::Value = serde_json::from_str(
            &serde_json::to_string(&summary).unwrap(),
        )
        .unwrap();
        assert_eq!(
            value["message"],
            "successfully checked websites for all locations"
        );
        assert_eq!(value["processed"], 12);
        assert_eq!(value["execution_time_ms"], 3456);
    }

    #[test]
    fn failure_serializes_error_and_timing() {
        let failure = RunFailure {
            error: "failed to check websites".to_string(),
            message: "connection refused".to_string(),
            execution_time_ms: 42,
        };
        let value: serde_json::Value = serde_json::from_str(
            &serde_json::to_string(&failure).unwrap(),
        )
        .unwrap();
        assert_eq!(value["error"], "failed to check websites");
        assert_eq!(value["message"], "connection refused");
    }

    #[test]
    fn flags_render_three_states() {
        assert_eq!(flag(Some(true)), "yes");
        assert_eq!(flag(Some(false)), "no");
        assert_eq!(flag(None), "n/a");
    }
}
