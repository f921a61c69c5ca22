//! One ingestion run for one source: fetch, parse, persist, manifest.
//! Every failure is absorbed here and turned into a recorded failure
//! entry; nothing escapes to the scheduler, so one broken source can
//! never block another.

use chrono::{DateTime, Utc};

use crate::config::SourceSpec;
use crate::error::IngestError;
use crate::model::record::{FailureEntry, IngestionOutcome};
use crate::model::week;

use super::fetch::Transport;
use super::parse::{self, TIMESTAMP_FORMAT};
use super::sink::Sink;

pub async fn run_source<T: Transport, S: Sink>(
    spec: &SourceSpec,
    transport: &T,
    sink: &S,
) -> IngestionOutcome {
    let fetched_at = Utc::now();

    match ingest(spec, transport, sink, fetched_at).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let entry = FailureEntry {
                source_id: spec.id.clone(),
                timestamp: fetched_at.format(TIMESTAMP_FORMAT).to_string(),
                error: err.to_string(),
            };
            tracing::error!("Ingestion failed for {}: {}", spec.id, entry.error);

            if let Err(sink_err) = sink.record_failure(&entry) {
                tracing::warn!(
                    "Could not write failure entry for {}: {}",
                    spec.id,
                    sink_err
                );
            }
            IngestionOutcome::Failed(entry)
        }
    }
}

async fn ingest<T: Transport, S: Sink>(
    spec: &SourceSpec,
    transport: &T,
    sink: &S,
    fetched_at: DateTime<Utc>,
) -> Result<IngestionOutcome, IngestError> {
    let content = transport.fetch(spec).await?;
    let week = week::week_number(fetched_at);
    let payload = parse::parse_source(spec, content, week, fetched_at)?;
    let json = payload.to_pretty_json()?;

    let filename = format!("{}_{}.json", spec.id, fetched_at.timestamp());
    let records = payload.record_count();

    // Sink write errors are reported but do not retract a successful
    // parse; the manifest is only appended for a file that actually
    // landed on disk.
    if let Err(err) = sink.persist(&spec.id, &filename, &json) {
        tracing::error!("Failed to write {} for {}: {}", filename, spec.id, err);
    } else if let Err(err) = sink.append_manifest(&spec.id, &filename) {
        tracing::error!("Failed to update manifest for {}: {}", spec.id, err);
    } else {
        tracing::info!("Saved {} records for {} to {}", records, spec.id, filename);
    }

    Ok(IngestionOutcome::Stored {
        source_id: spec.id.clone(),
        filename,
        records,
    })
}
