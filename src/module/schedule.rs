//! Per-source scheduling. A single loop polls the board once a second and
//! runs each due job to completion before re-arming it, so no two jobs
//! ever run concurrently and a running job cannot re-enter. A job that
//! overruns the tick delays later-due jobs; that trade-off is deliberate.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::config::SourceSpec;
use crate::model::record::IngestionOutcome;

use super::fetch::Transport;
use super::ingest;
use super::sink::Sink;

const TICK: Duration = Duration::from_secs(1);

struct Slot {
    spec: SourceSpec,
    next_due: DateTime<Utc>,
}

/// Pure due-time bookkeeping, separated from the loop so it can be driven
/// by a simulated clock in tests.
pub struct ScheduleBoard {
    slots: Vec<Slot>,
}

impl ScheduleBoard {
    /// Every slot starts due at `now`, so the first pass runs each source
    /// immediately.
    pub fn new(specs: Vec<SourceSpec>, now: DateTime<Utc>) -> Self {
        let slots = specs
            .into_iter()
            .map(|spec| Slot {
                spec,
                next_due: now,
            })
            .collect();
        Self { slots }
    }

    /// First slot due at `now`, if any. Due-ness is evaluated per source;
    /// one source's run never advances another's due time.
    pub fn next_due(&self, now: DateTime<Utc>) -> Option<usize> {
        self.slots.iter().position(|slot| slot.next_due <= now)
    }

    pub fn spec(&self, index: usize) -> &SourceSpec {
        &self.slots[index].spec
    }

    /// Re-arms a slot after its job returned (success or failure alike).
    pub fn rearm(&mut self, index: usize, completed_at: DateTime<Utc>) {
        let slot = &mut self.slots[index];
        slot.next_due = completed_at + slot.spec.interval();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Scheduler loop; runs until process shutdown.
pub async fn run<T: Transport, S: Sink>(mut board: ScheduleBoard, transport: &T, sink: &S) {
    tracing::info!("Scheduler started with {} sources", board.len());

    loop {
        while let Some(index) = board.next_due(Utc::now()) {
            let spec = board.spec(index).clone();
            tracing::info!(
                "Source {} due, running ingestion (interval {} h)",
                spec.id,
                spec.interval_hours
            );

            match ingest::run_source(&spec, transport, sink).await {
                IngestionOutcome::Stored {
                    filename, records, ..
                } => {
                    tracing::info!("{}: stored {} records as {}", spec.id, records, filename);
                }
                IngestionOutcome::Failed(entry) => {
                    tracing::warn!("{}: run failed, recorded: {}", spec.id, entry.error);
                }
            }

            board.rearm(index, Utc::now());
        }

        tokio::time::sleep(TICK).await;
    }
}
