//! Error taxonomy shared across the ingestion pipeline and the propagator.

use thiserror::Error;

/// Network-level failure while retrieving a source.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Structurally invalid source content.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected constellation table not found in document")]
    MissingTable,

    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("invalid numeric field {field}: {value:?}")]
    Numeric { field: &'static str, value: String },
}

/// The eccentric anomaly solver did not stabilize.
#[derive(Debug, Error)]
#[error(
    "Kepler's equation did not converge after {iterations} iterations \
     (e = {eccentricity}, M = {mean_anomaly} rad)"
)]
pub struct ConvergenceError {
    pub eccentricity: f64,
    pub mean_anomaly: f64,
    pub iterations: u32,
}

/// Anything an ingestion job can fail with before reaching its sink.
/// Caught at the job boundary and turned into a recorded failure entry;
/// never propagated to the scheduler.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
