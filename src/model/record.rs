//! Structured records produced by the format parsers. Serde names mirror
//! the published JSON layout consumed downstream, so renames here are
//! load-bearing.

use serde::{Deserialize, Serialize};

/// One satellite decoded from a NORAD two-line element triplet.
/// Angular fields are in degrees, as printed in the TLE itself (the
/// almanac variant below uses radians; the two must not be conflated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TleRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Line1")]
    pub line1: String,
    #[serde(rename = "Line2")]
    pub line2: String,
    #[serde(rename = "SatelliteNumber")]
    pub satellite_number: String,
    #[serde(rename = "Classification")]
    pub classification: String,
    #[serde(rename = "LaunchYear")]
    pub launch_year: String,
    #[serde(rename = "LaunchNumber")]
    pub launch_number: String,
    #[serde(rename = "PieceOfLaunch")]
    pub piece_of_launch: String,
    #[serde(rename = "EpochYear")]
    pub epoch_year: String,
    #[serde(rename = "EpochDay")]
    pub epoch_day: f64,
    #[serde(rename = "FirstDerivativeMeanMotion")]
    pub first_derivative_mean_motion: f64,
    /// Kept in the TLE's assumed-decimal-point notation, undecoded.
    #[serde(rename = "SecondDerivativeMeanMotion")]
    pub second_derivative_mean_motion: String,
    #[serde(rename = "BSTAR")]
    pub bstar: String,
    #[serde(rename = "SetNumber")]
    pub set_number: String,
    #[serde(rename = "Inclination")]
    pub inclination: f64,
    #[serde(rename = "RAAN")]
    pub raan: f64,
    #[serde(rename = "Eccentricity")]
    pub eccentricity: f64,
    #[serde(rename = "ArgumentOfPerigee")]
    pub argument_of_perigee: f64,
    #[serde(rename = "MeanAnomaly")]
    pub mean_anomaly: f64,
    #[serde(rename = "MeanMotion")]
    pub mean_motion: f64,
    #[serde(rename = "RevolutionNumber")]
    pub revolution_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TleBatch {
    pub week: u32,
    pub satellites: Vec<TleRecord>,
}

/// One satellite from a Yuma-style almanac file. All angles in radians.
/// Fields whose label line was absent (or drifted) stay `None`; the parser
/// never errors on a skipped field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlmanacRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Health", skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(rename = "Eccentricity", skip_serializing_if = "Option::is_none")]
    pub eccentricity: Option<f64>,
    #[serde(rename = "TimeOfApplicability", skip_serializing_if = "Option::is_none")]
    pub time_of_applicability: Option<f64>,
    #[serde(rename = "OrbitalInclination", skip_serializing_if = "Option::is_none")]
    pub orbital_inclination: Option<f64>,
    #[serde(rename = "RateOfRightAscen", skip_serializing_if = "Option::is_none")]
    pub rate_of_right_ascen: Option<f64>,
    #[serde(rename = "SQRT_A", skip_serializing_if = "Option::is_none")]
    pub sqrt_a: Option<f64>,
    #[serde(rename = "RightAscenAtWeek", skip_serializing_if = "Option::is_none")]
    pub right_ascen_at_week: Option<f64>,
    #[serde(rename = "ArgumentOfPerigee", skip_serializing_if = "Option::is_none")]
    pub argument_of_perigee: Option<f64>,
    #[serde(rename = "MeanAnom", skip_serializing_if = "Option::is_none")]
    pub mean_anom: Option<f64>,
    #[serde(rename = "Af0", skip_serializing_if = "Option::is_none")]
    pub af0: Option<f64>,
    #[serde(rename = "Af1", skip_serializing_if = "Option::is_none")]
    pub af1: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlmanacBatch {
    pub week: u32,
    pub satellites: Vec<AlmanacRecord>,
}

/// One row of the navcen constellation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeRow {
    pub prn: String,
    pub block_type: String,
}

/// Undecoded content for sources with no defined schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCapture {
    pub name: String,
    pub timestamp: String,
    pub url: String,
    pub content: String,
}

/// Failure captured at the ingestion-job boundary, written to the error
/// sink as its own JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    #[serde(rename = "name")]
    pub source_id: String,
    pub timestamp: String,
    pub error: String,
}

/// What one ingestion run produced. A batch was stored, or a failure was
/// recorded; never both.
#[derive(Debug, Clone)]
pub enum IngestionOutcome {
    Stored {
        source_id: String,
        filename: String,
        records: usize,
    },
    Failed(FailureEntry),
}
