//! Yuma-style almanac text parser.
//!
//! Line-oriented state machine: an `ID:` line opens a new record and
//! flushes the previous one; field lines are matched by exact label
//! substring, units annotation included. The label text is deliberately
//! held constant per format — a drifted label (say, a missing `(rad)`
//! suffix) skips the field rather than erroring.

use crate::error::ParseError;
use crate::model::record::{AlmanacBatch, AlmanacRecord};

pub fn parse_almanac(content: &str, week: u32) -> Result<AlmanacBatch, ParseError> {
    let mut satellites = Vec::new();
    let mut current: Option<AlmanacRecord> = None;

    for line in content.lines() {
        if line.starts_with("ID:") {
            if let Some(done) = current.take() {
                satellites.push(done);
            }
            current = Some(AlmanacRecord {
                id: value_text(line)?.to_string(),
                ..Default::default()
            });
            continue;
        }

        // Field lines outside any record (header text before the first ID
        // marker) are ignored.
        let Some(record) = current.as_mut() else {
            continue;
        };

        if line.contains("Health") {
            record.health = Some(value_text(line)?.to_string());
        } else if line.contains("Eccentricity") {
            record.eccentricity = Some(value_f64("Eccentricity", line)?);
        } else if line.contains("Time of Applicability(s)") {
            record.time_of_applicability = Some(value_f64("TimeOfApplicability", line)?);
        } else if line.contains("Orbital Inclination(rad)") {
            record.orbital_inclination = Some(value_f64("OrbitalInclination", line)?);
        } else if line.contains("Rate of Right Ascen(r/s)") {
            record.rate_of_right_ascen = Some(value_f64("RateOfRightAscen", line)?);
        } else if line.contains("SQRT(A)") {
            record.sqrt_a = Some(value_f64("SQRT_A", line)?);
        } else if line.contains("Right Ascen at Week(rad)") {
            record.right_ascen_at_week = Some(value_f64("RightAscenAtWeek", line)?);
        } else if line.contains("Argument of Perigee(rad)") {
            record.argument_of_perigee = Some(value_f64("ArgumentOfPerigee", line)?);
        } else if line.contains("Mean Anom(rad)") {
            record.mean_anom = Some(value_f64("MeanAnom", line)?);
        } else if line.contains("Af0(s)") {
            record.af0 = Some(value_f64("Af0", line)?);
        } else if line.contains("Af1(s/s)") {
            record.af1 = Some(value_f64("Af1", line)?);
        }
    }

    if let Some(done) = current.take() {
        satellites.push(done);
    }

    Ok(AlmanacBatch { week, satellites })
}

/// Text after the first `:` on a labelled line.
fn value_text(line: &str) -> Result<&str, ParseError> {
    line.split(':')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| ParseError::MalformedRow(line.to_string()))
}

fn value_f64(field: &'static str, line: &str) -> Result<f64, ParseError> {
    let raw = value_text(line)?;
    raw.parse().map_err(|_| ParseError::Numeric {
        field,
        value: raw.to_string(),
    })
}
