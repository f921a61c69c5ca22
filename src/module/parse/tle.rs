//! NORAD two-line element parser. Fixed-column slicing; the column map
//! follows the published 69-character layout.

use crate::error::ParseError;
use crate::model::record::{TleBatch, TleRecord};

/// Parses TLE text three lines at a time (name, line 1, line 2).
///
/// A triplet is accepted only when line 1 starts with `'1'` and line 2
/// starts with `'2'`; anything else, including a truncated trailing
/// triplet, is dropped without error.
pub fn parse_tle(content: &str, week: u32) -> Result<TleBatch, ParseError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut satellites = Vec::new();

    for triplet in lines.chunks(3) {
        if triplet.len() < 3 {
            break;
        }
        let name = triplet[0].trim();
        let line1 = triplet[1].trim();
        let line2 = triplet[2].trim();

        if !(line1.starts_with('1') && line2.starts_with('2')) {
            continue;
        }
        satellites.push(decode_triplet(name, line1, line2)?);
    }

    Ok(TleBatch { week, satellites })
}

fn decode_triplet(name: &str, line1: &str, line2: &str) -> Result<TleRecord, ParseError> {
    // The eccentricity column carries a 7-digit mantissa with an assumed
    // leading decimal point, so 1234567 reads as 0.1234567.
    let eccentricity = numeric("Eccentricity", &format!("0.{}", col(line2, 26..33)))?;

    Ok(TleRecord {
        name: name.to_string(),
        line1: line1.to_string(),
        line2: line2.to_string(),
        satellite_number: col(line1, 2..7).to_string(),
        classification: col(line1, 7..8).to_string(),
        launch_year: col(line1, 9..11).to_string(),
        launch_number: col(line1, 11..14).to_string(),
        piece_of_launch: col(line1, 14..17).to_string(),
        epoch_year: col(line1, 18..20).to_string(),
        epoch_day: numeric("EpochDay", col(line1, 20..32))?,
        first_derivative_mean_motion: numeric("FirstDerivativeMeanMotion", col(line1, 33..43))?,
        second_derivative_mean_motion: col(line1, 44..52).to_string(),
        bstar: col(line1, 53..61).to_string(),
        set_number: col(line1, 64..68).to_string(),
        inclination: numeric("Inclination", col(line2, 8..16))?,
        raan: numeric("RAAN", col(line2, 17..25))?,
        eccentricity,
        argument_of_perigee: numeric("ArgumentOfPerigee", col(line2, 34..42))?,
        mean_anomaly: numeric("MeanAnomaly", col(line2, 43..51))?,
        mean_motion: numeric("MeanMotion", col(line2, 52..63))?,
        revolution_number: col(line2, 63..68).to_string(),
    })
}

fn col(line: &str, range: std::ops::Range<usize>) -> &str {
    line.get(range).unwrap_or("").trim()
}

fn numeric(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    raw.parse().map_err(|_| ParseError::Numeric {
        field,
        value: raw.to_string(),
    })
}
