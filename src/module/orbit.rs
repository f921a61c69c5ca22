//! Almanac orbit propagation: Kepler solve, rotation into ECEF, and the
//! closed-form WGS-84 geodetic conversion. Pure math, no I/O; this runs
//! downstream of the pipeline on previously captured records.

use std::f64::consts::TAU;

use crate::error::ConvergenceError;
use crate::model::record::{AlmanacBatch, AlmanacRecord};

/// WGS-84 gravitational parameter (m^3/s^2).
const MU: f64 = 3.986005e14;
/// Earth rotation rate (rad/s).
const OMEGA_DOT_E: f64 = 7.2921151467e-5;
/// Fixed projection past the almanac's time of applicability (s).
const PROJECTION_SECONDS: f64 = 3600.0;

const KEPLER_TOLERANCE: f64 = 1e-10;
const KEPLER_MAX_ITERATIONS: u32 = 100;

/// The element set required for propagation. Angles in radians.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    pub sqrt_a: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub rate_of_right_ascen: f64,
    pub right_ascen_at_week: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    pub time_of_applicability: f64,
}

impl OrbitalElements {
    /// Extracts a complete element set from a parsed record; `None` when a
    /// required field was absent from the source text.
    pub fn from_record(record: &AlmanacRecord) -> Option<Self> {
        Some(Self {
            sqrt_a: record.sqrt_a?,
            eccentricity: record.eccentricity?,
            inclination: record.orbital_inclination?,
            rate_of_right_ascen: record.rate_of_right_ascen?,
            right_ascen_at_week: record.right_ascen_at_week?,
            argument_of_perigee: record.argument_of_perigee?,
            mean_anomaly: record.mean_anom?,
            time_of_applicability: record.time_of_applicability?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EcefPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GeodeticPosition {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SatellitePosition {
    pub ecef: EcefPosition,
    pub geodetic: GeodeticPosition,
}

fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Newton iteration on Kepler's equation `E - e·sin(E) = M`, seeded with
/// `E = M`. Eccentricities outside [0, 1) are rejected up front: the
/// iteration is not guaranteed to terminate there and such values never
/// occur in valid almanac data.
pub fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> Result<f64, ConvergenceError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(ConvergenceError {
            eccentricity,
            mean_anomaly,
            iterations: 0,
        });
    }

    let mut e_k = mean_anomaly;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta =
            (e_k - eccentricity * e_k.sin() - mean_anomaly) / (1.0 - eccentricity * e_k.cos());
        e_k -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Ok(e_k);
        }
    }

    Err(ConvergenceError {
        eccentricity,
        mean_anomaly,
        iterations: KEPLER_MAX_ITERATIONS,
    })
}

/// True anomaly from the eccentric anomaly. The shared `1 - e·cos(E)`
/// denominator cancels inside the two-argument arctangent.
fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let sin_v = (1.0 - eccentricity * eccentricity).sqrt() * eccentric_anomaly.sin();
    let cos_v = eccentric_anomaly.cos() - eccentricity;
    sin_v.atan2(cos_v)
}

/// Position 3600 s past the time of applicability. The almanac supplies no
/// mean-motion correction term, so `n` is the computed mean motion alone.
pub fn propagate(elements: &OrbitalElements) -> Result<SatellitePosition, ConvergenceError> {
    let a = elements.sqrt_a * elements.sqrt_a;
    let n = (MU / (a * a * a)).sqrt();
    let delta_t = PROJECTION_SECONDS;

    let mean_anomaly = normalize_angle(elements.mean_anomaly + n * delta_t);
    let e_k = eccentric_anomaly(mean_anomaly, elements.eccentricity)?;
    let v = true_anomaly(e_k, elements.eccentricity);

    let u = normalize_angle(v + elements.argument_of_perigee);
    let r = a * (1.0 - elements.eccentricity * e_k.cos());
    let omega = normalize_angle(
        elements.right_ascen_at_week + (elements.rate_of_right_ascen - OMEGA_DOT_E) * delta_t,
    );

    let (sin_u, cos_u) = u.sin_cos();
    let (sin_i, cos_i) = elements.inclination.sin_cos();
    let (sin_omega, cos_omega) = omega.sin_cos();

    let ecef = EcefPosition {
        x: r * (cos_u * cos_omega - sin_u * sin_omega * cos_i),
        y: r * (cos_u * sin_omega + sin_u * cos_omega * cos_i),
        z: r * sin_u * sin_i,
    };

    Ok(SatellitePosition {
        geodetic: ecef_to_geodetic(&ecef),
        ecef,
    })
}

/// ECEF to geodetic longitude/latitude/altitude on the WGS-84 ellipsoid.
///
/// Closed-form, non-iterative latitude/altitude: numerically approximate,
/// and kept that way on purpose — downstream consumers calibrate against
/// this exact form.
pub fn ecef_to_geodetic(position: &EcefPosition) -> GeodeticPosition {
    /// WGS-84 semi-major axis (m).
    const A: f64 = 6378137.0;
    /// WGS-84 flattening.
    const F: f64 = 1.0 / 298.257223563;
    let e2 = F * (2.0 - F);

    let longitude = position.y.atan2(position.x);

    let p = (position.x * position.x + position.y * position.y).sqrt();
    let theta = (position.z * A).atan2(p * (1.0 - F) * A);
    let (sin_theta, cos_theta) = theta.sin_cos();

    let latitude = (position.z + e2 * (1.0 - F) * A * sin_theta.powi(3))
        .atan2(p - e2 * A * cos_theta.powi(3));

    let n = A / (1.0 - e2 * latitude.sin() * latitude.sin()).sqrt();
    let altitude = p / latitude.cos() - n;

    GeodeticPosition {
        longitude_deg: longitude.to_degrees(),
        latitude_deg: latitude.to_degrees(),
        altitude_m: altitude,
    }
}

/// Propagates every record in a batch. A record with incomplete elements
/// is skipped with a warning; a non-convergent record yields its error in
/// place without aborting the rest of the batch.
pub fn propagate_batch(
    batch: &AlmanacBatch,
) -> Vec<(String, Result<SatellitePosition, ConvergenceError>)> {
    let mut results = Vec::new();
    for record in &batch.satellites {
        let Some(elements) = OrbitalElements::from_record(record) else {
            tracing::warn!("Satellite {} is missing almanac fields, skipping", record.id);
            continue;
        };
        results.push((record.id.clone(), propagate(&elements)));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Circular (e = 0) equatorial (i = 0) orbit at roughly GPS altitude.
    fn circular_equatorial() -> OrbitalElements {
        OrbitalElements {
            sqrt_a: 5153.7,
            eccentricity: 0.0,
            inclination: 0.0,
            rate_of_right_ascen: 0.0,
            right_ascen_at_week: 0.0,
            argument_of_perigee: 0.0,
            mean_anomaly: 0.0,
            time_of_applicability: 0.0,
        }
    }

    #[test]
    fn test_kepler_circular_orbit_is_identity() {
        // With e = 0 the first correction is already zero.
        let m = 2.345;
        let e_k = eccentric_anomaly(m, 0.0).unwrap();
        assert_eq!(e_k, m);
    }

    #[test]
    fn test_kepler_converges_for_small_eccentricity() {
        let m = 1.0;
        let e = 0.01;
        let e_k = eccentric_anomaly(m, e).unwrap();
        let residual = (e_k - e * e_k.sin() - m).abs();
        assert!(residual < 1e-10, "residual {residual}");
    }

    #[test]
    fn test_kepler_rejects_degenerate_eccentricity() {
        assert!(eccentric_anomaly(1.0, 1.0).is_err());
        assert!(eccentric_anomaly(1.0, 1.5).is_err());
        assert!(eccentric_anomaly(1.0, -0.1).is_err());
    }

    #[test]
    fn test_kepler_matches_across_typical_range() {
        for &e in &[0.001, 0.005, 0.02, 0.05] {
            for step in 0..8 {
                let m = step as f64 * 0.7;
                let e_k = eccentric_anomaly(m.rem_euclid(TAU), e).unwrap();
                let residual = (e_k - e * e_k.sin() - m.rem_euclid(TAU)).abs();
                assert!(residual < 1e-10);
            }
        }
    }

    #[test]
    fn test_circular_equatorial_orbit_stays_in_equatorial_plane() {
        let position = propagate(&circular_equatorial()).unwrap();
        assert!(position.ecef.z.abs() < 1e-6, "z = {}", position.ecef.z);
    }

    #[test]
    fn test_circular_orbit_radius_equals_semi_major_axis() {
        let elements = circular_equatorial();
        let a = elements.sqrt_a * elements.sqrt_a;
        let position = propagate(&elements).unwrap();
        let r = (position.ecef.x.powi(2) + position.ecef.y.powi(2) + position.ecef.z.powi(2))
            .sqrt();
        assert!((r - a).abs() < 1e-6, "r = {r}, a = {a}");
    }

    #[test]
    fn test_propagate_rejects_degenerate_record() {
        let mut elements = circular_equatorial();
        elements.eccentricity = 1.2;
        assert!(propagate(&elements).is_err());
    }

    #[test]
    fn test_geodetic_equatorial_point() {
        // A point on the equatorial x-axis, 1000 km above the ellipsoid.
        let position = EcefPosition {
            x: 6378137.0 + 1_000_000.0,
            y: 0.0,
            z: 0.0,
        };
        let geodetic = ecef_to_geodetic(&position);
        assert!(geodetic.longitude_deg.abs() < 1e-9);
        assert!(geodetic.latitude_deg.abs() < 1e-9);
        assert!((geodetic.altitude_m - 1_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_geodetic_longitude_quadrants() {
        let east = ecef_to_geodetic(&EcefPosition {
            x: 0.0,
            y: 7_000_000.0,
            z: 0.0,
        });
        assert!((east.longitude_deg - 90.0).abs() < 1e-9);

        let west = ecef_to_geodetic(&EcefPosition {
            x: 0.0,
            y: -7_000_000.0,
            z: 0.0,
        });
        assert!((west.longitude_deg + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_batch_isolates_non_convergent_records() {
        let good = AlmanacRecord {
            id: "01".to_string(),
            eccentricity: Some(0.0052),
            time_of_applicability: Some(147456.0),
            orbital_inclination: Some(0.9615),
            rate_of_right_ascen: Some(-7.78e-9),
            sqrt_a: Some(5153.62),
            right_ascen_at_week: Some(1.187),
            argument_of_perigee: Some(-1.457),
            mean_anom: Some(1.211),
            ..Default::default()
        };
        let mut degenerate = good.clone();
        degenerate.id = "02".to_string();
        degenerate.eccentricity = Some(1.5);
        let mut incomplete = good.clone();
        incomplete.id = "03".to_string();
        incomplete.sqrt_a = None;

        let batch = AlmanacBatch {
            week: 291,
            satellites: vec![degenerate, good, incomplete],
        };

        let results = propagate_batch(&batch);
        // The incomplete record is skipped, the degenerate one errors, and
        // the good one still produces a position.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "02");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, "01");
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn test_gps_altitude_plausible() {
        let good = OrbitalElements {
            sqrt_a: 5153.62,
            eccentricity: 0.0052,
            inclination: 0.9615,
            rate_of_right_ascen: -7.78e-9,
            right_ascen_at_week: 1.187,
            argument_of_perigee: -1.457,
            mean_anomaly: 1.211,
            time_of_applicability: 147456.0,
        };
        let position = propagate(&good).unwrap();
        // GPS orbits sit near 20 200 km; allow generous slack for
        // eccentricity and the approximate geodetic conversion.
        assert!(position.geodetic.altitude_m > 19_000_000.0);
        assert!(position.geodetic.altitude_m < 21_500_000.0);
        assert!(position.geodetic.latitude_deg.abs() <= 56.0);
    }
}
