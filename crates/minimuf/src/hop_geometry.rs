use crate::constants::*;
use crate::error::{PredictionError, Result};
use crate::path_data::HopGeometry;
use crate::solar_zenith::HourState;
use log::{debug, trace};
use serde::Serialize;

/// Elevation angle (rad) of a ray reflected at height (km) over a hop whose
/// half ground angle is half_hop (rad).
pub fn elevation_angle(half_hop: f64, height: f64) -> f64 {
    f64::atan((f64::cos(half_hop) - R0 / (R0 + height)) / f64::sin(half_hop))
}

/// Angle of incidence (rad) at height (km) for a ray leaving the ground at
/// the given elevation angle (rad).
pub fn incidence_angle(elevation: f64, height: f64) -> f64 {
    let x = R0 * f64::cos(elevation) / (R0 + height);
    f64::atan(x / f64::sqrt(1.0 - x * x))
}

/// Nominal geometry of the minimum-hop path at the mean F-layer height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimumHop {
    pub hops: usize,
    pub half_hop: f64,    // rad
    pub elevation: f64,   // rad
    pub f_incidence: f64, // rad
    pub delay_ms: f64,
}

/// Finds the fewest hops whose takeoff angle at the mean F-layer height is at
/// least min_elevation (rad) and not below the horizon.
///
/// The search starts from the hop count that puts every hop at the horizon
/// and stops with [`PredictionError::HopSearchDiverged`] once the candidate
/// paths would need more than [`MAX_HOPS`] hops.
pub fn minimum_hops(distance: f64, min_elevation: f64) -> Result<MinimumHop> {
    if !min_elevation.is_finite() || !distance.is_finite() || distance < 0.0 {
        return Err(PredictionError::InvalidInput(format!(
            "hop search needs a finite path angle and elevation, got {distance} rad and {min_elevation} rad"
        )));
    }

    let horizon_hop = 2.0 * f64::acos(R0 / (R0 + HF));
    let mut hops = (distance / horizon_hop) as usize;

    // At least one step, so the returned elevation belongs to the returned
    // hop count even when min_elevation is at or below the horizon
    let (half_hop, elevation) = loop {
        hops += 1;
        if hops + CANDIDATE_HOPS - 1 > MAX_HOPS {
            return Err(PredictionError::HopSearchDiverged {
                min_elevation: min_elevation * R2D,
                max_hops: MAX_HOPS,
            });
        }
        let half_hop = distance / (hops as f64 * 2.0);
        let elevation = elevation_angle(half_hop, HF);
        if elevation >= min_elevation && elevation >= 0.0 {
            break (half_hop, elevation);
        }
    };

    let f_incidence = incidence_angle(elevation, HF);
    let delay_ms =
        2.0 * hops as f64 * f64::sin(half_hop) * (R0 + HF) / f64::cos(elevation) / VOF_L * 1e6;

    debug!(
        "minimum {} hops, takeoff {:.1} deg, delay {:.1} ms",
        hops,
        elevation * R2D,
        delay_ms
    );

    Ok(MinimumHop {
        hops,
        half_hop,
        elevation,
        f_incidence,
        delay_ms,
    })
}

/// F-layer reflection height (km) for the hour: raised when the middle of
/// the path is dark, lowered when it is lit.
pub fn reflection_height(hour: &HourState) -> f64 {
    if hour.is_midpoint_night() {
        HF + HF_NIGHT_RISE
    } else {
        HF - HF_DAY_DROP
    }
}

/// Geometry of the minimum-hop path and the next two higher-hop paths for
/// the hour.
pub fn candidate_hops(distance: f64, min_hops: usize, hour: &HourState) -> Vec<HopGeometry> {
    let height = reflection_height(hour);

    (min_hops..min_hops + CANDIDATE_HOPS)
        .map(|hops| {
            let half_hop = distance / (hops as f64 * 2.0);
            let elevation = elevation_angle(half_hop, height);
            let path_length =
                2.0 * hops as f64 * f64::sin(half_hop) * (R0 + height) / f64::cos(elevation);

            trace!(
                "{} hops at {:.0} km: takeoff {:.1} deg, slant path {:.0} km",
                hops,
                height,
                elevation * R2D,
                path_length
            );

            HopGeometry {
                hops,
                half_hop,
                height,
                elevation,
                path_length,
                e_incidence: incidence_angle(elevation, HE),
                f_incidence: incidence_angle(elevation, height),
            }
        })
        .collect()
}

/// Minimum-hop search followed by the hour's candidate geometry.
///
/// One-shot form of what [`Circuit`](crate::prediction::Circuit) does in two
/// steps: it runs the search once in `Circuit::new` and reuses the hop count
/// for every [`candidate_hops`] call in `predict_hour`.
pub fn hop_geometry(distance: f64, min_elevation: f64, hour: &HourState) -> Result<Vec<HopGeometry>> {
    let min_hop = minimum_hops(distance, min_elevation)?;
    Ok(candidate_hops(distance, min_hop.hops, hour))
}
