use crate::constants::*;
use crate::hop_geometry::{elevation_angle, incidence_angle};
use crate::path_data::*;
use crate::solar_zenith::HourState;

/// E-layer critical frequency (MHz) for a sun zenith angle (rad).
/// Never less than 0.005 ssn, even at night.
pub fn e_layer_critical_frequency(zenith: f64, ssn: f64) -> f64 {
    let cos_zenith = f64::cos(zenith);
    let fc_e = if cos_zenith > 0.0 {
        0.9 * f64::powf((180.0 + 1.44 * ssn) * cos_zenith, 0.25)
    } else {
        0.0
    };
    f64::max(fc_e, 0.005 * ssn)
}

/// Absorption coefficient of one reflection zone. The Sun stops counting
/// once it is 10.8 degrees below the horizon.
pub fn absorption_coefficient(zenith: f64, ssn: f64) -> f64 {
    let zenith = f64::min(zenith, ABSORPTION_CUTOFF_ZENITH);
    let x = f64::max(f64::cos(90.0 / 100.8 * zenith), 0.0);
    f64::max((1.0 + 0.0037 * ssn) * f64::powf(x, 1.3), 0.1)
}

/// Determines the reflection zones of a path made of hops hops and returns the
/// maximum E-layer MUF, the F-layer MUF, the total absorption and the day/night
/// flags.
///
/// The F-layer MUF follows from the path-wide F critical frequency fc_f and the
/// secant law, so it depends only on the F-layer angle of incidence. Running
/// MINIMUF hop by hop gives much worse answers. Both incidence angles use the
/// mean layer heights, not the hour's reflection height.
pub fn ionospheric_state(hops: usize, distance: f64, fc_f: f64, hour: &HourState) -> IonosphericState {
    debug_assert!(hops > 0, "a path has at least one hop");

    let half_hop = distance / (hops as f64 * 2.0);
    let elevation = elevation_angle(half_hop, HF);
    let phi_e = incidence_angle(elevation, HE);
    let phi_f = incidence_angle(elevation, HF);

    let mut state = IonosphericState {
        muf_e: 0.0,
        muf_f: fc_f / f64::cos(phi_f),
        absorption: 0.0,
        flags: PathFlags::empty(),
    };

    // One reflection zone in the middle of each hop
    let mut dist = half_hop;
    while dist < distance {
        let psi = hour.solar_zenith(dist);

        let muf_e = e_layer_critical_frequency(psi, hour.ssn) / f64::cos(phi_e);
        if muf_e > state.muf_e {
            state.muf_e = muf_e;
        }

        // Some hops of a path can be in daylight while others are dark
        if psi > ABSORPTION_CUTOFF_ZENITH {
            state.flags.insert(PathFlags::NIGHT);
        } else {
            state.flags.insert(PathFlags::DAY);
        }
        state.absorption += absorption_coefficient(psi, hour.ssn);

        dist += half_hop * 2.0;
    }

    state
}
