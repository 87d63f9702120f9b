use crate::antenna_gain::{antenna_gain, AntennaGainTable};
use crate::constants::*;
use crate::path_data::*;
use log::trace;
use receiver_noise::Receiver;
use serde::{Deserialize, Serialize};

/// Fixed losses and the receiving end of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBudget {
    pub ground_loss: f64,      // Per ground reflection (dB)
    pub system_loss: f64,      // Excess system loss (dB)
    pub multipath_margin: f64, // dB
    pub receiver: Receiver,
}

impl Default for LinkBudget {
    fn default() -> Self {
        LinkBudget {
            ground_loss: GLOSS,
            system_loss: SLOSS,
            multipath_margin: MPATH,
            receiver: Receiver::default(),
        }
    }
}

/// The candidate paths at one working frequency and the one chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEvaluation {
    pub frequency: f64, // MHz
    /// One entry per candidate hop count, `None` when the frequency is too
    /// close to that path's F-layer MUF.
    pub candidates: Vec<Option<SignalBudget>>,
    /// Index into `candidates` of the chosen path.
    pub best: Option<usize>,
}

impl PathEvaluation {
    pub fn best_budget(&self) -> Option<&SignalBudget> {
        self.best.and_then(|i| self.candidates[i].as_ref())
    }

    pub fn best_hops(&self) -> Option<usize> {
        self.best_budget().map(|b| b.hops)
    }

    pub fn received_power(&self) -> Option<f64> {
        self.best_budget().map(|b| b.received_power)
    }
}

/// Ionospheric loss (dB) of a path with the given total absorption, for a
/// ray crossing the E layer at e_incidence (rad).
pub fn ionospheric_loss(absorption: f64, e_incidence: f64, frequency: f64) -> f64 {
    677.2 * absorption / f64::cos(e_incidence) / (f64::powf(frequency + GAMMA, 1.98) + 10.2)
}

/// Free-space loss (dB) over a slant path (km) at frequency (MHz).
pub fn free_space_loss(path_length: f64, frequency: f64) -> f64 {
    32.44 + 20.0 * f64::log10(path_length * frequency)
}

/// Link budget of one hop count, or `None` when the frequency is not below
/// [`FOT_FRACTION`] of its F-layer MUF.
pub fn signal_budget(
    hop: &HopState,
    frequency: f64,
    tx_power_dbw: f64,
    link: &LinkBudget,
    antenna: Option<&AntennaGainTable>,
) -> Option<SignalBudget> {
    let geometry = &hop.geometry;
    let ionosphere = &hop.ionosphere;
    if frequency >= FOT_FRACTION * ionosphere.muf_f {
        return None;
    }

    let tx_power = tx_power_dbw + 30.0;
    let antenna_gain = antenna_gain(antenna, frequency, geometry.elevation);
    let free_space_loss = free_space_loss(geometry.path_length, frequency) + link.system_loss;
    let ionospheric_loss = ionospheric_loss(ionosphere.absorption, geometry.e_incidence, frequency);
    let ground_loss = (geometry.hops as f64 - 1.0) * link.ground_loss;
    let received_power = tx_power + antenna_gain - free_space_loss - ionospheric_loss - ground_loss;

    let mut flags = ionosphere.flags;
    flags.remove(PathFlags::E_CUTOFF | PathFlags::WEAK | PathFlags::MULTIPATH);
    if !link.receiver.is_above_sensitivity(received_power) {
        flags.insert(PathFlags::WEAK);
    }

    // Below the E-layer MUF only as a last resort
    let mut effective_power = received_power;
    if frequency < ionosphere.muf_e {
        flags.insert(PathFlags::E_CUTOFF);
        effective_power -= link.multipath_margin;
    }

    Some(SignalBudget {
        hops: geometry.hops,
        frequency,
        tx_power,
        antenna_gain,
        free_space_loss,
        ionospheric_loss,
        ground_loss,
        received_power,
        effective_power,
        flags,
    })
}

/// RMS sum (dBm) of the received powers of a set of paths.
pub fn rms_power_sum<I>(levels: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let sum: f64 = levels
        .into_iter()
        .map(|db| f64::exp(2.0 / 10.0 * db * LN10))
        .sum();
    10.0 / 2.0 * f64::log10(sum)
}

/// Evaluates the candidate paths at one frequency and picks the one with the
/// highest effective power above the noise floor (dBm). The chosen path is
/// flagged as multipath when it is not at least the multipath margin above
/// the RMS sum of the other usable paths.
pub fn evaluate_path(
    hops: &[HopState],
    frequency: f64,
    tx_power_dbw: f64,
    link: &LinkBudget,
    antenna: Option<&AntennaGainTable>,
    noise_floor: f64,
) -> PathEvaluation {
    let mut candidates: Vec<Option<SignalBudget>> = hops
        .iter()
        .map(|hop| signal_budget(hop, frequency, tx_power_dbw, link, antenna))
        .collect();

    let mut level = noise_floor;
    let mut best = None;
    for (i, budget) in candidates.iter().enumerate() {
        if let Some(budget) = budget {
            if budget.effective_power > level {
                level = budget.effective_power;
                best = Some(i);
            }
        }
    }

    if let Some(i) = best {
        let others = rms_power_sum(
            candidates
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter_map(|(_, budget)| budget.map(|b| b.received_power)),
        );
        if let Some(chosen) = candidates[i].as_mut() {
            if chosen.received_power < others + link.multipath_margin {
                chosen.flags.insert(PathFlags::MULTIPATH);
            }
            trace!(
                "{:.2} MHz: {} hops at {:.1} dBm, flags {:#04x}",
                frequency,
                chosen.hops,
                chosen.received_power,
                chosen.flags.bits()
            );
        }
    } else {
        trace!("{:.2} MHz: no usable path", frequency);
    }

    PathEvaluation {
        frequency,
        candidates,
        best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const NOISE: f64 = -139.9958720391;

    fn hop(hops: usize, path_length: f64, elevation: f64, muf_e: f64, muf_f: f64, absorption: f64) -> HopState {
        HopState {
            geometry: HopGeometry {
                hops,
                half_hop: 0.0,
                height: HF,
                elevation,
                path_length,
                e_incidence: crate::hop_geometry::incidence_angle(elevation, HE),
                f_incidence: crate::hop_geometry::incidence_angle(elevation, HF),
            },
            ionosphere: IonosphericState {
                muf_e,
                muf_f,
                absorption,
                flags: PathFlags::DAY,
            },
        }
    }

    /// Newark to Ft. Collins at 18 UTC on 1 January, flux 194.
    fn ft_collins_daylight() -> Vec<HopState> {
        vec![
            hop(2, 2784.1956068781, 0.380618602228, 7.437774443450, 30.541321282182, 1.393438269552),
            hop(3, 3071.8962059351, 0.569412117780, 5.480917410177, 23.942310418548, 2.088564639685),
            hop(4, 3433.9957665130, 0.717212962067, 4.632156083841, 20.704929399215, 2.784010472034),
        ]
    }

    #[test]
    fn losses() {
        assert_abs_diff_eq!(free_space_loss(1000.0, 10.0), 32.44 + 80.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            ionospheric_loss(1.0, 0.0, 10.0),
            677.2 / (f64::powf(11.42, 1.98) + 10.2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rms_sum_of_equal_paths() {
        assert_abs_diff_eq!(rms_power_sum([-100.0]), -100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(rms_power_sum([-100.0, -100.0]), -100.0 + 5.0 * f64::log10(2.0), epsilon = 1e-4);
        assert_eq!(rms_power_sum(std::iter::empty()), f64::NEG_INFINITY);
    }

    #[test]
    fn too_close_to_the_muf() {
        let hops = ft_collins_daylight();
        let link = LinkBudget::default();
        assert!(signal_budget(&hops[2], 0.85 * 20.704929399215, 20.0, &link, None).is_none());
        let eval = evaluate_path(&hops, 20.0, 20.0, &link, None, NOISE);
        assert!(eval.candidates[0].is_some());
        assert!(eval.candidates[2].is_none());
    }

    #[test]
    fn daylight_received_power() {
        let hops = ft_collins_daylight();
        let link = LinkBudget::default();
        let cases = [
            (5.0, [Some(-124.5746655884), Some(-132.6943977719), Some(-142.3731798338)]),
            (10.0, [Some(-101.5118290434), Some(-106.9498752818), Some(-113.0383298422)]),
            (15.0, [Some(-96.5643437345), Some(-101.2214633124), Some(-106.2643881118)]),
            (20.0, [Some(-95.5815940410), Some(-99.9176939509), None]),
        ];
        for (freq, expected) in cases {
            let eval = evaluate_path(&hops, freq, 20.0, &link, None, NOISE);
            for (candidate, expected) in eval.candidates.iter().zip(expected) {
                match (candidate, expected) {
                    (Some(budget), Some(db)) => assert_abs_diff_eq!(budget.received_power, db, epsilon = 1e-6),
                    (None, None) => {}
                    _ => panic!("{freq} MHz: got {candidate:?}, expected {expected:?}"),
                }
            }
            assert_eq!(eval.best_hops(), Some(2));
        }
    }

    #[test]
    fn daylight_picks_two_hops() {
        let hops = ft_collins_daylight();
        let link = LinkBudget::default();

        let eval = evaluate_path(&hops, 10.0, 20.0, &link, None, NOISE);
        assert_eq!(eval.best, Some(0));
        assert_eq!(eval.best_hops(), Some(2));
        let best = eval.best_budget().unwrap();
        assert_abs_diff_eq!(best.tx_power, 50.0);
        assert_eq!(best.ground_loss, 3.0);
        assert_eq!(best.antenna_gain, 0.0);
        assert_eq!(best.flags, PathFlags::DAY);
        assert_abs_diff_eq!(best.received_power, best.effective_power);
        assert_eq!(eval.candidates[2].unwrap().ground_loss, 3.0 * GLOSS);
    }

    #[test]
    fn weak_e_cutoff_path_still_wins() {
        let hops = ft_collins_daylight();
        let eval = evaluate_path(&hops, 5.0, 20.0, &LinkBudget::default(), None, NOISE);
        let best = eval.best_budget().unwrap();
        assert_eq!(best.hops, 2);
        assert!(best.flags.contains(PathFlags::WEAK | PathFlags::E_CUTOFF));
        assert_abs_diff_eq!(best.effective_power, best.received_power - MPATH);
        assert_eq!(best.flags.quality_code(), 's');
    }

    #[test]
    fn nothing_above_the_noise() {
        let hops = ft_collins_daylight();
        let eval = evaluate_path(&hops, 2.5, 20.0, &LinkBudget::default(), None, NOISE);
        assert!(eval.candidates.iter().all(|c| c.is_some()));
        assert_eq!(eval.best, None);
        assert_eq!(eval.received_power(), None);
    }

    #[test]
    fn close_competitor_means_multipath() {
        let link = LinkBudget::default();
        // Two equally strong paths
        let a = hop(2, 3000.0, 0.4, 1.0, 30.0, 0.2);
        let b = a;

        let eval = evaluate_path(&[a, b], 10.0, 20.0, &link, None, NOISE);
        assert_eq!(eval.best, Some(0));
        assert!(eval.best_budget().unwrap().flags.contains(PathFlags::MULTIPATH));
        assert!(!eval.candidates[1].unwrap().flags.contains(PathFlags::MULTIPATH));

        // A lone usable path has no competitors
        let eval = evaluate_path(&[a], 10.0, 20.0, &link, None, NOISE);
        assert!(!eval.best_budget().unwrap().flags.contains(PathFlags::MULTIPATH));
    }

    #[test]
    fn antenna_gain_adds_to_the_budget() {
        let hops = ft_collins_daylight();
        let link = LinkBudget::default();
        let table = AntennaGainTable::uniform(vec![5.0, 20.0], 6.0).unwrap();

        let bare = evaluate_path(&hops, 15.0, 20.0, &link, None, NOISE);
        let gain = evaluate_path(&hops, 15.0, 20.0, &link, Some(&table), NOISE);
        assert_abs_diff_eq!(
            gain.received_power().unwrap(),
            bare.received_power().unwrap() + 6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn ties_go_to_fewer_hops() {
        let a = hop(2, 3000.0, 0.4, 1.0, 30.0, 0.2);
        let eval = evaluate_path(&[a, a, a], 10.0, 20.0, &LinkBudget::default(), None, NOISE);
        assert_eq!(eval.best, Some(0));
    }
}
