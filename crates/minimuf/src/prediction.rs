use crate::antenna_gain::AntennaGainTable;
use crate::constants::*;
use crate::error::{PredictionError, Result};
use crate::geometry::local_time;
use crate::hop_geometry::{candidate_hops, minimum_hops, MinimumHop};
use crate::ionospheric_layers::ionospheric_state;
use crate::muf_basic::minimuf;
use crate::path_data::*;
use crate::receiver_power::{evaluate_path, LinkBudget, PathEvaluation};
use crate::solar_zenith::HourState;
use crate::sunspot_number::spots;
use log::debug;
use receiver_noise::{Receiver, STANDARD_NOISE_FLOOR_DBM};
use serde::{Deserialize, Serialize};

/// Everything about a circuit except the two end points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    pub month: f64,            // 1 to 12
    pub day: f64,              // 1 to 31
    pub flux: f64,             // 10 cm solar flux
    pub tx_power_dbw: f64,     // Transmitter output power (dBW)
    pub frequencies: Vec<f64>, // Working frequencies (MHz)
    pub min_elevation: f64,    // Lowest usable takeoff angle (degrees)
    pub path: ShortOrLongPathSwitch,
    pub link: LinkBudget,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig {
            month: 1.0,
            day: 1.0,
            flux: 150.0,
            tx_power_dbw: 20.0,
            frequencies: DEFAULT_FREQUENCIES.to_vec(),
            min_elevation: MIN_ELE_ANGLE,
            path: ShortOrLongPathSwitch::Short,
            link: LinkBudget::default(),
        }
    }
}

impl CircuitConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.month.is_finite() && (1.0..=12.0).contains(&self.month)) {
            return Err(PredictionError::InvalidInput(format!(
                "month must be 1 to 12, got {}",
                self.month
            )));
        }
        if !(self.day.is_finite() && (1.0..=31.0).contains(&self.day)) {
            return Err(PredictionError::InvalidInput(format!(
                "day must be 1 to 31, got {}",
                self.day
            )));
        }
        if !self.flux.is_finite() {
            return Err(PredictionError::InvalidInput(format!(
                "solar flux must be finite, got {}",
                self.flux
            )));
        }
        if !self.tx_power_dbw.is_finite() {
            return Err(PredictionError::InvalidInput(format!(
                "transmitter power must be finite, got {} dBW",
                self.tx_power_dbw
            )));
        }
        if !(self.min_elevation.is_finite() && (0.0..90.0).contains(&self.min_elevation)) {
            return Err(PredictionError::InvalidInput(format!(
                "minimum elevation must be 0 to 90 degrees, got {}",
                self.min_elevation
            )));
        }
        if self.frequencies.len() > MAX_FREQUENCIES {
            return Err(PredictionError::CapacityExceeded {
                what: "working frequencies",
                requested: self.frequencies.len(),
                limit: MAX_FREQUENCIES,
            });
        }
        if let Some(f) = self.frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(PredictionError::InvalidInput(format!(
                "working frequencies must be positive, got {f} MHz"
            )));
        }
        self.link.receiver.validate()?;
        Ok(())
    }
}

/// Prediction for one UTC hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPrediction {
    pub hour: f64,       // UTC
    pub local_time: f64, // At the receiver
    pub muf: f64,        // F-layer MUF of the minimum-hop path (MHz)
    pub fc_f: f64,       // F-layer critical frequency (MHz)
    pub sun: SunGeometry,
    pub midpoint_zenith: f64, // Sun zenith angle at the middle of the path (rad)
    /// The minimum-hop path and the next two higher-hop paths.
    pub hops: Vec<HopState>,
    /// One per working frequency, in the configured order.
    pub evaluations: Vec<PathEvaluation>,
    /// Index into `evaluations` of the working frequency with the strongest
    /// chosen path.
    pub optimum: Option<usize>,
}

impl HourlyPrediction {
    /// Sun elevation at the middle of the path (degrees).
    pub fn midpoint_sun_elevation(&self) -> f64 {
        90.0 - self.midpoint_zenith * R2D
    }

    pub fn optimum_evaluation(&self) -> Option<&PathEvaluation> {
        self.optimum.map(|i| &self.evaluations[i])
    }

    pub fn optimum_frequency(&self) -> Option<f64> {
        self.optimum_evaluation().map(|e| e.frequency)
    }
}

/// A transmitter and receiver pair with everything that does not change
/// from hour to hour.
#[derive(Debug, Clone)]
pub struct Circuit {
    config: CircuitConfig,
    antenna: Option<AntennaGainTable>,
    path: PropagationPath,
    ssn: f64,
    min_hop: MinimumHop,
    noise_floor: f64,
}

impl Circuit {
    pub fn new(
        tx: Location,
        rx: Location,
        config: &CircuitConfig,
        antenna: Option<AntennaGainTable>,
    ) -> Result<Self> {
        config.validate()?;
        if !(tx.is_finite() && rx.is_finite()) {
            return Err(PredictionError::InvalidInput(format!(
                "coordinates must be finite, got {tx:?} and {rx:?}"
            )));
        }

        let path = PropagationPath::new(tx, rx, config.path);
        let min_hop = minimum_hops(path.distance(), config.min_elevation * D2R)?;
        let ssn = spots(config.flux);
        let noise_floor = if config.link.receiver == Receiver::default() {
            *STANDARD_NOISE_FLOOR_DBM
        } else {
            config.link.receiver.noise_floor_dbm()
        };

        debug!(
            "flux {:.0}, SSN {:.0}, {} hops minimum, delay {:.1} ms, noise {:.1} dBm",
            config.flux, ssn, min_hop.hops, min_hop.delay_ms, noise_floor
        );

        Ok(Circuit {
            config: config.clone(),
            antenna,
            path,
            ssn,
            min_hop,
            noise_floor,
        })
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn path(&self) -> &PropagationPath {
        &self.path
    }

    pub fn ssn(&self) -> f64 {
        self.ssn
    }

    pub fn minimum_hop(&self) -> &MinimumHop {
        &self.min_hop
    }

    /// Group delay of the minimum-hop path (ms).
    pub fn delay_ms(&self) -> f64 {
        self.min_hop.delay_ms
    }

    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }

    pub fn predict_hour(&self, hour: f64) -> Result<HourlyPrediction> {
        if !(0.0..24.0).contains(&hour) {
            return Err(PredictionError::InvalidInput(format!(
                "hour must be 0 to 23, got {hour}"
            )));
        }
        let config = &self.config;
        let distance = self.path.distance();

        // MINIMUF only sees the end points, so the long path gets the
        // short-path MUF
        let path_muf = minimuf(
            config.flux,
            config.month,
            config.day,
            hour,
            self.path.tx,
            self.path.rx,
        );
        let fc_f = path_muf * f64::cos(self.min_hop.f_incidence);

        let state = HourState::new(&self.path, config.month, config.day, hour, self.ssn);
        let midpoint_zenith = state.solar_zenith(distance / 2.0);

        let hops: Vec<HopState> = candidate_hops(distance, self.min_hop.hops, &state)
            .into_iter()
            .map(|geometry| HopState {
                geometry,
                ionosphere: ionospheric_state(geometry.hops, distance, fc_f, &state),
            })
            .collect();
        let muf = hops[0].ionosphere.muf_f;

        let evaluations: Vec<PathEvaluation> = config
            .frequencies
            .iter()
            .map(|&frequency| {
                evaluate_path(
                    &hops,
                    frequency,
                    config.tx_power_dbw,
                    &config.link,
                    self.antenna.as_ref(),
                    self.noise_floor,
                )
            })
            .collect();

        let mut level = self.noise_floor;
        let mut optimum = None;
        for (i, evaluation) in evaluations.iter().enumerate() {
            if let Some(power) = evaluation.received_power() {
                if power > level {
                    level = power;
                    optimum = Some(i);
                }
            }
        }

        debug!(
            "{:02.0} UTC: MUF {:.1} MHz, fcF {:.2} MHz, sun {:.0} deg at midpoint",
            hour,
            muf,
            fc_f,
            90.0 - midpoint_zenith * R2D
        );

        Ok(HourlyPrediction {
            hour,
            local_time: local_time(hour, self.path.rx),
            muf,
            fc_f,
            sun: state.sun,
            midpoint_zenith,
            hops,
            evaluations,
            optimum,
        })
    }

    /// Predictions for every whole UTC hour from first to last inclusive.
    pub fn predict_day(&self, first_hour: u32, last_hour: u32) -> Result<Vec<HourlyPrediction>> {
        (first_hour..=last_hour)
            .map(|hour| self.predict_hour(hour as f64))
            .collect()
    }
}

/// Predicts a whole day for one circuit. Coordinates in degrees, longitude
/// East positive.
pub fn create_circuit_prediction(
    tx_lat: f64,
    tx_lon: f64,
    rx_lat: f64,
    rx_lon: f64,
    config: &CircuitConfig,
) -> Result<Vec<HourlyPrediction>> {
    let circuit = Circuit::new(
        Location::from_degrees(tx_lat, tx_lon),
        Location::from_degrees(rx_lat, rx_lon),
        config,
        None,
    )?;
    circuit.predict_day(0, 23)
}
