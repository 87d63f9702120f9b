//! Receiver noise for HF link budgets.
//!
//! The propagation core only needs two numbers from the receiver side: the
//! thermal noise floor kTB, which a candidate path must beat to be considered
//! at all, and the receiver sensitivity, below which a path is flagged as weak.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boltzmann's constant (J/K)
pub const BOLTZMANN: f64 = 1.380622e-23;
/// Receiver noise temperature (K)
pub const DEFAULT_NOISE_TEMPERATURE: f64 = 290.0;
/// Communication bandwidth (Hz)
pub const DEFAULT_BANDWIDTH: f64 = 2500.0;
/// Receiver sensitivity (dBm), 0.15 uV at 50 Ohm for 10 dB S/N
pub const DEFAULT_SENSITIVITY: f64 = -123.0;

#[derive(Error, Debug, PartialEq)]
pub enum ReceiverNoiseError {
    #[error("noise temperature must be positive and finite, got {0} K")]
    Temperature(f64),
    #[error("bandwidth must be positive and finite, got {0} Hz")]
    Bandwidth(f64),
    #[error("sensitivity must be finite, got {0} dBm")]
    Sensitivity(f64),
}

pub type Result<T> = std::result::Result<T, ReceiverNoiseError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receiver {
    pub noise_temperature: f64, // K
    pub bandwidth: f64,         // Hz
    pub sensitivity: f64,       // dBm
}

impl Default for Receiver {
    fn default() -> Self {
        Receiver {
            noise_temperature: DEFAULT_NOISE_TEMPERATURE,
            bandwidth: DEFAULT_BANDWIDTH,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

lazy_static! {
    /// Noise floor of the default 290 K, 2500 Hz receiver (dBm).
    pub static ref STANDARD_NOISE_FLOOR_DBM: f64 = Receiver::default().noise_floor_dbm();
}

impl Receiver {
    pub fn new(noise_temperature: f64, bandwidth: f64, sensitivity: f64) -> Result<Self> {
        let receiver = Receiver {
            noise_temperature,
            bandwidth,
            sensitivity,
        };
        receiver.validate()?;
        Ok(receiver)
    }

    /// Checks a receiver that may have come from a config file.
    pub fn validate(&self) -> Result<()> {
        if !(self.noise_temperature.is_finite() && self.noise_temperature > 0.0) {
            return Err(ReceiverNoiseError::Temperature(self.noise_temperature));
        }
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(ReceiverNoiseError::Bandwidth(self.bandwidth));
        }
        if !self.sensitivity.is_finite() {
            return Err(ReceiverNoiseError::Sensitivity(self.sensitivity));
        }
        Ok(())
    }

    /// Thermal noise power kTB expressed in dBm.
    pub fn noise_floor_dbm(&self) -> f64 {
        thermal_noise_dbm(self.noise_temperature, self.bandwidth)
    }

    pub fn is_above_sensitivity(&self, level_dbm: f64) -> bool {
        level_dbm >= self.sensitivity
    }

    /// Margin of a received level over the sensitivity threshold (dB).
    pub fn margin_over_sensitivity(&self, level_dbm: f64) -> f64 {
        level_dbm - self.sensitivity
    }
}

/// kTB in dBm for a noise temperature (K) and bandwidth (Hz).
pub fn thermal_noise_dbm(noise_temperature: f64, bandwidth: f64) -> f64 {
    10.0 * f64::log10(BOLTZMANN * noise_temperature * bandwidth) + 30.0
}
