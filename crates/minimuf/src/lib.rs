//! HF sky-wave propagation predictions for a transmitter and receiver pair,
//! built around the MINIMUF 3.5 maximum usable frequency model.
//!
//! For each UTC hour the circuit's minimum-hop path and the next two
//! higher-hop paths are laid out, their ionospheric conditions estimated, and
//! at each working frequency the path most likely to carry the signal is
//! chosen along with its received power.

pub mod antenna_gain;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hop_geometry;
pub mod ionospheric_layers;
pub mod muf_basic;
pub mod path_data;
pub mod prediction;
pub mod receiver_power;
pub mod solar_zenith;
pub mod sunspot_number;

pub use antenna_gain::{antenna_gain, AntennaGainTable};
pub use error::{PredictionError, Result};
pub use muf_basic::minimuf;
pub use path_data::{
    HopGeometry, HopState, IonosphericState, Location, PathFlags, PropagationPath,
    ShortOrLongPathSwitch, SignalBudget, SunGeometry,
};
pub use prediction::{create_circuit_prediction, Circuit, CircuitConfig, HourlyPrediction};
pub use receiver_noise::Receiver;
pub use receiver_power::{evaluate_path, LinkBudget, PathEvaluation};
pub use sunspot_number::spots;
