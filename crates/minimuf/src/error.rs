use receiver_noise::ReceiverNoiseError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PredictionError {
    #[error("{what}: {requested} requested, at most {limit} supported")]
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        limit: usize,
    },
    #[error("no hop count up to {max_hops} reaches the minimum elevation of {min_elevation:.2} deg")]
    HopSearchDiverged { min_elevation: f64, max_hops: usize },
    #[error("invalid antenna gain table: {0}")]
    InvalidGainTable(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Receiver(#[from] ReceiverNoiseError),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
