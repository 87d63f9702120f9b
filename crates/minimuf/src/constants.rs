//! Constants for MINIMUF predictions

pub const PI: f64 = 3.141592653589;
pub const PIH: f64 = PI / 2.0;
pub const PID: f64 = PI * 2.0;
pub const D2R: f64 = PI / 180.0; // degrees to radians
pub const R2D: f64 = 180.0 / PI; // radians to degrees

pub const R0: f64 = 6371.2; // km radius of the Earth
pub const HE: f64 = 110.0; // km mean height of the E layer
pub const HF: f64 = 320.0; // km mean height of the F layer
pub const VOF_L: f64 = 2.9979250e8; // Velocity of light (m/s)

// The F layer rises after sunset and sinks during the day. These are the
// offsets from HF as judged by the Sun at the middle of the path.
pub const HF_NIGHT_RISE: f64 = 70.0; // km
pub const HF_DAY_DROP: f64 = 30.0; // km

pub const GAMMA: f64 = 1.42; // geomagnetic constant
pub const LN10: f64 = 2.302585; // natural logarithm of 10

// Link budget defaults (dB)
pub const MPATH: f64 = 3.0; // multipath threshold
pub const GLOSS: f64 = 3.0; // ground-reflection loss
pub const SLOSS: f64 = 10.0; // excess system loss

// The frequency must stay below this fraction of the F-layer MUF
pub const FOT_FRACTION: f64 = 0.85;

// Minimum elevation angle (degrees)
pub const MIN_ELE_ANGLE: f64 = 10.0;

// The absorption model stops following the Sun past this zenith angle
pub const ABSORPTION_CUTOFF_ZENITH: f64 = 100.8 * D2R;

// Candidate paths: the min-hop path and the next two higher-hop paths
pub const CANDIDATE_HOPS: usize = 3;

// Capacity limits
pub const MAX_HOPS: usize = 30;
pub const MAX_FREQUENCIES: usize = 10;
pub const MAX_GAIN_FREQUENCIES: usize = 5;
pub const GAIN_TABLE_ROWS: usize = 46; // 0 to 90 degrees elevation
pub const GAIN_TABLE_STEP: f64 = 2.0; // degrees per row
pub const MAX_MUF_SAMPLES: usize = 64;

// WWV Ft. Collins
pub const DEFAULT_FREQUENCIES: [f64; 5] = [2.5, 5.0, 10.0, 15.0, 20.0];
