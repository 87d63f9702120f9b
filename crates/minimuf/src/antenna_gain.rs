use crate::constants::*;
use crate::error::{PredictionError, Result};
use serde::{Deserialize, Serialize};

/// Main-lobe gain (dB) of an antenna, by elevation in 2 degree rows from 0
/// to 90 degrees and by frequency at ascending breakpoints (MHz).
///
/// The table is indexed as `gains[row][column]`, one column per breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGainTable")]
pub struct AntennaGainTable {
    frequencies: Vec<f64>,
    gains: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawGainTable {
    frequencies: Vec<f64>,
    gains: Vec<Vec<f64>>,
}

impl TryFrom<RawGainTable> for AntennaGainTable {
    type Error = PredictionError;

    fn try_from(raw: RawGainTable) -> Result<Self> {
        AntennaGainTable::new(raw.frequencies, raw.gains)
    }
}

impl AntennaGainTable {
    pub fn new(frequencies: Vec<f64>, gains: Vec<Vec<f64>>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(PredictionError::InvalidGainTable(
                "no frequency breakpoints".to_string(),
            ));
        }
        if frequencies.len() > MAX_GAIN_FREQUENCIES {
            return Err(PredictionError::CapacityExceeded {
                what: "antenna gain frequencies",
                requested: frequencies.len(),
                limit: MAX_GAIN_FREQUENCIES,
            });
        }
        if frequencies.iter().any(|f| !f.is_finite()) {
            return Err(PredictionError::InvalidGainTable(
                "frequency breakpoints must be finite".to_string(),
            ));
        }
        if frequencies.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PredictionError::InvalidGainTable(format!(
                "frequency breakpoints must ascend: {frequencies:?}"
            )));
        }
        if gains.len() != GAIN_TABLE_ROWS {
            return Err(PredictionError::InvalidGainTable(format!(
                "expected {} elevation rows, got {}",
                GAIN_TABLE_ROWS,
                gains.len()
            )));
        }
        if let Some(row) = gains.iter().position(|row| row.len() != frequencies.len()) {
            return Err(PredictionError::InvalidGainTable(format!(
                "row {} has {} columns for {} frequencies",
                row,
                gains[row].len(),
                frequencies.len()
            )));
        }

        Ok(AntennaGainTable { frequencies, gains })
    }

    /// A table with the same gain everywhere.
    pub fn uniform(frequencies: Vec<f64>, gain: f64) -> Result<Self> {
        let columns = frequencies.len();
        AntennaGainTable::new(frequencies, vec![vec![gain; columns]; GAIN_TABLE_ROWS])
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn gains(&self) -> &[Vec<f64>] {
        &self.gains
    }

    /// Gain (dB) at a frequency (MHz) and elevation angle (rad).
    ///
    /// Bilinear between the bracketing rows and breakpoints. Outside the
    /// breakpoints the nearest column is used as is.
    pub fn gain(&self, frequency: f64, elevation: f64) -> f64 {
        let mut r = elevation * R2D / GAIN_TABLE_STEP;
        if (r - r.round()).abs() < 1e-12 {
            r = r.round();
        }
        let i = usize::min(r as usize, GAIN_TABLE_ROWS - 1);
        let r = r - i as f64;
        let s = 1.0 - r;

        let n = self.frequencies.len();
        let j = self
            .frequencies
            .iter()
            .position(|&f| f >= frequency)
            .unwrap_or(n);

        // Between rows i and i + 1 of one column
        let column = |j: usize| -> f64 {
            if i + 1 < GAIN_TABLE_ROWS {
                s * self.gains[i][j] + r * self.gains[i + 1][j]
            } else {
                self.gains[i][j]
            }
        };

        // Past either end of the breakpoints the last interpolation row is
        // not blended with the top row.
        if j == 0 || j == n {
            let edge = if j == 0 { 0 } else { n - 1 };
            if i >= GAIN_TABLE_ROWS - 2 {
                return self.gains[i][edge];
            }
            return column(edge);
        }

        let p = (frequency - self.frequencies[j - 1]) / (self.frequencies[j] - self.frequencies[j - 1]);
        let q = 1.0 - p;
        q * column(j - 1) + p * column(j)
    }
}

/// Antenna gain (dB); an isotropic 0 dB when there is no table.
pub fn antenna_gain(table: Option<&AntennaGainTable>, frequency: f64, elevation: f64) -> f64 {
    match table {
        Some(table) => table.gain(frequency, elevation),
        None => 0.0,
    }
}
