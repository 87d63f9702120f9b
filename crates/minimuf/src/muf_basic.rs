use crate::constants::*;
use crate::geometry::acos_clamped;
use crate::path_data::Location;
use crate::sunspot_number::spots;
use log::{trace, warn};

/// BASIC SGN: zero maps to zero.
fn sgn(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Folds a time of day that may have run past 24 h back into range.
fn fold_past_midnight(time: f64) -> f64 {
    time - 12.0 * (1.0 + sgn(time - 24.0)) * sgn(f64::abs(time - 24.0))
}

/// Folds a time of day that may have gone negative back into range.
fn fold_before_midnight(time: f64) -> f64 {
    time + 12.0 * (1.0 - sgn(time)) * sgn(f64::abs(time))
}

/// Moves hour forward a day unless it is already after time.
fn hour_after(time: f64, hour: f64) -> f64 {
    hour + 12.0 * (1.0 + sgn(time - hour)) * sgn(f64::abs(time - hour))
}

/// MINIMUF 3.5 (QST, December 1982).
///
/// Samples the great circle between tx and rx and returns the lowest MUF
/// (MHz) found: a path is only as good as its weakest reflection point.
/// The number of samples depends on the path angle, not on its length in
/// km, and is usually one or two.
pub fn minimuf(flux: f64, month: f64, day: f64, hour: f64, tx: Location, rx: Location) -> f64 {
    let path = MinimufPath::new(flux, month, day, hour, tx, rx);

    let start = 1.0 / (2.0 * path.k6);
    let end = 1.0 - 1.0 / (2.0 * path.k6);
    let step = f64::abs(0.9999 - 1.0 / path.k6);

    let mut muf = 100.0;
    let mut k1 = start;
    let mut samples = 0;
    while k1 <= end {
        if samples == MAX_MUF_SAMPLES {
            // Near k6 = 1/0.9999 the step collapses towards zero
            warn!(
                "MUF sampling stopped after {} samples (step {:e}, path angle {:.4} rad)",
                samples, step, path.dist
            );
            break;
        }

        let sample = path.sample(k1);
        trace!("MUF sample at fraction {:.4}: {:.3} MHz", k1, sample);
        if sample < muf {
            muf = sample;
        }

        k1 += step;
        samples += 1;
    }

    muf
}

/// Path invariants shared by every sample.
struct MinimufPath {
    ssn: f64,
    hour: f64,
    tx: Location,
    rx: Location,
    dist: f64, // Path angle (rad)
    k6: f64,   // Sample count scale
    p: f64,    // sin(rx.lat)
    q: f64,    // cos(rx.lat)
    a: f64,    // Cosine of the bearing at the receiver
    y1: f64,   // Seasonal phase
    y2: f64,   // Seasonal weighting
    m9: f64,   // Path length weighting
}

impl MinimufPath {
    fn new(flux: f64, month: f64, day: f64, hour: f64, tx: Location, rx: Location) -> Self {
        let ssn = spots(flux);

        let dist = acos_clamped(
            f64::sin(tx.lat) * f64::sin(rx.lat)
                + f64::cos(tx.lat) * f64::cos(rx.lat) * f64::cos(rx.lng - tx.lng),
        );

        let mut k6 = 1.59 * dist;
        if k6 < 1.0 {
            k6 = 1.0;
        }

        let p = f64::sin(rx.lat);
        let q = f64::cos(rx.lat);
        let a = if f64::sin(dist) == 0.0 {
            0.0
        } else {
            (f64::sin(tx.lat) - p * f64::cos(dist)) / (q * f64::sin(dist))
        };

        let y1 = 0.0172 * (10.0 + (month - 1.0) * 30.4 + day);
        let y2 = 0.409 * f64::cos(y1);

        let s = f64::sin(f64::min(2.5 * dist / k6, PIH));
        let m9 = 1.0 + 2.5 * s * f64::sqrt(s);

        MinimufPath {
            ssn,
            hour,
            tx,
            rx,
            dist,
            k6,
            p,
            q,
            a,
            y1,
            y2,
            m9,
        }
    }

    /// MUF (MHz) at fraction k1 of the way from rx to tx.
    fn sample(&self, k1: f64) -> f64 {
        let (p, q, y2, hour) = (self.p, self.q, self.y2, self.hour);

        // Latitude and longitude of the sample point
        let arc = self.dist * k1;
        let sin_lat = (p * f64::cos(arc) + q * f64::sin(arc) * self.a).clamp(-1.0, 1.0);
        let y3 = PIH - f64::acos(sin_lat);

        let cos_dlng = (f64::cos(arc) - sin_lat * p) / (q * f64::sqrt(1.0 - sin_lat * sin_lat));
        let mut lng = self.rx.lng + sgn(f64::sin(self.tx.lng - self.rx.lng)) * acos_clamped(cos_dlng);
        if lng < 0.0 {
            lng += PID;
        }
        if lng >= PID {
            lng -= PID;
        }

        // Local solar time of the sample point, with the equation of time
        let time = 3.82 * lng + 12.0 + 0.13 * (f64::sin(self.y1) + 1.2 * f64::sin(2.0 * self.y1));
        let k8 = fold_past_midnight(time);

        let (k9, g0) = if f64::cos(y3 + y2) <= -0.26 {
            // The Sun never rises here on this date
            (0.0, 0.0)
        } else {
            // Day length
            let x = (-0.26 + f64::sin(y2) * f64::sin(y3)) / (f64::cos(y2) * f64::cos(y3) + 0.001);
            let k9 = 12.0 - f64::atan(x / f64::sqrt(f64::abs(1.0 - x * x))) * 7.639437;

            let sunrise = fold_before_midnight(k8 - k9 / 2.0);
            let sunset = fold_past_midnight(k8 + k9 / 2.0);

            let c0 = f64::abs(f64::cos(y3 + y2));
            let t9 = f64::max(9.7 * f64::powf(c0, 9.6), 0.1);
            let g8 = PI * t9 / k9;

            let night = (sunset < sunrise && (hour - sunset) * (sunrise - hour) > 0.0)
                || (sunset >= sunrise && (hour - sunrise) * (sunset - hour) <= 0.0);

            let g0 = if night {
                // Decay since sunset
                let since = (sunset - hour_after(sunset, hour)) / 2.0;
                c0 * (g8 * (f64::exp(-k9 / t9) + 1.0)) * f64::exp(since) / (1.0 + g8 * g8)
            } else {
                let h = hour_after(sunrise, hour);
                let phase = PI * (h - sunrise) / k9;
                let daytime = c0 * (f64::sin(phase) + g8 * (f64::exp((sunrise - h) / t9) - f64::cos(phase)))
                    / (1.0 + g8 * g8);
                // Never below the level the night branch reaches at the terminator
                let floor = c0 * (g8 * (f64::exp(-k9 / t9) + 1.0)) * f64::exp((k9 - 24.0) / 2.0)
                    / (1.0 + g8 * g8);
                if daytime < floor {
                    floor
                } else {
                    daytime
                }
            };

            (k9, g0)
        };

        let mut muf = (1.0 + self.ssn / 250.0) * self.m9 * f64::sqrt(6.0 + 58.0 * f64::sqrt(g0));
        muf *= 1.0 - 0.1 * f64::exp((k9 - 24.0) / 3.0);
        muf *= 1.0 + 0.1 * (1.0 - sgn(self.tx.lat) * sgn(self.rx.lat));
        muf *= 1.0 - 0.1 * (1.0 + sgn(f64::abs(f64::sin(y3)) - f64::cos(y3)));
        muf
    }
}
