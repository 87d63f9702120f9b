use crate::constants::*;
use crate::path_data::*;
use log::debug;

/// Inverse cosine with the argument clamped to [-1, 1] so rounding at
/// coincident or antipodal points cannot leave the domain.
pub fn acos_clamped(x: f64) -> f64 {
    f64::acos(x.clamp(-1.0, 1.0))
}

/// Longitude difference tx - rx folded into (-PI, PI).
pub fn longitude_difference(tx: Location, rx: Location) -> f64 {
    let mut theta = tx.lng - rx.lng;
    if theta >= PI {
        theta -= PID;
    }
    if theta <= -PI {
        theta += PID;
    }
    theta
}

/// Determines the path angle and the bearings at both ends of the great circle
/// from tx to rx. The long path goes the other way around the Earth.
pub fn great_circle(tx: Location, rx: Location, switch: ShortOrLongPathSwitch) -> GreatCircle {
    let theta = longitude_difference(tx, rx);

    let mut d = acos_clamped(
        f64::sin(tx.lat) * f64::sin(rx.lat) + f64::cos(tx.lat) * f64::cos(rx.lat) * f64::cos(theta),
    );

    let (mut b1, mut b2) = if f64::sin(d) == 0.0 {
        // Coincident points have no direction
        (0.0, 0.0)
    } else {
        let mut b1 = acos_clamped(
            (f64::sin(rx.lat) - f64::sin(tx.lat) * f64::cos(d)) / (f64::cos(tx.lat) * f64::sin(d)),
        );
        if theta < 0.0 {
            b1 = PID - b1;
        }
        let mut b2 = acos_clamped(
            (f64::sin(tx.lat) - f64::sin(rx.lat) * f64::cos(d)) / (f64::cos(rx.lat) * f64::sin(d)),
        );
        if theta >= 0.0 {
            b2 = PID - b2;
        }
        (b1 % PID, b2 % PID)
    };

    if switch == ShortOrLongPathSwitch::Long {
        d = PID - d;
        b1 += PI;
        if b1 >= PID {
            b1 -= PID;
        }
        b2 += PI;
        if b2 >= PID {
            b2 -= PID;
        }
    }

    GreatCircle {
        distance: d,
        bearing_tx: b1,
        bearing_rx: b2,
    }
}

impl PropagationPath {
    pub fn new(tx: Location, rx: Location, switch: ShortOrLongPathSwitch) -> Self {
        let great_circle = great_circle(tx, rx, switch);

        debug!(
            "{:?} path {:.0} km, bearing {:.0} deg at tx, {:.0} deg at rx",
            switch,
            great_circle.distance_km(),
            great_circle.bearing_tx * R2D,
            great_circle.bearing_rx * R2D
        );

        PropagationPath {
            tx,
            rx,
            theta: longitude_difference(tx, rx),
            switch,
            great_circle,
        }
    }

    /// Determines the point at path angle dist from the transmitter, following
    /// the transmitter bearing.
    pub fn reflection_zone(&self, dist: f64) -> Location {
        let tx = self.tx;

        let lat = PIH
            - acos_clamped(
                f64::cos(dist) * f64::sin(tx.lat)
                    + f64::sin(dist) * f64::cos(tx.lat) * f64::cos(self.great_circle.bearing_tx),
            );

        let mut lng = acos_clamped(
            (f64::cos(dist) - f64::sin(lat) * f64::sin(tx.lat)) / (f64::cos(lat) * f64::cos(tx.lat)),
        );
        if self.theta < 0.0 {
            lng = -lng;
        }
        lng = tx.lng - lng;
        if lng >= PI {
            lng -= PID;
        }
        if lng <= -PI {
            lng += PID;
        }

        Location { lat, lng }
    }
}

/// Folds an hour value into [0, 24).
pub fn fold_hours(time: f64) -> f64 {
    let mut time = time;
    if time < 0.0 {
        time += 24.0;
    }
    if time >= 24.0 {
        time -= 24.0;
    }
    time
}

/// Local mean time (hours) at a location for a UTC hour.
pub fn local_time(hour: f64, location: Location) -> f64 {
    fold_hours(hour - location.lng * 24.0 / PID)
}
