use crate::constants::*;
use crate::geometry::acos_clamped;
use crate::path_data::*;

impl SunGeometry {
    /// Subsolar point for a date and UTC hour. The declination follows a sine
    /// through the March equinox (day 80) with a 23.5 degree amplitude.
    pub fn at(month: f64, day: f64, hour: f64) -> Self {
        let days = (month - 1.0) * 365.25 / 12.0 + day - 80.0;
        SunGeometry {
            lat: 23.5 * D2R * f64::sin(days / 365.25 * PID),
            lng: (hour * 15.0 - 180.0) * D2R,
        }
    }
}

/// Everything that is fixed for one simulated hour on one path.
#[derive(Debug, Clone, Copy)]
pub struct HourState<'a> {
    pub path: &'a PropagationPath,
    pub sun: SunGeometry,
    pub hour: f64, // UTC
    pub ssn: f64,  // Sunspot number
}

impl<'a> HourState<'a> {
    pub fn new(path: &'a PropagationPath, month: f64, day: f64, hour: f64, ssn: f64) -> Self {
        HourState {
            path,
            sun: SunGeometry::at(month, day, hour),
            hour,
            ssn,
        }
    }

    /// Sun zenith angle (rad) at path angle dist from the transmitter.
    pub fn solar_zenith(&self, dist: f64) -> f64 {
        solar_zenith(self.path, &self.sun, dist)
    }

    /// True when the Sun is below the horizon at the middle of the path.
    pub fn is_midpoint_night(&self) -> bool {
        90.0 - self.solar_zenith(self.path.distance() / 2.0) * R2D < 0.0
    }
}

/// Determines the sun zenith angle at the reflection zone dist along the path.
pub fn solar_zenith(path: &PropagationPath, sun: &SunGeometry, dist: f64) -> f64 {
    let zone = path.reflection_zone(dist);

    let mut thetar = sun.lng - zone.lng;
    if thetar > PI {
        thetar = PID - thetar;
    }
    if thetar < -PI {
        thetar -= PID;
    }

    acos_clamped(
        f64::sin(zone.lat) * f64::sin(sun.lat)
            + f64::cos(zone.lat) * f64::cos(sun.lat) * f64::cos(thetar),
    )
}
