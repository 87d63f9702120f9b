use crate::constants::*;
use serde::{Deserialize, Serialize};

/// A point on the Earth. Radians, North and West positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Builds a location from radians, folding the longitude into (-PI, PI].
    pub fn new(lat: f64, lng: f64) -> Self {
        Location {
            lat,
            lng: normalize_longitude(lng),
        }
    }

    /// Builds a location from conventional degrees: latitude North positive,
    /// longitude East positive (75.78 W is -75.78).
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Location::new(latitude * D2R, -longitude * D2R)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Folds a longitude (radians) into (-PI, PI].
pub fn normalize_longitude(lng: f64) -> f64 {
    let mut lng = lng % PID;
    if lng > PI {
        lng -= PID;
    }
    if lng <= -PI {
        lng += PID;
    }
    lng
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortOrLongPathSwitch {
    #[default]
    Short,
    Long,
}

/// Great circle between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GreatCircle {
    pub distance: f64,   // Path angle (rad), [0, PI] short or [PI, 2 PI] long
    pub bearing_tx: f64, // Bearing at the transmitter (rad)
    pub bearing_rx: f64, // Bearing at the receiver (rad)
}

impl GreatCircle {
    pub fn distance_km(&self) -> f64 {
        self.distance * R0
    }
}

/// Transmitter to receiver geometry, fixed for the life of a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropagationPath {
    pub tx: Location,
    pub rx: Location,
    pub theta: f64, // Longitude difference tx - rx folded into (-PI, PI) (rad)
    pub switch: ShortOrLongPathSwitch,
    pub great_circle: GreatCircle,
}

impl PropagationPath {
    pub fn distance(&self) -> f64 {
        self.great_circle.distance
    }

    pub fn distance_km(&self) -> f64 {
        self.great_circle.distance_km()
    }
}

/// Subsolar point for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunGeometry {
    pub lat: f64, // Solar declination (rad)
    pub lng: f64, // Subsolar longitude, West positive (rad)
}

/// Geometry of one candidate hop count for the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HopGeometry {
    pub hops: usize,
    pub half_hop: f64,    // Half of the hop ground angle (rad)
    pub height: f64,      // F-layer reflection height this hour (km)
    pub elevation: f64,   // Takeoff angle (rad)
    pub path_length: f64, // Slant path length over all hops (km)
    pub e_incidence: f64, // Angle of incidence at the E layer (rad)
    pub f_incidence: f64, // Angle of incidence at the reflection height (rad)
}

impl HopGeometry {
    /// Propagation delay along the slant path (ms)
    pub fn delay_ms(&self) -> f64 {
        self.path_length / VOF_L * 1e6
    }
}

/// Path descriptor flags for a hop.
///
/// A hop whose reflection zones straddle the terminator carries both
/// [`PathFlags::DAY`] and [`PathFlags::NIGHT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathFlags(u8);

impl PathFlags {
    pub const DAY: PathFlags = PathFlags(0x01); // hop in daytime
    pub const NIGHT: PathFlags = PathFlags(0x02); // hop in nighttime
    pub const WEAK: PathFlags = PathFlags(0x04); // signal below sensitivity
    pub const E_CUTOFF: PathFlags = PathFlags(0x08); // below the E-layer MUF
    pub const MULTIPATH: PathFlags = PathFlags(0x10);

    pub const fn empty() -> Self {
        PathFlags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: PathFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PathFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PathFlags) {
        self.0 &= !other.0;
    }

    /// 'x' when the hop is partly in daylight and partly in darkness,
    /// 'j' for day, 'n' for night.
    pub fn day_night_code(self) -> Option<char> {
        match (self.contains(Self::DAY), self.contains(Self::NIGHT)) {
            (true, true) => Some('x'),
            (true, false) => Some('j'),
            (false, true) => Some('n'),
            (false, false) => None,
        }
    }

    /// 's' for a weak signal, otherwise 'm' for multipath, otherwise blank.
    pub fn quality_code(self) -> char {
        if self.contains(Self::WEAK) {
            's'
        } else if self.contains(Self::MULTIPATH) {
            'm'
        } else {
            ' '
        }
    }
}

impl std::ops::BitOr for PathFlags {
    type Output = PathFlags;

    fn bitor(self, rhs: PathFlags) -> PathFlags {
        PathFlags(self.0 | rhs.0)
    }
}

/// Ionospheric conditions along one candidate hop count for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IonosphericState {
    pub muf_e: f64,      // Maximum E-layer MUF over the reflection zones (MHz)
    pub muf_f: f64,      // F-layer MUF (MHz)
    pub absorption: f64, // Sum of the absorption coefficients of the reflection zones
    pub flags: PathFlags,
}

/// A hop count with its geometry and ionosphere for the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HopState {
    pub geometry: HopGeometry,
    pub ionosphere: IonosphericState,
}

/// Link budget of one hop count at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalBudget {
    pub hops: usize,
    pub frequency: f64,         // MHz
    pub tx_power: f64,          // dBm
    pub antenna_gain: f64,      // dB
    pub free_space_loss: f64,   // Free-space loss plus system loss (dB)
    pub ionospheric_loss: f64,  // dB
    pub ground_loss: f64,       // dB
    pub received_power: f64,    // dBm
    pub effective_power: f64,   // Received power less any multipath penalty (dBm)
    pub flags: PathFlags,
}
