//! Contract with the astronomical engine that supplies raw longitudes.
//!
//! The chart pipeline only ever talks to an [`Ephemeris`]. Process-wide
//! conventions (the sidereal reference system) are fixed when the instance is
//! built; everything that varies per request travels as call arguments.

mod swiss;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use swiss::SwissEphemeris;

/// Sidereal reference systems understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiderealMode {
    /// Chitrapaksha: Spica at 0 deg Libra. Indian government standard.
    Lahiri,
    Krishnamurti,
    Raman,
    #[serde(rename = "Fagan-Bradley")]
    FaganBradley,
}

impl SiderealMode {
    pub const fn name(self) -> &'static str {
        match self {
            SiderealMode::Lahiri => "Lahiri",
            SiderealMode::Krishnamurti => "Krishnamurti",
            SiderealMode::Raman => "Raman",
            SiderealMode::FaganBradley => "Fagan-Bradley",
        }
    }
}

impl fmt::Display for SiderealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SiderealMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lahiri" | "chitrapaksha" => Ok(SiderealMode::Lahiri),
            "krishnamurti" | "kp" => Ok(SiderealMode::Krishnamurti),
            "raman" => Ok(SiderealMode::Raman),
            "fagan_bradley" | "fagan-bradley" => Ok(SiderealMode::FaganBradley),
            other => Err(format!("unsupported ayanamsa '{other}'")),
        }
    }
}

/// House division requested from [`Ephemeris::houses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HouseSystem {
    Placidus,
    Porphyry,
}

impl HouseSystem {
    /// Single-letter code conventionally used by ephemeris engines.
    pub const fn code(self) -> char {
        match self {
            HouseSystem::Placidus => 'P',
            HouseSystem::Porphyry => 'O',
        }
    }
}

/// Bodies the chart pipeline asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Body {
    Sun,
    Moon,
}

/// Selects the zodiac frame of a returned longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionFlags {
    pub sidereal: bool,
}

impl PositionFlags {
    pub const TROPICAL: PositionFlags = PositionFlags { sidereal: false };
    pub const SIDEREAL: PositionFlags = PositionFlags { sidereal: true };
}

/// Tropical house cusps and angles for one instant and place.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseCusps {
    /// System actually used; may differ from the requested one at polar latitudes.
    pub system: HouseSystem,
    /// Cusps of houses 1 through 12, degrees.
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub mc: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EphemerisError {
    #[error("{quantity} must be finite, got {value}")]
    NonFinite { quantity: &'static str, value: f64 },
    #[error("calendar date {year}-{month:02}-{day:02} is out of range")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("ephemeris data directory {path} is not readable")]
    DataPath { path: String },
    #[error("ephemeris engine failed: {message}")]
    Engine { message: String },
}

/// Astronomical engine consumed by the chart generator.
pub trait Ephemeris: Send + Sync {
    /// Sidereal reference system fixed at construction.
    fn sidereal_mode(&self) -> SiderealMode;

    /// Julian Day (UT) for a Gregorian calendar date and fractional UTC hour.
    fn julian_day(&self, year: i32, month: u32, day: u32, hour_utc: f64) -> Result<f64, EphemerisError>;

    /// Tropical house cusps, ascendant and MC.
    fn houses(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError>;

    /// Ayanamsa in degrees under [`Ephemeris::sidereal_mode`].
    fn ayanamsa(&self, julian_day: f64) -> Result<f64, EphemerisError>;

    /// Ecliptic longitude of a body in degrees, `[0, 360)`.
    fn body_position(&self, julian_day: f64, body: Body, flags: PositionFlags) -> Result<f64, EphemerisError>;
}
