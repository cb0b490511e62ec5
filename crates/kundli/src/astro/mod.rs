//! Sidereal positions: ephemeris access, zodiac classification and chart assembly.

pub mod chart;
pub mod ephemeris;
pub mod position;

pub use chart::{BirthInput, Chart, ChartGenerator};
pub use ephemeris::{Ephemeris, EphemerisError, SiderealMode, SwissEphemeris};
pub use position::{Nakshatra, Pada, Sign};
