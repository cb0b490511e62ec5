//! Birth details to sidereal chart.

use std::sync::Arc;

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ephemeris::{Body, Ephemeris, HouseSystem, PositionFlags, SiderealMode};
use super::position::{
    nakshatra_and_pada, normalize_degrees, zodiac_sign, Nakshatra, Pada, Sign, NAKSHATRA_SPAN,
    SIGN_SPAN,
};
use crate::error::KundliError;
use crate::matching::CompatibilityProfile;

const DATE_TIME_FORMAT: &str = "%d-%m-%Y %I:%M %p";
const BOUNDARY_MARGIN_DEG: f64 = 0.5;
const BOUNDARY_PENALTY: u8 = 5;

/// Local birth details as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    /// `DD-MM-YYYY`
    pub date: String,
    /// `HH:MM AM` / `HH:MM PM`
    pub time: String,
    /// IANA zone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartLongitudes {
    pub sun: f64,
    pub moon: f64,
    pub ascendant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMetadata {
    pub calculation_time: DateTime<Utc>,
    pub timezone: String,
    pub coordinates: Coordinates,
}

/// Computed Kundli. Longitudes are sidereal degrees rounded to 6 places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub sun_sign: Sign,
    pub moon_sign: Sign,
    pub ascendant: Sign,
    pub nakshatra: Nakshatra,
    pub nakshatra_pada: Pada,
    pub ayanamsa: SiderealMode,
    pub planetary_longitudes: ChartLongitudes,
    pub metadata: ChartMetadata,
    pub confidence: u8,
}

impl Chart {
    /// Moon sign and nakshatra, the inputs of Ashta-Koota matching.
    pub fn compatibility_profile(&self) -> CompatibilityProfile {
        CompatibilityProfile {
            moon_sign: self.moon_sign,
            nakshatra: self.nakshatra,
        }
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), KundliError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(KundliError::invalid(format!(
            "Latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(KundliError::invalid(format!(
            "Longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

/// Interprets a local wall-clock time in an IANA zone and converts it to UTC.
///
/// Wall-clock times that occur twice (DST fall-back) or never (spring-forward)
/// are rejected rather than resolved by guessing an offset.
pub fn parse_local_datetime(date: &str, time: &str, timezone: &str) -> Result<DateTime<Utc>, KundliError> {
    let raw = format!("{} {}", date.trim(), time.trim());
    let naive = NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT).map_err(|err| {
        KundliError::invalid(format!(
            "Invalid date/time format: {err}. Expected format: 'DD-MM-YYYY HH:MM AM/PM'"
        ))
    })?;

    let zone: Tz = timezone
        .trim()
        .parse()
        .map_err(|_| KundliError::invalid(format!("Unknown timezone: {timezone}")))?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, latest) => Err(KundliError::invalid(format!(
            "Ambiguous local time {raw} in {timezone}: could be {} or {}",
            earliest.with_timezone(&Utc).to_rfc3339(),
            latest.with_timezone(&Utc).to_rfc3339()
        ))),
        LocalResult::None => Err(KundliError::invalid(format!(
            "Local time {raw} does not exist in {timezone} (skipped by a clock change)"
        ))),
    }
}

/// Julian Day of a UTC instant, computed by the ephemeris.
pub fn to_julian_day<E: Ephemeris + ?Sized>(ephemeris: &E, instant: DateTime<Utc>) -> Result<f64, KundliError> {
    let hour = f64::from(instant.hour())
        + f64::from(instant.minute()) / 60.0
        + f64::from(instant.second()) / 3600.0;
    Ok(ephemeris.julian_day(instant.year(), instant.month(), instant.day(), hour)?)
}

/// Sidereal Sun, Moon and ascendant longitudes in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiderealPositions {
    pub sun: f64,
    pub moon: f64,
    pub ascendant: f64,
}

/// Boundary-ambiguity score in `0..=100`. Moon within half a degree of a
/// nakshatra edge and ascendant within half a degree of a sign edge each
/// cost five points.
pub fn confidence(moon_longitude: f64, ascendant_longitude: f64) -> u8 {
    let near_edge = |longitude: f64, span: f64| {
        let within = normalize_degrees(longitude) % span;
        within < BOUNDARY_MARGIN_DEG || within > span - BOUNDARY_MARGIN_DEG
    };

    let mut score: u8 = 100;
    if near_edge(moon_longitude, NAKSHATRA_SPAN) {
        score = score.saturating_sub(BOUNDARY_PENALTY);
    }
    if near_edge(ascendant_longitude, SIGN_SPAN) {
        score = score.saturating_sub(BOUNDARY_PENALTY);
    }
    score
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Rounded to 6 places, then wrapped so 359.9999997 becomes 0.
fn stored_longitude(value: f64) -> f64 {
    normalize_degrees(round6(value))
}

/// Orchestrates parsing, the ephemeris and classification for one chart.
pub struct ChartGenerator<E: Ephemeris> {
    ephemeris: Arc<E>,
}

impl<E: Ephemeris> Clone for ChartGenerator<E> {
    fn clone(&self) -> Self {
        Self {
            ephemeris: Arc::clone(&self.ephemeris),
        }
    }
}

impl<E: Ephemeris> ChartGenerator<E> {
    pub fn new(ephemeris: Arc<E>) -> Self {
        Self { ephemeris }
    }

    pub fn compute_positions(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
    ) -> Result<SiderealPositions, KundliError> {
        let houses = self
            .ephemeris
            .houses(julian_day, latitude, longitude, HouseSystem::Placidus)?;
        let ayanamsa = self.ephemeris.ayanamsa(julian_day)?;
        let sun = self
            .ephemeris
            .body_position(julian_day, Body::Sun, PositionFlags::SIDEREAL)?;
        let moon = self
            .ephemeris
            .body_position(julian_day, Body::Moon, PositionFlags::SIDEREAL)?;

        debug!(
            julian_day,
            ayanamsa,
            house_system = %houses.system.code(),
            "ephemeris positions resolved"
        );

        Ok(SiderealPositions {
            sun: normalize_degrees(sun),
            moon: normalize_degrees(moon),
            ascendant: normalize_degrees(houses.ascendant - ayanamsa),
        })
    }

    pub fn generate(&self, input: &BirthInput) -> Result<Chart, KundliError> {
        validate_coordinates(input.latitude, input.longitude)?;
        let instant = parse_local_datetime(&input.date, &input.time, &input.timezone)?;
        let julian_day = to_julian_day(self.ephemeris.as_ref(), instant)?;
        let positions = self.compute_positions(julian_day, input.latitude, input.longitude)?;

        // Signs and nakshatra come from the stored values.
        let longitudes = ChartLongitudes {
            sun: stored_longitude(positions.sun),
            moon: stored_longitude(positions.moon),
            ascendant: stored_longitude(positions.ascendant),
        };
        let (nakshatra, nakshatra_pada) = nakshatra_and_pada(longitudes.moon)?;

        Ok(Chart {
            sun_sign: zodiac_sign(longitudes.sun)?,
            moon_sign: zodiac_sign(longitudes.moon)?,
            ascendant: zodiac_sign(longitudes.ascendant)?,
            nakshatra,
            nakshatra_pada,
            ayanamsa: self.ephemeris.sidereal_mode(),
            planetary_longitudes: longitudes,
            metadata: ChartMetadata {
                calculation_time: instant,
                timezone: input.timezone.clone(),
                coordinates: Coordinates {
                    latitude: input.latitude,
                    longitude: input.longitude,
                },
            },
            confidence: confidence(longitudes.moon, longitudes.ascendant),
        })
    }
}
