//! Swiss Ephemeris backend.
//!
//! Without a data directory the engine runs on its built-in Moshier theory,
//! which needs no files. With one it reads the `.se1` files found there.

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use swisseph::swe::{calc_ut, houses_ex, julday};
use swisseph::{AscMc, Cusp};

use super::{Body, Ephemeris, EphemerisError, HouseCusps, HouseSystem, PositionFlags, SiderealMode};
use crate::astro::position::normalize_degrees;

const SE_GREG_CAL: u32 = 1;
const SEFLG_SWIEPH: i32 = 2;
const SEFLG_MOSEPH: i32 = 4;
const SEFLG_SIDEREAL: i32 = 64 * 1024;

/// Roughly 90 deg minus the obliquity; Placidus has no solution beyond it.
const POLAR_LATITUDE_DEG: f64 = 66.5;

/// The C library keeps the data path and sidereal mode in process globals.
static ENGINE: Mutex<()> = Mutex::new(());

mod ffi {
    use std::os::raw::{c_char, c_double, c_int};

    extern "C" {
        pub fn swe_set_ephe_path(path: *const c_char);
        pub fn swe_set_sid_mode(sid_mode: c_int, t0: c_double, ayan_t0: c_double);
        pub fn swe_get_ayanamsa_ut(tjd_ut: c_double) -> c_double;
    }
}

fn engine() -> MutexGuard<'static, ()> {
    ENGINE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, EphemerisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EphemerisError::NonFinite { quantity, value })
    }
}

impl SiderealMode {
    /// `SE_SIDM_*` constant of the mode.
    pub const fn swe_code(self) -> i32 {
        match self {
            SiderealMode::FaganBradley => 0,
            SiderealMode::Lahiri => 1,
            SiderealMode::Raman => 3,
            SiderealMode::Krishnamurti => 5,
        }
    }
}

impl Body {
    const fn swe_code(self) -> u32 {
        match self {
            Body::Sun => 0,
            Body::Moon => 1,
        }
    }
}

/// Swiss Ephemeris with a sidereal mode fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SwissEphemeris {
    mode: SiderealMode,
    data_flag: i32,
    data_path: Option<PathBuf>,
}

impl SwissEphemeris {
    /// Uses the built-in Moshier theory.
    pub fn builtin(mode: SiderealMode) -> Self {
        Self {
            mode,
            data_flag: SEFLG_MOSEPH,
            data_path: None,
        }
    }

    /// Reads Swiss Ephemeris data files from `path`.
    pub fn with_data_path(mode: SiderealMode, path: impl Into<PathBuf>) -> Result<Self, EphemerisError> {
        let path = path.into();
        let invalid = || EphemerisError::DataPath {
            path: path.display().to_string(),
        };
        if !path.is_dir() {
            return Err(invalid());
        }
        let c_path = CString::new(path.to_string_lossy().as_bytes()).map_err(|_| invalid())?;

        let _engine = engine();
        // SAFETY: the pointer is a valid NUL-terminated string for the call and
        // the library copies it; the engine lock serialises global state.
        unsafe { ffi::swe_set_ephe_path(c_path.as_ptr()) };

        Ok(Self {
            mode,
            data_flag: SEFLG_SWIEPH,
            data_path: Some(path),
        })
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Caller must hold the engine lock.
    fn select_sidereal_mode(&self) {
        // SAFETY: plain value arguments; the engine lock is held by the caller.
        unsafe { ffi::swe_set_sid_mode(self.mode.swe_code(), 0.0, 0.0) };
    }
}

impl Default for SwissEphemeris {
    fn default() -> Self {
        Self::builtin(SiderealMode::Lahiri)
    }
}

impl Ephemeris for SwissEphemeris {
    fn sidereal_mode(&self) -> SiderealMode {
        self.mode
    }

    fn julian_day(&self, year: i32, month: u32, day: u32, hour_utc: f64) -> Result<f64, EphemerisError> {
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(EphemerisError::InvalidDate { year, month, day });
        }
        let hour = finite("hour", hour_utc)?;
        let jd = julday(year, month as i32, day as i32, hour, SE_GREG_CAL);
        finite("julian day", jd)
    }

    fn houses(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError> {
        let jd = finite("julian day", julian_day)?;
        let lat = finite("latitude", latitude)?;
        let lon = finite("longitude", longitude)?;

        let system = match system {
            HouseSystem::Placidus if lat.abs() > POLAR_LATITUDE_DEG => HouseSystem::Porphyry,
            requested => requested,
        };

        let (raw_cusps, raw_angles) = {
            let _engine = engine();
            houses_ex(jd, self.data_flag, lat, lon, system.code() as i32)
        };
        let cusps = Cusp::from_array(raw_cusps);
        let angles = AscMc::from_array(raw_angles);

        let ordered = [
            cusps.first,
            cusps.second,
            cusps.third,
            cusps.fourth,
            cusps.fifth,
            cusps.sixth,
            cusps.seventh,
            cusps.eighth,
            cusps.ninth,
            cusps.tenth,
            cusps.eleventh,
            cusps.twelfth,
        ];
        let mut normalized = [0.0; 12];
        for (slot, cusp) in normalized.iter_mut().zip(ordered) {
            *slot = normalize_degrees(finite("house cusp", cusp)?);
        }

        Ok(HouseCusps {
            system,
            cusps: normalized,
            ascendant: normalize_degrees(finite("ascendant", angles.ascendant)?),
            mc: normalize_degrees(finite("midheaven", angles.mc)?),
        })
    }

    fn ayanamsa(&self, julian_day: f64) -> Result<f64, EphemerisError> {
        let jd = finite("julian day", julian_day)?;
        let value = {
            let _engine = engine();
            self.select_sidereal_mode();
            // SAFETY: plain value argument; the engine lock is held.
            unsafe { ffi::swe_get_ayanamsa_ut(jd) }
        };
        finite("ayanamsa", value)
    }

    fn body_position(&self, julian_day: f64, body: Body, flags: PositionFlags) -> Result<f64, EphemerisError> {
        let jd = finite("julian day", julian_day)?;
        let mut iflag = self.data_flag;

        let result = {
            let _engine = engine();
            if flags.sidereal {
                self.select_sidereal_mode();
                iflag |= SEFLG_SIDEREAL;
            }
            calc_ut(jd, body.swe_code(), iflag as u32)
        }
        .map_err(|err| EphemerisError::Engine {
            message: err.to_string(),
        })?;

        Ok(normalize_degrees(finite("longitude", result.out[0])?))
    }
}
