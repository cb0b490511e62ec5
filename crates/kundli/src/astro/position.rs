//! Zodiac sign, nakshatra and pada classification of ecliptic longitudes.
//!
//! The circle is split into 12 signs of 30 degrees starting at 0 deg Aries,
//! and into 27 nakshatras of 13 deg 20' starting at 0 deg Ashwini. Each
//! nakshatra carries four padas of 3 deg 20'.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KundliError;

/// Span of one zodiac sign in degrees.
pub const SIGN_SPAN: f64 = 30.0;

/// Span of one nakshatra: 360/27 = 13.3333... degrees.
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Span of one pada: a quarter of a nakshatra.
pub const PADA_SPAN: f64 = NAKSHATRA_SPAN / 4.0;

/// Normalize an angle into `[0, 360)` degrees.
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// The twelve sidereal signs, Aries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    /// 0-based position in the zodiac (Aries = 0).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Sign at a 0-based index, wrapping past Pisces.
    pub const fn from_index(index: usize) -> Sign {
        Sign::ALL[index % 12]
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sign {
    type Err = KundliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Sign::ALL
            .iter()
            .copied()
            .find(|sign| sign.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| KundliError::InvalidInput(format!("Unknown zodiac sign: {raw}")))
    }
}

/// The 27 lunar mansions, Ashwini first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    #[serde(alias = "Mrigashirsha")]
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    #[serde(rename = "Purva Phalguni")]
    PurvaPhalguni,
    #[serde(rename = "Uttara Phalguni")]
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    #[serde(rename = "Purva Ashadha")]
    PurvaAshadha,
    #[serde(rename = "Uttara Ashadha")]
    UttaraAshadha,
    Shravana,
    #[serde(alias = "Dhanishtha")]
    Dhanishta,
    Shatabhisha,
    #[serde(rename = "Purva Bhadrapada")]
    PurvaBhadrapada,
    #[serde(rename = "Uttara Bhadrapada")]
    UttaraBhadrapada,
    Revati,
}

impl Nakshatra {
    pub const ALL: [Nakshatra; 27] = [
        Nakshatra::Ashwini,
        Nakshatra::Bharani,
        Nakshatra::Krittika,
        Nakshatra::Rohini,
        Nakshatra::Mrigashira,
        Nakshatra::Ardra,
        Nakshatra::Punarvasu,
        Nakshatra::Pushya,
        Nakshatra::Ashlesha,
        Nakshatra::Magha,
        Nakshatra::PurvaPhalguni,
        Nakshatra::UttaraPhalguni,
        Nakshatra::Hasta,
        Nakshatra::Chitra,
        Nakshatra::Swati,
        Nakshatra::Vishakha,
        Nakshatra::Anuradha,
        Nakshatra::Jyeshtha,
        Nakshatra::Mula,
        Nakshatra::PurvaAshadha,
        Nakshatra::UttaraAshadha,
        Nakshatra::Shravana,
        Nakshatra::Dhanishta,
        Nakshatra::Shatabhisha,
        Nakshatra::PurvaBhadrapada,
        Nakshatra::UttaraBhadrapada,
        Nakshatra::Revati,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Nakshatra::Ashwini => "Ashwini",
            Nakshatra::Bharani => "Bharani",
            Nakshatra::Krittika => "Krittika",
            Nakshatra::Rohini => "Rohini",
            Nakshatra::Mrigashira => "Mrigashira",
            Nakshatra::Ardra => "Ardra",
            Nakshatra::Punarvasu => "Punarvasu",
            Nakshatra::Pushya => "Pushya",
            Nakshatra::Ashlesha => "Ashlesha",
            Nakshatra::Magha => "Magha",
            Nakshatra::PurvaPhalguni => "Purva Phalguni",
            Nakshatra::UttaraPhalguni => "Uttara Phalguni",
            Nakshatra::Hasta => "Hasta",
            Nakshatra::Chitra => "Chitra",
            Nakshatra::Swati => "Swati",
            Nakshatra::Vishakha => "Vishakha",
            Nakshatra::Anuradha => "Anuradha",
            Nakshatra::Jyeshtha => "Jyeshtha",
            Nakshatra::Mula => "Mula",
            Nakshatra::PurvaAshadha => "Purva Ashadha",
            Nakshatra::UttaraAshadha => "Uttara Ashadha",
            Nakshatra::Shravana => "Shravana",
            Nakshatra::Dhanishta => "Dhanishta",
            Nakshatra::Shatabhisha => "Shatabhisha",
            Nakshatra::PurvaBhadrapada => "Purva Bhadrapada",
            Nakshatra::UttaraBhadrapada => "Uttara Bhadrapada",
            Nakshatra::Revati => "Revati",
        }
    }

    /// 0-based position in the nakshatra cycle (Ashwini = 0).
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Nakshatra {
        Nakshatra::ALL[index % 27]
    }
}

impl fmt::Display for Nakshatra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Nakshatra {
    type Err = KundliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        if wanted.eq_ignore_ascii_case("Mrigashirsha") {
            return Ok(Nakshatra::Mrigashira);
        }
        if wanted.eq_ignore_ascii_case("Dhanishtha") {
            return Ok(Nakshatra::Dhanishta);
        }
        Nakshatra::ALL
            .iter()
            .copied()
            .find(|nakshatra| nakshatra.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| KundliError::InvalidInput(format!("Unknown nakshatra: {raw}")))
    }
}

/// Quarter of a nakshatra, always within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pada(u8);

impl Pada {
    /// Build a pada, clamping into `1..=4`.
    pub fn clamped(raw: i64) -> Self {
        Pada(raw.clamp(1, 4) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pada {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn ensure_finite(longitude: f64, what: &str) -> Result<f64, KundliError> {
    if longitude.is_finite() {
        Ok(longitude)
    } else {
        Err(KundliError::InvalidInput(format!(
            "{what} must be a finite number of degrees, got {longitude}"
        )))
    }
}

/// 0-based sign index (`0..12`) of a longitude.
pub fn sign_index(longitude: f64) -> Result<usize, KundliError> {
    let normalized = normalize_degrees(ensure_finite(longitude, "Longitude")?);
    Ok((normalized / SIGN_SPAN).floor() as usize % 12)
}

/// Zodiac sign containing a longitude.
pub fn zodiac_sign(longitude: f64) -> Result<Sign, KundliError> {
    sign_index(longitude).map(Sign::from_index)
}

/// Nakshatra and pada of a Moon longitude.
pub fn nakshatra_and_pada(moon_longitude: f64) -> Result<(Nakshatra, Pada), KundliError> {
    let normalized = normalize_degrees(ensure_finite(moon_longitude, "Moon longitude")?);
    let index = (normalized / NAKSHATRA_SPAN).floor() as usize % 27;
    let within = normalized % NAKSHATRA_SPAN;
    let pada = Pada::clamped((within / PADA_SPAN).floor() as i64 + 1);
    Ok((Nakshatra::from_index(index), pada))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_stays_in_range() {
        for raw in [
            0.0, 45.0, 359.999, 360.0, 720.0, -0.0, -10.0, -360.0, -370.0, 1e9, -1e9, -1e-15,
        ] {
            let value = normalize_degrees(raw);
            assert!((0.0..360.0).contains(&value), "{raw} normalized to {value}");
        }
        assert!((normalize_degrees(-10.0) - 350.0).abs() < 1e-12);
        assert!((normalize_degrees(730.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn signs_partition_the_circle_from_aries() {
        assert_eq!(zodiac_sign(0.0).unwrap(), Sign::Aries);
        assert_eq!(zodiac_sign(29.999_999).unwrap(), Sign::Aries);
        assert_eq!(zodiac_sign(30.0).unwrap(), Sign::Taurus);
        assert_eq!(zodiac_sign(190.5).unwrap(), Sign::Libra);
        assert_eq!(zodiac_sign(359.9).unwrap(), Sign::Pisces);
        assert_eq!(zodiac_sign(360.0).unwrap(), Sign::Aries);
        assert_eq!(zodiac_sign(-15.0).unwrap(), Sign::Pisces);

        for (index, sign) in Sign::ALL.iter().enumerate() {
            let start = index as f64 * SIGN_SPAN;
            assert_eq!(zodiac_sign(start).unwrap(), *sign);
            assert_eq!(zodiac_sign(start + 29.5).unwrap(), *sign);
        }
    }

    #[test]
    fn non_finite_longitudes_are_rejected() {
        assert!(matches!(
            zodiac_sign(f64::NAN),
            Err(KundliError::InvalidInput(_))
        ));
        assert!(matches!(
            nakshatra_and_pada(f64::INFINITY),
            Err(KundliError::InvalidInput(_))
        ));
    }

    #[test]
    fn nakshatra_boundary_transitions_cleanly() {
        let (before, pada_before) = nakshatra_and_pada(NAKSHATRA_SPAN - 1e-9).unwrap();
        assert_eq!(before, Nakshatra::Ashwini);
        assert_eq!(pada_before.get(), 4);

        let (after, pada_after) = nakshatra_and_pada(NAKSHATRA_SPAN).unwrap();
        assert_eq!(after, Nakshatra::Bharani);
        assert_eq!(pada_after.get(), 1);

        let (wrapped, _) = nakshatra_and_pada(360.0).unwrap();
        assert_eq!(wrapped, Nakshatra::Ashwini);
    }

    #[test]
    fn nakshatras_tile_the_circle() {
        for (index, nakshatra) in Nakshatra::ALL.iter().enumerate() {
            let start = index as f64 * NAKSHATRA_SPAN;
            for (quarter, expected_pada) in (0..4).zip(1u8..=4) {
                let longitude = start + quarter as f64 * PADA_SPAN + PADA_SPAN / 2.0;
                let (found, pada) = nakshatra_and_pada(longitude).unwrap();
                assert_eq!(found, *nakshatra, "longitude {longitude}");
                assert_eq!(pada.get(), expected_pada, "longitude {longitude}");
            }
        }
    }

    #[test]
    fn pada_is_always_within_one_to_four() {
        let mut longitude = -720.0;
        while longitude < 720.0 {
            let (_, pada) = nakshatra_and_pada(longitude).unwrap();
            assert!((1..=4).contains(&pada.get()));
            longitude += 0.37;
        }
    }

    #[test]
    fn parses_names_case_insensitively_with_aliases() {
        assert_eq!("  scorpio ".parse::<Sign>().unwrap(), Sign::Scorpio);
        assert_eq!(
            "purva phalguni".parse::<Nakshatra>().unwrap(),
            Nakshatra::PurvaPhalguni
        );
        assert_eq!(
            "Mrigashirsha".parse::<Nakshatra>().unwrap(),
            Nakshatra::Mrigashira
        );
        assert!("Ophiuchus".parse::<Sign>().is_err());
        assert!("Abhijit".parse::<Nakshatra>().is_err());
    }

    #[test]
    fn serializes_display_names() {
        assert_eq!(
            serde_json::to_value(Nakshatra::UttaraBhadrapada).unwrap(),
            serde_json::json!("Uttara Bhadrapada")
        );
        assert_eq!(
            serde_json::to_value(Sign::Sagittarius).unwrap(),
            serde_json::json!("Sagittarius")
        );
        let parsed: Nakshatra = serde_json::from_str("\"Mrigashirsha\"").unwrap();
        assert_eq!(parsed, Nakshatra::Mrigashira);
    }
}
