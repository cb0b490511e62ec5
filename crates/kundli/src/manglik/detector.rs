use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::cancellation::{cancellations, Cancellation, CancellationInputs};
use crate::astro::position::{sign_index, Sign};
use crate::error::KundliError;

/// Planet or reference point name (`mars`, `ascendant`, `moon`, ...) to
/// sidereal longitude in degrees.
pub type PlanetaryLongitudes = BTreeMap<String, f64>;

pub const SYSTEM_NAME: &str = "Parashara (Parashari)";

/// Houses from which Mars produces the dosha.
pub const MANGLIK_HOUSES: [u8; 6] = [1, 2, 4, 7, 8, 12];

/// Severity weight of Mars in a house; zero outside [`MANGLIK_HOUSES`].
pub const fn house_weight(house: u8) -> u8 {
    match house {
        7 => 5,
        8 => 4,
        1 | 4 => 3,
        2 | 12 => 2,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    None,
    Mild,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        match score {
            5.. => Severity::VeryHigh,
            4 => Severity::High,
            3 => Severity::Medium,
            2 => Severity::Low,
            1 => Severity::Mild,
            0 => Severity::None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Mild => "Mild",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::VeryHigh => "Very High",
        }
    }
}

/// Severity left after cancellations are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoshaStrength {
    #[serde(rename = "No Dosha")]
    NoDosha,
    #[serde(rename = "Fully Cancelled")]
    FullyCancelled,
    Negligible,
    Weak,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl DoshaStrength {
    /// Each cancellation removes 1.5 points of severity.
    pub fn evaluate(severity_score: u8, cancellation_count: usize) -> Self {
        if severity_score == 0 {
            return DoshaStrength::NoDosha;
        }
        let effective = f64::from(severity_score) - 1.5 * cancellation_count as f64;
        if effective <= 0.0 {
            DoshaStrength::FullyCancelled
        } else if effective <= 1.0 {
            DoshaStrength::Negligible
        } else if effective <= 2.0 {
            DoshaStrength::Weak
        } else if effective <= 3.0 {
            DoshaStrength::Moderate
        } else if effective <= 4.0 {
            DoshaStrength::Strong
        } else {
            DoshaStrength::VeryStrong
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DoshaStrength::NoDosha => "No Dosha",
            DoshaStrength::FullyCancelled => "Fully Cancelled",
            DoshaStrength::Negligible => "Negligible",
            DoshaStrength::Weak => "Weak",
            DoshaStrength::Moderate => "Moderate",
            DoshaStrength::Strong => "Strong",
            DoshaStrength::VeryStrong => "Very Strong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManglikResult {
    pub is_manglik: bool,
    pub system: &'static str,
    pub mars_house_from_lagna: u8,
    pub mars_house_from_moon: Option<u8>,
    pub is_manglik_from_lagna: bool,
    pub is_manglik_from_moon: bool,
    pub mars_sign: Sign,
    /// 1 for Aries through 12 for Pisces.
    pub mars_rashi_number: u8,
    pub mars_longitude: f64,
    /// Mars in Cancer. Reported only; severity is not raised.
    pub mars_debilitated: bool,
    pub severity: Severity,
    pub severity_score: u8,
    pub explanation: String,
    pub cancellations: Vec<Cancellation>,
    pub is_cancelled: bool,
    pub dosha_strength: DoshaStrength,
    pub recommendation: String,
}

/// Body of a single detection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManglikRequest {
    pub planetary_longitudes: PlanetaryLongitudes,
    /// Overrides the detector default when present.
    #[serde(default)]
    pub check_from_moon: Option<bool>,
}

/// Whole-sign house (1..=12) of a planet counted from a reference point.
pub fn house_from_reference(planet_longitude: f64, reference_longitude: f64) -> Result<u8, KundliError> {
    let planet = sign_index(planet_longitude)?;
    let reference = sign_index(reference_longitude)?;
    Ok(((planet + 12 - reference) % 12) as u8 + 1)
}

fn required(longitudes: &PlanetaryLongitudes, field: &'static str) -> Result<f64, KundliError> {
    longitudes
        .get(field)
        .copied()
        .ok_or(KundliError::MissingField { field })
}

fn optional_sign(longitudes: &PlanetaryLongitudes, key: &str) -> Result<Option<Sign>, KundliError> {
    longitudes
        .get(key)
        .map(|&longitude| sign_index(longitude).map(Sign::from_index))
        .transpose()
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn bhava_description(house: u8) -> String {
    match house {
        1 => "1st house (Tanu Bhava): Affects self, personality, health, and physical appearance. May cause aggression".to_string(),
        2 => "2nd house (Dhana Bhava): Affects family relations, wealth, speech. May cause family disputes".to_string(),
        4 => "4th house (Sukha Bhava): Affects mother, happiness, property, vehicles. May disturb domestic peace".to_string(),
        7 => "7th house (Kalatra Bhava): Direct effect on spouse and marriage. Strongest Manglik position per Parashara".to_string(),
        8 => "8th house (Ayu Bhava): Affects longevity, sudden events, transformation. Strong dosha position".to_string(),
        12 => "12th house (Vyaya Bhava): Affects expenses, bed pleasures, foreign travels. May impact marital intimacy".to_string(),
        other => format!("{} house", ordinal(other)),
    }
}

fn explanation(from_lagna: u8, from_moon: Option<u8>, afflicted_lagna: bool, afflicted_moon: bool) -> String {
    if !afflicted_lagna && !afflicted_moon {
        return format!(
            "Mars is in {} house from Lagna. According to Parashara system, no Manglik Dosha detected.",
            ordinal(from_lagna)
        );
    }

    let mut parts = Vec::new();
    if afflicted_lagna {
        parts.push(format!("Mars in {} from Lagna (Ascendant)", bhava_description(from_lagna)));
    }
    if let (true, Some(house)) = (afflicted_moon, from_moon) {
        parts.push(format!("Mars in {} from Chandra (Moon)", bhava_description(house)));
    }
    format!("{}. Parashara considers this a Manglik position.", parts.join(". "))
}

const REMEDIES: [&str; 8] = [
    "Parashara remedies for Manglik Dosha:",
    "1. Marriage with another Manglik native (mutual cancellation)",
    "2. Kumbh Vivah ritual before actual marriage",
    "3. Fast on Tuesdays and offer water to Peepal tree",
    "4. Recite Mangal Stotra or Hanuman Chalisa daily",
    "5. Donate red items (clothes, lentils) on Tuesdays",
    "6. Worship Lord Hanuman or Kartikeya",
    "7. Wear red coral gemstone (after astrological consultation)",
];

fn recommendation(is_manglik: bool, cancellation_count: usize, debilitated: bool) -> String {
    if !is_manglik {
        return "No Manglik Dosha detected per Parashara system. Mars is favorably placed.".to_string();
    }
    match cancellation_count {
        0 => {
            let mut lines = REMEDIES.to_vec();
            if debilitated {
                lines.push("Note: Mars debilitated in Cancer increases dosha intensity");
            }
            format!(
                "{}. Always consult an experienced Jyotishi for personalized guidance and muhurta selection.",
                lines.join(" ")
            )
        }
        1 => "Manglik Dosha present with some cancellation factors. Parashara recommends: Match with another Manglik native, perform remedies like Kumbh Vivah, observe Tuesday fasts, recite Hanuman Chalisa, or donate red items. Consult a Jyotishi for personalized remedies.".to_string(),
        _ => "Manglik Dosha present but significantly cancelled by multiple factors. Effects are greatly reduced. Consult a qualified Jyotishi (Vedic astrologer) for personalized guidance.".to_string(),
    }
}

/// Whole-sign Manglik Dosha detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManglikDetector {
    check_from_moon: bool,
}

impl Default for ManglikDetector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ManglikDetector {
    pub fn new(check_from_moon: bool) -> Self {
        Self { check_from_moon }
    }

    /// Applies a per-request Moon override.
    pub fn with_moon_check(self, check_from_moon: Option<bool>) -> Self {
        Self {
            check_from_moon: check_from_moon.unwrap_or(self.check_from_moon),
        }
    }

    pub fn detect(&self, longitudes: &PlanetaryLongitudes) -> Result<ManglikResult, KundliError> {
        let mars = required(longitudes, "mars")?;
        let ascendant = required(longitudes, "ascendant")?;
        let moon = if self.check_from_moon {
            longitudes.get("moon").copied()
        } else {
            None
        };

        let mars_index = sign_index(mars)?;
        let mars_sign = Sign::from_index(mars_index);

        let from_lagna = house_from_reference(mars, ascendant)?;
        let from_moon = moon.map(|moon| house_from_reference(mars, moon)).transpose()?;

        let afflicted_lagna = MANGLIK_HOUSES.contains(&from_lagna);
        let afflicted_moon = from_moon.map(|house| MANGLIK_HOUSES.contains(&house));
        let is_manglik = afflicted_lagna || afflicted_moon.unwrap_or(false);

        let severity_score = if is_manglik {
            house_weight(from_lagna).max(from_moon.map(house_weight).unwrap_or(0))
        } else {
            0
        };

        let found = cancellations(&CancellationInputs {
            mars_sign,
            afflicted_from_lagna: afflicted_lagna,
            afflicted_from_moon: afflicted_moon,
            jupiter_sign: optional_sign(longitudes, "jupiter")?,
            venus_sign: optional_sign(longitudes, "venus")?,
        });

        let mars_debilitated = mars_sign == Sign::Cancer;
        let dosha_strength = DoshaStrength::evaluate(severity_score, found.len());

        let result = ManglikResult {
            is_manglik,
            system: SYSTEM_NAME,
            mars_house_from_lagna: from_lagna,
            mars_house_from_moon: from_moon,
            is_manglik_from_lagna: afflicted_lagna,
            is_manglik_from_moon: afflicted_moon.unwrap_or(false),
            mars_sign,
            mars_rashi_number: mars_index as u8 + 1,
            mars_longitude: (mars * 100.0).round() / 100.0,
            mars_debilitated,
            severity: Severity::from_score(severity_score),
            severity_score,
            explanation: explanation(
                from_lagna,
                from_moon,
                afflicted_lagna,
                afflicted_moon.unwrap_or(false),
            ),
            is_cancelled: !found.is_empty(),
            recommendation: recommendation(is_manglik, found.len(), mars_debilitated),
            cancellations: found,
            dosha_strength,
        };

        info!(
            is_manglik,
            severity = result.severity.label(),
            strength = dosha_strength.label(),
            "manglik dosha evaluated"
        );

        Ok(result)
    }

    /// Detects each chart independently; one failure does not stop the rest.
    pub fn detect_many(&self, charts: &[PlanetaryLongitudes]) -> Vec<Result<ManglikResult, KundliError>> {
        charts.iter().map(|longitudes| self.detect(longitudes)).collect()
    }
}
