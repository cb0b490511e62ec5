//! Ashta-Koota (eight factor, 36 point) marriage compatibility.

mod rules;
pub mod tables;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::astro::position::{Nakshatra, Sign};
use crate::error::KundliError;

pub use tables::{natural_relationship, rashi_lord, Gana, Nadi, Planet, Relationship, Varna, Yoni};

pub const MAX_GUNAS: u8 = 36;
pub const GOOD_MATCH_THRESHOLD: u8 = 18;

/// Moon sign and nakshatra: everything the scorer needs from a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityProfile {
    pub moon_sign: Sign,
    pub nakshatra: Nakshatra,
}

/// Unvalidated profile as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub moon_sign: String,
    pub nakshatra: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    pub bride: ProfileInput,
    pub groom: ProfileInput,
}

impl CompatibilityRequest {
    /// Validates both profiles, naming the first offending field.
    pub fn parse(&self) -> Result<(CompatibilityProfile, CompatibilityProfile), KundliError> {
        let field = |role: &str, what: &str, raw: &str| {
            KundliError::invalid(format!("Invalid {role} {what}: {raw}"))
        };

        let bride_nakshatra = self
            .bride
            .nakshatra
            .parse::<Nakshatra>()
            .map_err(|_| field("Bride", "Nakshatra", &self.bride.nakshatra))?;
        let groom_nakshatra = self
            .groom
            .nakshatra
            .parse::<Nakshatra>()
            .map_err(|_| field("Groom", "Nakshatra", &self.groom.nakshatra))?;
        let bride_sign = self
            .bride
            .moon_sign
            .parse::<Sign>()
            .map_err(|_| field("Bride", "Moon Sign", &self.bride.moon_sign))?;
        let groom_sign = self
            .groom
            .moon_sign
            .parse::<Sign>()
            .map_err(|_| field("Groom", "Moon Sign", &self.groom.moon_sign))?;

        Ok((
            CompatibilityProfile {
                moon_sign: bride_sign,
                nakshatra: bride_nakshatra,
            },
            CompatibilityProfile {
                moon_sign: groom_sign,
                nakshatra: groom_nakshatra,
            },
        ))
    }
}

/// The eight kootas in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Koota {
    Varna,
    Vashya,
    Tara,
    Yoni,
    #[serde(rename = "Graha Maitri")]
    GrahaMaitri,
    Gana,
    Bhakoot,
    Nadi,
}

impl Koota {
    pub const ALL: [Koota; 8] = [
        Koota::Varna,
        Koota::Vashya,
        Koota::Tara,
        Koota::Yoni,
        Koota::GrahaMaitri,
        Koota::Gana,
        Koota::Bhakoot,
        Koota::Nadi,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Koota::Varna => "Varna",
            Koota::Vashya => "Vashya",
            Koota::Tara => "Tara",
            Koota::Yoni => "Yoni",
            Koota::GrahaMaitri => "Graha Maitri",
            Koota::Gana => "Gana",
            Koota::Bhakoot => "Bhakoot",
            Koota::Nadi => "Nadi",
        }
    }

    /// Highest points the koota can award. Totals 36 across all eight.
    pub const fn max_points(self) -> u8 {
        match self {
            Koota::Varna => 1,
            Koota::Vashya => 2,
            Koota::Tara => 3,
            Koota::Yoni => 4,
            Koota::GrahaMaitri => 5,
            Koota::Gana => 6,
            Koota::Bhakoot => 7,
            Koota::Nadi => 8,
        }
    }
}

/// Per-koota points, serialised under the classical names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KootaBreakdown {
    #[serde(rename = "Varna")]
    pub varna: u8,
    #[serde(rename = "Vashya")]
    pub vashya: u8,
    #[serde(rename = "Tara")]
    pub tara: u8,
    #[serde(rename = "Yoni")]
    pub yoni: u8,
    #[serde(rename = "Graha Maitri")]
    pub graha_maitri: u8,
    #[serde(rename = "Gana")]
    pub gana: u8,
    #[serde(rename = "Bhakoot")]
    pub bhakoot: u8,
    #[serde(rename = "Nadi")]
    pub nadi: u8,
}

impl KootaBreakdown {
    pub fn get(&self, koota: Koota) -> u8 {
        match koota {
            Koota::Varna => self.varna,
            Koota::Vashya => self.vashya,
            Koota::Tara => self.tara,
            Koota::Yoni => self.yoni,
            Koota::GrahaMaitri => self.graha_maitri,
            Koota::Gana => self.gana,
            Koota::Bhakoot => self.bhakoot,
            Koota::Nadi => self.nadi,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (Koota, u8)> + '_ {
        Koota::ALL.into_iter().map(move |koota| (koota, self.get(koota)))
    }

    pub fn total(&self) -> u8 {
        self.entries().map(|(_, points)| points).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Good,
    Low,
}

impl Verdict {
    pub fn for_total(total: u8) -> Self {
        if total >= GOOD_MATCH_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityResult {
    pub total_gunas: u8,
    pub max_gunas: u8,
    pub breakdown: KootaBreakdown,
    pub verdict: Verdict,
}

/// Stateless Ashta-Koota scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityScorer;

impl CompatibilityScorer {
    pub fn score(&self, bride: &CompatibilityProfile, groom: &CompatibilityProfile) -> CompatibilityResult {
        let breakdown = rules::score_profiles(bride, groom);
        let total_gunas = breakdown.total();
        let verdict = Verdict::for_total(total_gunas);

        info!(total_gunas, ?verdict, "ashta-koota scored");

        CompatibilityResult {
            total_gunas,
            max_gunas: MAX_GUNAS,
            breakdown,
            verdict,
        }
    }

    pub fn score_request(&self, request: &CompatibilityRequest) -> Result<CompatibilityResult, KundliError> {
        let (bride, groom) = request.parse()?;
        Ok(self.score(&bride, &groom))
    }
}
