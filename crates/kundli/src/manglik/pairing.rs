use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use super::detector::{ManglikDetector, ManglikResult, PlanetaryLongitudes};
use crate::error::KundliError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManglikCompatibilityRequest {
    pub person1_longitudes: PlanetaryLongitudes,
    pub person2_longitudes: PlanetaryLongitudes,
}

/// How the Manglik status of two partners combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingOutcome {
    /// Ubhaya Manglik: the doshas cancel each other.
    BothManglik,
    NeitherManglik,
    OnlyFirst,
    OnlySecond,
}

impl PairingOutcome {
    pub fn classify(first: bool, second: bool) -> Self {
        match (first, second) {
            (true, true) => PairingOutcome::BothManglik,
            (false, false) => PairingOutcome::NeitherManglik,
            (true, false) => PairingOutcome::OnlyFirst,
            (false, true) => PairingOutcome::OnlySecond,
        }
    }

    pub fn is_compatible(self) -> bool {
        matches!(self, PairingOutcome::BothManglik | PairingOutcome::NeitherManglik)
    }

    pub const fn label(self) -> &'static str {
        match self {
            PairingOutcome::BothManglik => "Ubhaya Manglik (Both Manglik)",
            PairingOutcome::NeitherManglik => "No Manglik Dosha",
            PairingOutcome::OnlyFirst | PairingOutcome::OnlySecond => "Partial Manglik",
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            PairingOutcome::BothManglik => "Both partners have Manglik Dosha - mutual cancellation",
            PairingOutcome::NeitherManglik => "Neither partner has Manglik Dosha",
            PairingOutcome::OnlyFirst => "Only one partner (person 1) has Manglik Dosha",
            PairingOutcome::OnlySecond => "Only one partner (person 2) has Manglik Dosha",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            PairingOutcome::BothManglik => "Favorable per Parashara. Consult Jyotishi for muhurta.",
            PairingOutcome::NeitherManglik => "No Manglik concerns.",
            PairingOutcome::OnlyFirst | PairingOutcome::OnlySecond => {
                "Perform Kumbh Vivah or remedies. Consult Jyotishi."
            }
        }
    }
}

impl Serialize for PairingOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManglikCompatibility {
    pub compatible: bool,
    pub compatibility_type: PairingOutcome,
    pub reason: &'static str,
    pub person1_analysis: ManglikResult,
    pub person2_analysis: ManglikResult,
    pub recommendation: &'static str,
}

impl ManglikCompatibility {
    pub fn from_results(person1: ManglikResult, person2: ManglikResult) -> Self {
        let outcome = PairingOutcome::classify(person1.is_manglik, person2.is_manglik);
        Self {
            compatible: outcome.is_compatible(),
            compatibility_type: outcome,
            reason: outcome.reason(),
            person1_analysis: person1,
            person2_analysis: person2,
            recommendation: outcome.recommendation(),
        }
    }
}

impl ManglikDetector {
    /// Runs detection on both partners and combines the verdicts.
    pub fn pair(
        &self,
        person1: &PlanetaryLongitudes,
        person2: &PlanetaryLongitudes,
    ) -> Result<ManglikCompatibility, KundliError> {
        let first = self.detect(person1)?;
        let second = self.detect(person2)?;
        let pairing = ManglikCompatibility::from_results(first, second);

        info!(
            outcome = pairing.compatibility_type.label(),
            compatible = pairing.compatible,
            "manglik pairing evaluated"
        );

        Ok(pairing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_table() {
        assert!(PairingOutcome::classify(true, true).is_compatible());
        assert!(PairingOutcome::classify(false, false).is_compatible());
        assert!(!PairingOutcome::classify(true, false).is_compatible());
        assert_eq!(PairingOutcome::classify(false, true), PairingOutcome::OnlySecond);
        assert_eq!(PairingOutcome::OnlyFirst.label(), PairingOutcome::OnlySecond.label());
    }

    #[test]
    fn serialises_as_label() {
        let json = serde_json::to_value(PairingOutcome::BothManglik).unwrap();
        assert_eq!(json, "Ubhaya Manglik (Both Manglik)");
    }
}
