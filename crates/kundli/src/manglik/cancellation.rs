use std::fmt;

use serde::{Serialize, Serializer};

use crate::astro::position::Sign;

/// Classical factor that weakens a Manglik placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    /// Mars in Aries or Scorpio.
    Swakshetra(Sign),
    /// Mars in Capricorn.
    Uccha,
    /// Mars in Leo, Sagittarius or Pisces.
    MitraRashi(Sign),
    PartialFromLagnaOnly,
    PartialFromMoonOnly,
    /// Jupiter in the same sign as Mars.
    GuruYukti,
    /// Venus in the same sign as Mars.
    ShukraYukti,
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cancellation::Swakshetra(sign) => write!(
                f,
                "Swakshetra: Mars in own sign ({sign}) - significantly reduces dosha per Parashara"
            ),
            Cancellation::Uccha => f.write_str(
                "Uccha: Mars exalted in Capricorn - greatly reduces dosha effects (Parashara principle)",
            ),
            Cancellation::MitraRashi(sign) => write!(
                f,
                "Mitra Rashi: Mars in friendly sign ({sign}) - reduces dosha intensity"
            ),
            Cancellation::PartialFromLagnaOnly => f.write_str(
                "Partial Dosha: Mars creates dosha only from Lagna, not from Moon - reduces intensity",
            ),
            Cancellation::PartialFromMoonOnly => f.write_str(
                "Partial Dosha: Mars creates dosha only from Moon, not from Lagna - reduces intensity",
            ),
            Cancellation::GuruYukti => f.write_str(
                "Guru Yukti: Mars conjunct Jupiter - benefic influence reduces dosha (Parashara)",
            ),
            Cancellation::ShukraYukti => {
                f.write_str("Shukra Yukti: Mars conjunct Venus - reduces dosha intensity")
            }
        }
    }
}

impl Serialize for Cancellation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Facts the cancellation rules look at.
pub(crate) struct CancellationInputs {
    pub mars_sign: Sign,
    pub afflicted_from_lagna: bool,
    /// `None` when the Moon was not checked.
    pub afflicted_from_moon: Option<bool>,
    pub jupiter_sign: Option<Sign>,
    pub venus_sign: Option<Sign>,
}

/// Every applicable cancellation, in evaluation order. Rules are independent
/// of each other and of whether the chart is afflicted at all.
pub(crate) fn cancellations(inputs: &CancellationInputs) -> Vec<Cancellation> {
    let mut found = Vec::new();
    let mars = inputs.mars_sign;

    if matches!(mars, Sign::Aries | Sign::Scorpio) {
        found.push(Cancellation::Swakshetra(mars));
    }
    if mars == Sign::Capricorn {
        found.push(Cancellation::Uccha);
    }
    if matches!(mars, Sign::Leo | Sign::Sagittarius | Sign::Pisces) {
        found.push(Cancellation::MitraRashi(mars));
    }

    match (inputs.afflicted_from_lagna, inputs.afflicted_from_moon) {
        (true, Some(false)) => found.push(Cancellation::PartialFromLagnaOnly),
        (false, Some(true)) => found.push(Cancellation::PartialFromMoonOnly),
        _ => {}
    }

    if inputs.jupiter_sign == Some(mars) {
        found.push(Cancellation::GuruYukti);
    }
    if inputs.venus_sign == Some(mars) {
        found.push(Cancellation::ShukraYukti);
    }

    found
}
