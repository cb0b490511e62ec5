//! Manglik (Kuja) Dosha detection on the whole-sign house system.
//!
//! Mars is placed by sign relative to the ascendant and, optionally, the
//! Moon. Placement in houses 1, 2, 4, 7, 8 or 12 from either reference is
//! afflicting; classical cancellation factors then soften the verdict.

mod cancellation;
mod detector;
mod pairing;

pub use cancellation::Cancellation;
pub use detector::{
    house_from_reference, house_weight, DoshaStrength, ManglikDetector, ManglikRequest,
    ManglikResult, PlanetaryLongitudes, Severity, MANGLIK_HOUSES, SYSTEM_NAME,
};
pub use pairing::{ManglikCompatibility, ManglikCompatibilityRequest, PairingOutcome};
