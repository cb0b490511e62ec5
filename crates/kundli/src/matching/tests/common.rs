use crate::astro::position::{Nakshatra, Sign};
use crate::matching::{CompatibilityProfile, CompatibilityRequest, ProfileInput};

pub(super) fn profile(moon_sign: Sign, nakshatra: Nakshatra) -> CompatibilityProfile {
    CompatibilityProfile {
        moon_sign,
        nakshatra,
    }
}

pub(super) fn request(bride: (&str, &str), groom: (&str, &str)) -> CompatibilityRequest {
    CompatibilityRequest {
        bride: ProfileInput {
            moon_sign: bride.0.to_string(),
            nakshatra: bride.1.to_string(),
        },
        groom: ProfileInput {
            moon_sign: groom.0.to_string(),
            nakshatra: groom.1.to_string(),
        },
    }
}
