use super::tables::{
    gana, nadi, natural_relationship, rashi_lord, varna, vashya_controls, yoni,
    yonis_are_enemies, Gana, Relationship,
};
use super::{CompatibilityProfile, KootaBreakdown};
use crate::astro::position::{Nakshatra, Sign};

/// Tara distances (mod 9) that fall on Janma, Vipat, Pratyak or Naidhana.
const BAD_TARAS: [usize; 4] = [0, 2, 4, 6];

/// Sign distances forming the 2/12, 5/9 and 6/8 axes.
const BHAKOOT_DOSHA_DISTANCES: [usize; 6] = [1, 11, 4, 8, 5, 7];

pub(crate) fn varna_score(bride: Sign, groom: Sign) -> u8 {
    if varna(groom) >= varna(bride) {
        1
    } else {
        0
    }
}

pub(crate) fn vashya_score(bride: Sign, groom: Sign) -> u8 {
    if bride == groom || vashya_controls(groom).contains(&bride) {
        2
    } else {
        0
    }
}

/// Nakshatra count from bride to groom, reduced to a tara.
pub(crate) fn tara_score(bride: Nakshatra, groom: Nakshatra) -> u8 {
    let count = (groom.index() + 27 - bride.index()) % 27;
    if BAD_TARAS.contains(&(count % 9)) {
        0
    } else {
        3
    }
}

pub(crate) fn yoni_score(bride: Nakshatra, groom: Nakshatra) -> u8 {
    if yonis_are_enemies(yoni(bride), yoni(groom)) {
        0
    } else {
        4
    }
}

/// Graha Maitri points and whether the lords count as friendly, which
/// later cancels a Bhakoot dosha.
pub(crate) fn graha_maitri_score(bride: Sign, groom: Sign) -> (u8, bool) {
    let bride_lord = rashi_lord(bride);
    let groom_lord = rashi_lord(groom);
    if bride_lord == groom_lord {
        return (5, true);
    }

    use Relationship::*;
    let bride_to_groom = natural_relationship(bride_lord, groom_lord);
    let groom_to_bride = natural_relationship(groom_lord, bride_lord);
    match (bride_to_groom, groom_to_bride) {
        (Friend, Friend) => (5, true),
        (Friend, Neutral) | (Neutral, Friend) => (4, true),
        (Neutral, Neutral) => (3, false),
        (Neutral, Enemy) | (Enemy, Neutral) => (2, false),
        _ => (0, false),
    }
}

pub(crate) fn gana_score(bride: Nakshatra, groom: Nakshatra) -> u8 {
    use Gana::*;
    match (gana(bride), gana(groom)) {
        (a, b) if a == b => 6,
        (Deva, Manushya) | (Manushya, Deva) => 5,
        (Manushya, Rakshasa) | (Rakshasa, Manushya) => 1,
        _ => 0,
    }
}

pub(crate) fn bhakoot_score(bride: Sign, groom: Sign, lords_friendly: bool) -> u8 {
    let distance = (groom.index() + 12 - bride.index()) % 12;
    if BHAKOOT_DOSHA_DISTANCES.contains(&distance) && !lords_friendly {
        0
    } else {
        7
    }
}

pub(crate) fn nadi_score(bride: Nakshatra, groom: Nakshatra) -> u8 {
    if nadi(bride) == nadi(groom) {
        0
    } else {
        8
    }
}

pub(crate) fn score_profiles(bride: &CompatibilityProfile, groom: &CompatibilityProfile) -> KootaBreakdown {
    let (graha_maitri, lords_friendly) = graha_maitri_score(bride.moon_sign, groom.moon_sign);

    KootaBreakdown {
        varna: varna_score(bride.moon_sign, groom.moon_sign),
        vashya: vashya_score(bride.moon_sign, groom.moon_sign),
        tara: tara_score(bride.nakshatra, groom.nakshatra),
        yoni: yoni_score(bride.nakshatra, groom.nakshatra),
        graha_maitri,
        gana: gana_score(bride.nakshatra, groom.nakshatra),
        bhakoot: bhakoot_score(bride.moon_sign, groom.moon_sign, lords_friendly),
        nadi: nadi_score(bride.nakshatra, groom.nakshatra),
    }
}
