use crate::astro::position::{Nakshatra, Sign};
use crate::matching::rules::{
    bhakoot_score, gana_score, graha_maitri_score, nadi_score, tara_score, varna_score,
    vashya_score, yoni_score,
};
use crate::matching::tables::{natural_relationship, Planet, Relationship};

#[test]
fn varna_requires_groom_rank_at_least_bride() {
    assert_eq!(varna_score(Sign::Gemini, Sign::Aries), 1);
    assert_eq!(varna_score(Sign::Aries, Sign::Gemini), 0);
    assert_eq!(varna_score(Sign::Cancer, Sign::Pisces), 1);
    assert_eq!(varna_score(Sign::Aries, Sign::Taurus), 0);
}

#[test]
fn vashya_is_directed_from_groom() {
    assert_eq!(vashya_score(Sign::Leo, Sign::Aries), 2);
    assert_eq!(vashya_score(Sign::Aries, Sign::Leo), 0);
    assert_eq!(vashya_score(Sign::Virgo, Sign::Virgo), 2);
}

#[test]
fn tara_counts_from_bride_to_groom() {
    assert_eq!(tara_score(Nakshatra::Ashwini, Nakshatra::Bharani), 3);
    assert_eq!(tara_score(Nakshatra::Ashwini, Nakshatra::Krittika), 0);
    assert_eq!(tara_score(Nakshatra::Ashwini, Nakshatra::Magha), 0);
    assert_eq!(tara_score(Nakshatra::Ashwini, Nakshatra::Revati), 3);
    assert_eq!(tara_score(Nakshatra::Revati, Nakshatra::Ashwini), 3);
    assert_eq!(tara_score(Nakshatra::Rohini, Nakshatra::Rohini), 0);
}

#[test]
fn yoni_enemies_score_zero_in_either_order() {
    assert_eq!(yoni_score(Nakshatra::Magha, Nakshatra::Punarvasu), 0);
    assert_eq!(yoni_score(Nakshatra::Punarvasu, Nakshatra::Magha), 0);
    assert_eq!(yoni_score(Nakshatra::Hasta, Nakshatra::Ashwini), 0);
    assert_eq!(yoni_score(Nakshatra::Dhanishta, Nakshatra::PurvaPhalguni), 0);
    assert_eq!(yoni_score(Nakshatra::Ashwini, Nakshatra::Shatabhisha), 4);
}

#[test]
fn natural_friendship_is_asymmetric() {
    assert_eq!(natural_relationship(Planet::Sun, Planet::Mercury), Relationship::Neutral);
    assert_eq!(natural_relationship(Planet::Mercury, Planet::Sun), Relationship::Friend);
    assert_eq!(natural_relationship(Planet::Moon, Planet::Mercury), Relationship::Friend);
    assert_eq!(natural_relationship(Planet::Mercury, Planet::Moon), Relationship::Enemy);
}

#[test]
fn graha_maitri_combines_both_directions() {
    // Sun (Leo) is neutral to Mercury, Mercury (Gemini) befriends the Sun
    assert_eq!(graha_maitri_score(Sign::Leo, Sign::Gemini), (4, true));
    assert_eq!(graha_maitri_score(Sign::Gemini, Sign::Leo), (4, true));

    assert_eq!(graha_maitri_score(Sign::Aries, Sign::Scorpio), (5, true));
    assert_eq!(graha_maitri_score(Sign::Aries, Sign::Sagittarius), (5, true));
    assert_eq!(graha_maitri_score(Sign::Aries, Sign::Taurus), (3, false));
    assert_eq!(graha_maitri_score(Sign::Cancer, Sign::Capricorn), (2, false));
    assert_eq!(graha_maitri_score(Sign::Aries, Sign::Gemini), (2, false));
    // friend one way, enemy the other
    assert_eq!(graha_maitri_score(Sign::Cancer, Sign::Gemini), (0, false));
    assert_eq!(graha_maitri_score(Sign::Leo, Sign::Aquarius), (0, false));
}

#[test]
fn gana_pairs() {
    assert_eq!(gana_score(Nakshatra::Krittika, Nakshatra::Ashlesha), 6);
    assert_eq!(gana_score(Nakshatra::Ashwini, Nakshatra::Bharani), 5);
    assert_eq!(gana_score(Nakshatra::Bharani, Nakshatra::Krittika), 1);
    assert_eq!(gana_score(Nakshatra::Krittika, Nakshatra::Ashwini), 0);
}

#[test]
fn bhakoot_dosha_needs_friendly_lords_to_cancel() {
    assert_eq!(bhakoot_score(Sign::Aries, Sign::Taurus, false), 0);
    assert_eq!(bhakoot_score(Sign::Aries, Sign::Taurus, true), 7);
    for groom in Sign::ALL {
        let expected = if [1, 4, 5, 7, 8, 11].contains(&groom.index()) { 0 } else { 7 };
        assert_eq!(bhakoot_score(Sign::Aries, groom, false), expected, "{groom}");
    }
}

#[test]
fn matching_nadi_is_a_dosha() {
    assert_eq!(nadi_score(Nakshatra::Ashwini, Nakshatra::Rohini), 0);
    assert_eq!(nadi_score(Nakshatra::Ashwini, Nakshatra::Krittika), 8);
}
