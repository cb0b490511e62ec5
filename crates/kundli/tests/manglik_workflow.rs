use kundli::manglik::{
    Cancellation, DoshaStrength, ManglikDetector, PairingOutcome, PlanetaryLongitudes, Severity,
};
use kundli::astro::position::Sign;
use kundli::error::KundliError;

fn longitudes(entries: &[(&str, f64)]) -> PlanetaryLongitudes {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn exalted_mars_in_seventh_stays_strong() {
    let result = ManglikDetector::default()
        .detect(&longitudes(&[("mars", 280.0), ("ascendant", 100.0)]))
        .expect("detection succeeds");

    assert!(result.is_manglik);
    assert_eq!(result.mars_house_from_lagna, 7);
    assert_eq!(result.mars_house_from_moon, None);
    assert_eq!(result.mars_sign, Sign::Capricorn);
    assert_eq!(result.mars_rashi_number, 10);
    assert_eq!(result.severity, Severity::VeryHigh);
    assert_eq!(result.severity_score, 5);
    assert_eq!(result.cancellations, vec![Cancellation::Uccha]);
    assert!(result.is_cancelled);
    assert_eq!(result.dosha_strength, DoshaStrength::Strong);
}

#[test]
fn benefic_conjunctions_weaken_the_dosha() {
    let detector = ManglikDetector::default();

    let with_jupiter = detector
        .detect(&longitudes(&[("mars", 280.0), ("ascendant", 100.0), ("jupiter", 290.0)]))
        .expect("detection succeeds");
    assert_eq!(
        with_jupiter.cancellations,
        vec![Cancellation::Uccha, Cancellation::GuruYukti]
    );
    assert_eq!(with_jupiter.dosha_strength, DoshaStrength::Weak);

    let with_both = detector
        .detect(&longitudes(&[
            ("mars", 280.0),
            ("ascendant", 100.0),
            ("jupiter", 290.0),
            ("venus", 275.0),
        ]))
        .expect("detection succeeds");
    assert_eq!(with_both.cancellations.len(), 3);
    assert_eq!(with_both.dosha_strength, DoshaStrength::Negligible);
}

#[test]
fn own_sign_from_lagna_only_is_fully_cancelled() {
    let chart = longitudes(&[("mars", 10.0), ("ascendant", 10.0), ("moon", 100.0)]);

    let result = ManglikDetector::default().detect(&chart).expect("detection succeeds");
    assert_eq!(result.mars_house_from_lagna, 1);
    assert_eq!(result.mars_house_from_moon, Some(10));
    assert!(result.is_manglik_from_lagna);
    assert!(!result.is_manglik_from_moon);
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(
        result.cancellations,
        vec![
            Cancellation::Swakshetra(Sign::Aries),
            Cancellation::PartialFromLagnaOnly
        ]
    );
    assert_eq!(result.dosha_strength, DoshaStrength::FullyCancelled);
    assert!(result.recommendation.contains("significantly cancelled"));

    let lagna_only = ManglikDetector::new(false).detect(&chart).expect("detection succeeds");
    assert_eq!(lagna_only.mars_house_from_moon, None);
    assert_eq!(lagna_only.cancellations, vec![Cancellation::Swakshetra(Sign::Aries)]);
    assert_eq!(lagna_only.dosha_strength, DoshaStrength::Weak);
}

#[test]
fn affliction_from_moon_alone_counts() {
    let result = ManglikDetector::default()
        .detect(&longitudes(&[("mars", 10.0), ("ascendant", 100.0), ("moon", 330.0)]))
        .expect("detection succeeds");

    assert!(result.is_manglik);
    assert!(!result.is_manglik_from_lagna);
    assert!(result.is_manglik_from_moon);
    assert_eq!(result.mars_house_from_lagna, 10);
    assert_eq!(result.mars_house_from_moon, Some(2));
    assert_eq!(result.severity, Severity::Low);
    assert!(result.cancellations.contains(&Cancellation::PartialFromMoonOnly));
    assert_eq!(result.dosha_strength, DoshaStrength::FullyCancelled);
}

#[test]
fn debilitated_mars_is_flagged_without_cancelling() {
    let result = ManglikDetector::default()
        .detect(&longitudes(&[("mars", 100.0), ("ascendant", 10.0)]))
        .expect("detection succeeds");

    assert_eq!(result.mars_house_from_lagna, 4);
    assert!(result.mars_debilitated);
    assert_eq!(result.severity, Severity::Medium);
    assert!(result.cancellations.is_empty());
    assert!(!result.is_cancelled);
    assert_eq!(result.dosha_strength, DoshaStrength::Moderate);
    assert!(result.recommendation.contains("debilitated"));
}

#[test]
fn unafflicted_houses_report_no_dosha() {
    let detector = ManglikDetector::default();
    for (ascendant, house) in [(250.0, 11), (49.464221, 6)] {
        let result = detector
            .detect(&longitudes(&[("mars", 190.5), ("ascendant", ascendant)]))
            .expect("detection succeeds");
        assert_eq!(result.mars_house_from_lagna, house);
        assert!(!result.is_manglik);
        assert_eq!(result.severity, Severity::None);
        assert_eq!(result.dosha_strength, DoshaStrength::NoDosha);
        assert!(result.cancellations.is_empty());
        assert_eq!(result.mars_longitude, 190.5);
    }
}

#[test]
fn batch_detection_isolates_failures() {
    let results = ManglikDetector::default().detect_many(&[
        longitudes(&[("mars", 280.0), ("ascendant", 100.0)]),
        longitudes(&[("ascendant", 100.0)]),
        longitudes(&[("mars", 190.5), ("ascendant", 250.0)]),
    ]);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().is_ok_and(|result| result.is_manglik));
    assert_eq!(
        results[1].as_ref().expect_err("mars missing"),
        &KundliError::MissingField { field: "mars" }
    );
    assert!(results[2].as_ref().is_ok_and(|result| !result.is_manglik));
}

#[test]
fn pairing_classifies_both_partners() {
    let detector = ManglikDetector::default();
    let manglik = longitudes(&[("mars", 280.0), ("ascendant", 100.0)]);
    let clear = longitudes(&[("mars", 190.5), ("ascendant", 250.0)]);

    let both = detector.pair(&manglik, &manglik).expect("pairing succeeds");
    assert!(both.compatible);
    assert_eq!(both.compatibility_type, PairingOutcome::BothManglik);

    let partial = detector.pair(&clear, &manglik).expect("pairing succeeds");
    assert!(!partial.compatible);
    assert_eq!(partial.compatibility_type, PairingOutcome::OnlySecond);
    assert_eq!(partial.reason, "Only one partner (person 2) has Manglik Dosha");

    let json = serde_json::to_value(&partial).expect("pairing serialises");
    assert_eq!(json["compatibility_type"], "Partial Manglik");
    assert_eq!(json["person2_analysis"]["severity"], "Very High");

    let neither = detector.pair(&clear, &clear).expect("pairing succeeds");
    assert_eq!(neither.compatibility_type, PairingOutcome::NeitherManglik);
    assert_eq!(neither.recommendation, "No Manglik concerns.");
}
