use kundli::astro::chart::Chart;
use kundli::manglik::ManglikResult;
use kundli::matching::CompatibilityResult;

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub(crate) fn render_chart(chart: &Chart) -> String {
    let longitudes = &chart.planetary_longitudes;
    finish(vec![
        format!("Kundli ({} ayanamsa)", chart.ayanamsa),
        format!(
            "Born {} UTC ({}) at {:.4}, {:.4}",
            chart.metadata.calculation_time.format("%Y-%m-%d %H:%M"),
            chart.metadata.timezone,
            chart.metadata.coordinates.latitude,
            chart.metadata.coordinates.longitude
        ),
        String::new(),
        "Placements".to_string(),
        format!("- Sun: {} ({:.4}°)", chart.sun_sign, longitudes.sun),
        format!("- Moon: {} ({:.4}°)", chart.moon_sign, longitudes.moon),
        format!("- Ascendant: {} ({:.4}°)", chart.ascendant, longitudes.ascendant),
        String::new(),
        format!(
            "Nakshatra: {} pada {}",
            chart.nakshatra,
            chart.nakshatra_pada.get()
        ),
        format!("Confidence: {}%", chart.confidence),
    ])
}

pub(crate) fn render_match(result: &CompatibilityResult) -> String {
    let mut lines = vec![
        format!(
            "Ashta-Koota: {}/{} gunas ({:?})",
            result.total_gunas, result.max_gunas, result.verdict
        ),
        String::new(),
        "Breakdown".to_string(),
    ];
    lines.extend(
        result
            .breakdown
            .entries()
            .map(|(koota, points)| format!("- {}: {}/{}", koota.name(), points, koota.max_points())),
    );
    finish(lines)
}

pub(crate) fn render_manglik(result: &ManglikResult) -> String {
    let verdict = if result.is_manglik { "Manglik" } else { "Not Manglik" };
    let mut lines = vec![
        format!("{verdict} ({})", result.system),
        format!(
            "Mars in {} ({:.2}°), house {} from Lagna",
            result.mars_sign, result.mars_longitude, result.mars_house_from_lagna
        ),
    ];
    if let Some(house) = result.mars_house_from_moon {
        lines.push(format!("House {house} from Moon"));
    }
    lines.push(format!(
        "Severity: {} (score {}), dosha strength: {}",
        result.severity.label(),
        result.severity_score,
        result.dosha_strength.label()
    ));
    lines.push(String::new());
    lines.push(result.explanation.clone());
    lines.push(String::new());

    if result.cancellations.is_empty() {
        lines.push("Cancellations: none".to_string());
    } else {
        lines.push("Cancellations".to_string());
        lines.extend(result.cancellations.iter().map(|cancellation| format!("- {cancellation}")));
    }

    lines.push(String::new());
    lines.push(format!("Recommendation: {}", result.recommendation));
    finish(lines)
}
