//! Facade bundling the chart, matching and manglik engines behind one handle.

pub mod router;

use std::sync::Arc;

use tracing::info;

use crate::astro::chart::{BirthInput, Chart, ChartGenerator};
use crate::astro::ephemeris::Ephemeris;
use crate::error::KundliError;
use crate::manglik::{
    ManglikCompatibility, ManglikCompatibilityRequest, ManglikDetector, ManglikRequest,
    ManglikResult,
};
use crate::matching::{CompatibilityRequest, CompatibilityResult, CompatibilityScorer};

pub use router::astro_router;

/// Shared, read-only service state. Safe to clone into every request.
pub struct AstroService<E: Ephemeris> {
    charts: ChartGenerator<E>,
    scorer: CompatibilityScorer,
    manglik: ManglikDetector,
}

impl<E: Ephemeris> AstroService<E> {
    pub fn new(ephemeris: Arc<E>, manglik: ManglikDetector) -> Self {
        Self {
            charts: ChartGenerator::new(ephemeris),
            scorer: CompatibilityScorer,
            manglik,
        }
    }

    pub fn generate_kundli(&self, input: &BirthInput) -> Result<Chart, KundliError> {
        let chart = self.charts.generate(input)?;
        info!(
            moon_sign = %chart.moon_sign,
            nakshatra = %chart.nakshatra,
            pada = chart.nakshatra_pada.get(),
            confidence = chart.confidence,
            "kundli generated"
        );
        Ok(chart)
    }

    pub fn calculate_compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> Result<CompatibilityResult, KundliError> {
        self.scorer.score_request(request)
    }

    pub fn detect_manglik(&self, request: &ManglikRequest) -> Result<ManglikResult, KundliError> {
        self.manglik
            .with_moon_check(request.check_from_moon)
            .detect(&request.planetary_longitudes)
    }

    pub fn manglik_compatibility(
        &self,
        request: &ManglikCompatibilityRequest,
    ) -> Result<ManglikCompatibility, KundliError> {
        self.manglik
            .pair(&request.person1_longitudes, &request.person2_longitudes)
    }
}
