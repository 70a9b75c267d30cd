//! Dose-response and time-response viability curves.
//!
//! First-order UV inactivation for two populations:
//!
//! V(x) = 100 · exp(−k · x · e · w)
//!
//! where `e` converts the axis unit into delivered exposure (transmission for
//! the dose axis, J/cm² per minute for the time axis) and `w` is the T-cell
//! purity factor for target lymphocytes and 1 for monocytes.
//!
//! Curves are closed-form and evaluated lazily. A [`ResponseCurve`] can be
//! iterated any number of times and resampled on a different domain.

use serde::{Deserialize, Serialize};

use crate::config::ViabilityParameters;
use crate::error::ValidationError;

/// Cell populations tracked by the viability model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPopulation {
    /// UV-sensitive target lymphocytes (T cells)
    TargetLymphocytes,
    /// Bystander monocytes
    Monocytes,
}

impl CellPopulation {
    pub const ALL: [CellPopulation; 2] = [
        CellPopulation::TargetLymphocytes,
        CellPopulation::Monocytes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CellPopulation::TargetLymphocytes => "T-cells",
            CellPopulation::Monocytes => "Monocytes",
        }
    }
}

/// Independent variable of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveAxis {
    /// UV-C dose (J/cm²)
    Dose,
    /// Treatment time (min)
    Time,
}

impl CurveAxis {
    pub fn label(&self) -> &'static str {
        match self {
            CurveAxis::Dose => "dose_j_cm2",
            CurveAxis::Time => "time_min",
        }
    }
}

/// Evenly spaced sample grid `[start, end]` with `samples` points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurveDomain")]
pub struct CurveDomain {
    start: f64,
    end: f64,
    samples: usize,
}

/// Unchecked wire form of [`CurveDomain`]
#[derive(Deserialize)]
struct RawCurveDomain {
    start: f64,
    end: f64,
    samples: usize,
}

impl TryFrom<RawCurveDomain> for CurveDomain {
    type Error = ValidationError;

    fn try_from(raw: RawCurveDomain) -> Result<Self, Self::Error> {
        CurveDomain::new(raw.start, raw.end, raw.samples)
    }
}

impl CurveDomain {
    pub fn new(start: f64, end: f64, samples: usize) -> Result<Self, ValidationError> {
        if start.is_finite() && end.is_finite() && end > start && samples >= 2 {
            Ok(Self { start, end, samples })
        } else {
            Err(ValidationError::InvalidDomain { start, end, samples })
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Abscissa of sample `index`; the last sample lands exactly on `end`.
    pub fn x_at(&self, index: usize) -> f64 {
        if index + 1 >= self.samples {
            self.end
        } else {
            self.start + (self.end - self.start) * index as f64 / (self.samples - 1) as f64
        }
    }
}

/// One sample of a response curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViabilityPoint {
    pub x: f64,
    pub target_viability_percent: f64,
    pub monocyte_viability_percent: f64,
}

/// Builds response curves from computed treatment quantities.
#[derive(Debug, Clone, Default)]
pub struct ViabilityModel {
    pub params: ViabilityParameters,
}

impl ViabilityModel {
    pub fn new(params: ViabilityParameters) -> Self {
        Self { params }
    }

    /// Decay constant (cm²/J)
    pub fn decay_constant(&self, population: CellPopulation) -> f64 {
        match population {
            CellPopulation::TargetLymphocytes => self.params.target_decay_per_j_cm2,
            CellPopulation::Monocytes => self.params.monocyte_decay_per_j_cm2,
        }
    }

    /// Default dose axis: 0 to max(minimum axis, span × effective dose).
    pub fn default_dose_domain(
        &self,
        effective_dose_j_cm2: f64,
    ) -> Result<CurveDomain, ValidationError> {
        let end = (self.params.axis_span_factor * effective_dose_j_cm2)
            .max(self.params.min_dose_axis_j_cm2);
        CurveDomain::new(0.0, end, self.params.curve_samples)
    }

    /// Default time axis: 0 to max(minimum axis, span × exposure time).
    pub fn default_time_domain(
        &self,
        exposure_time_min: f64,
    ) -> Result<CurveDomain, ValidationError> {
        let end = (self.params.axis_span_factor * exposure_time_min)
            .max(self.params.min_time_axis_min);
        CurveDomain::new(0.0, end, self.params.curve_samples)
    }

    /// Viability against nominal UV-C dose, attenuated by bag transmission.
    pub fn dose_response(
        &self,
        transmission: f64,
        purity_factor: f64,
        domain: CurveDomain,
    ) -> ResponseCurve {
        self.curve(CurveAxis::Dose, transmission, purity_factor, domain)
    }

    /// Viability against treatment time at the effective bag intensity.
    pub fn time_response(
        &self,
        effective_intensity_mw_cm2: f64,
        purity_factor: f64,
        domain: CurveDomain,
    ) -> ResponseCurve {
        // mW/cm² → J/cm² delivered per minute
        let per_minute = effective_intensity_mw_cm2 / 1000.0 * 60.0;
        self.curve(CurveAxis::Time, per_minute, purity_factor, domain)
    }

    fn curve(
        &self,
        axis: CurveAxis,
        exposure_per_unit: f64,
        purity_factor: f64,
        domain: CurveDomain,
    ) -> ResponseCurve {
        ResponseCurve {
            axis,
            domain,
            exposure_per_unit,
            purity_factor,
            target_decay: self.decay_constant(CellPopulation::TargetLymphocytes),
            monocyte_decay: self.decay_constant(CellPopulation::Monocytes),
        }
    }
}

/// Closed-form viability curve over a sampling domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseCurve {
    axis: CurveAxis,
    domain: CurveDomain,
    /// Delivered exposure (J/cm²) per unit of the axis
    exposure_per_unit: f64,
    purity_factor: f64,
    target_decay: f64,
    monocyte_decay: f64,
}

impl ResponseCurve {
    pub fn axis(&self) -> CurveAxis {
        self.axis
    }

    pub fn domain(&self) -> CurveDomain {
        self.domain
    }

    /// Viability (%) of `population` at abscissa `x`; exactly 100 at x = 0.
    pub fn viability(&self, population: CellPopulation, x: f64) -> f64 {
        let (k, weight) = match population {
            CellPopulation::TargetLymphocytes => (self.target_decay, self.purity_factor),
            CellPopulation::Monocytes => (self.monocyte_decay, 1.0),
        };
        100.0 * (-k * x * self.exposure_per_unit * weight).exp()
    }

    pub fn point(&self, x: f64) -> ViabilityPoint {
        ViabilityPoint {
            x,
            target_viability_percent: self.viability(CellPopulation::TargetLymphocytes, x),
            monocyte_viability_percent: self.viability(CellPopulation::Monocytes, x),
        }
    }

    /// Same closed form sampled on another domain
    pub fn resample(&self, domain: CurveDomain) -> Self {
        Self { domain, ..*self }
    }

    /// Lazily evaluate the curve over its domain. Can be called repeatedly.
    pub fn iter(&self) -> CurvePoints<'_> {
        CurvePoints {
            curve: self,
            front: 0,
            back: self.domain.samples,
        }
    }
}

impl<'a> IntoIterator for &'a ResponseCurve {
    type Item = ViabilityPoint;
    type IntoIter = CurvePoints<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the samples of a [`ResponseCurve`]
#[derive(Debug, Clone)]
pub struct CurvePoints<'a> {
    curve: &'a ResponseCurve,
    front: usize,
    back: usize,
}

impl Iterator for CurvePoints<'_> {
    type Item = ViabilityPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let x = self.curve.domain.x_at(self.front);
        self.front += 1;
        Some(self.curve.point(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for CurvePoints<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.curve.point(self.curve.domain.x_at(self.back)))
    }
}

impl ExactSizeIterator for CurvePoints<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dose_curve() -> ResponseCurve {
        let model = ViabilityModel::default();
        let domain = CurveDomain::new(0.0, 2.5, 100).unwrap();
        model.dose_response(0.4354, 0.85, domain)
    }

    #[test]
    fn test_full_viability_at_origin() {
        let curve = dose_curve();
        for population in CellPopulation::ALL {
            assert_eq!(curve.viability(population, 0.0), 100.0);
        }
    }

    #[test]
    fn test_target_cells_decay_faster() {
        let curve = dose_curve();
        let t = curve.viability(CellPopulation::TargetLymphocytes, 1.0);
        let m = curve.viability(CellPopulation::Monocytes, 1.0);
        assert!(t < m, "T-cells {:.1}% should be below monocytes {:.1}%", t, m);
        assert!((t - 100.0 * (-0.4354_f64 * 0.85).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let curve = dose_curve();
        let first: Vec<ViabilityPoint> = curve.iter().collect();
        let second: Vec<ViabilityPoint> = (&curve).into_iter().collect();
        assert_eq!(first.len(), 100);
        assert_eq!(first, second);
        assert_eq!(first[0].x, 0.0);
        assert_eq!(first[99].x, 2.5);
    }

    #[test]
    fn test_reverse_iteration() {
        let curve = dose_curve();
        let mut points = curve.iter();
        assert_eq!(points.len(), 100);
        assert_eq!(points.next_back().unwrap().x, 2.5);
        assert_eq!(points.next().unwrap().x, 0.0);
        assert_eq!(points.len(), 98);
    }

    #[test]
    fn test_resample() {
        let curve = dose_curve();
        let coarse = curve.resample(CurveDomain::new(0.0, 1.0, 3).unwrap());
        let xs: Vec<f64> = coarse.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.5, 1.0]);
        assert_eq!(
            coarse.viability(CellPopulation::Monocytes, 0.7),
            curve.viability(CellPopulation::Monocytes, 0.7)
        );
    }

    #[test]
    fn test_invalid_domains() {
        assert!(CurveDomain::new(0.0, 0.0, 10).is_err());
        assert!(CurveDomain::new(1.0, 0.0, 10).is_err());
        assert!(CurveDomain::new(0.0, 1.0, 1).is_err());
        assert!(CurveDomain::new(0.0, f64::INFINITY, 10).is_err());
    }

    #[test]
    fn test_domain_json_is_validated() {
        let parsed: CurveDomain =
            serde_json::from_str(r#"{"start":0.0,"end":2.5,"samples":100}"#).unwrap();
        assert_eq!(parsed, CurveDomain::new(0.0, 2.5, 100).unwrap());

        for json in [
            r#"{"start":0.0,"end":1.0,"samples":1}"#,
            r#"{"start":0.0,"end":1.0,"samples":0}"#,
            r#"{"start":1.0,"end":0.0,"samples":10}"#,
        ] {
            assert!(
                serde_json::from_str::<CurveDomain>(json).is_err(),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_default_domains() {
        let model = ViabilityModel::default();
        assert_eq!(model.default_dose_domain(0.4).unwrap().end(), 2.5);
        assert_eq!(model.default_dose_domain(2.0).unwrap().end(), 4.0);
        assert_eq!(model.default_time_domain(10.0).unwrap().end(), 40.0);
        assert_eq!(model.default_time_domain(30.0).unwrap().end(), 60.0);
    }

    #[test]
    fn test_time_axis_conversion() {
        let model = ViabilityModel::default();
        let domain = CurveDomain::new(0.0, 10.0, 11).unwrap();
        // 1 mW/cm² for 1 min = 0.06 J/cm²
        let curve = model.time_response(1.0, 1.0, domain);
        let v = curve.viability(CellPopulation::Monocytes, 1.0);
        assert!((v - 100.0 * (-0.25_f64 * 0.06).exp()).abs() < 1e-9);
    }
}
