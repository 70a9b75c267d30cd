//! UV-C dosimetry model.
//!
//! Converts bag optics, lamp power and geometry into delivered dose and
//! exposure time:
//!
//! - Transmission: diffusion approximation, see [`transmission`]
//! - Intensity at the bag (mW/cm²): I = P · 1000 · η · T / (4π r²)
//! - Shielding: a · MNC + b · RBC (· Hct / 40)
//! - Effective dose (J/cm²): D_target · T · max(1 − shielding, floor)
//! - Exposure time (min): D_eff / (I / 1000) / 60
//!
//! The floor keeps the delivered-dose estimate numerically stable under heavy
//! self-shielding. It is a modelling choice, not a physical law.

mod transmission;

pub use transmission::{diffusion_transmission, effective_attenuation};

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::{BagProfile, DosimetryParameters};
use crate::error::DegenerateResultError;

/// Where the UV source sits relative to the bag
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePlacement {
    /// Inside a laminar-flow hood at the configured hood distance
    #[default]
    LaminarHood,
    /// On an open bench at the configured open distance
    OpenBench,
    /// Explicit source-to-bag distance (cm)
    Distance { distance_cm: f64 },
}

/// Product and lamp values that drive dose delivery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseInputs {
    /// Lamp electrical power (W)
    pub lamp_power_w: f64,
    /// Prescribed dose (J/cm²)
    pub target_dose_j_cm2: f64,
    pub placement: SourcePlacement,
    /// Hematocrit relative to the reference hematocrit
    pub hematocrit_ratio: f64,
    /// ×10⁶/mL
    pub mnc_concentration: f64,
    /// ×10⁹
    pub rbc_contamination: f64,
}

/// Dosimetry stage output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseDelivery {
    pub transmission: f64,
    pub source_distance_cm: f64,
    /// Effective UV intensity at the bag surface (mW/cm²)
    pub effective_intensity_mw_cm2: f64,
    pub shielding_fraction: f64,
    /// J/cm²
    pub effective_dose_j_cm2: f64,
    /// minutes
    pub exposure_time_min: f64,
    /// True when the dose floor, not 1 − shielding, set the delivered fraction
    pub floor_engaged: bool,
}

/// UV-C dosimetry model
#[derive(Debug, Clone, Default)]
pub struct DosimetryModel {
    pub params: DosimetryParameters,
}

impl DosimetryModel {
    pub fn new(params: DosimetryParameters) -> Self {
        Self { params }
    }

    pub fn source_distance_cm(&self, placement: SourcePlacement) -> f64 {
        match placement {
            SourcePlacement::LaminarHood => self.params.hood_distance_cm,
            SourcePlacement::OpenBench => self.params.open_distance_cm,
            SourcePlacement::Distance { distance_cm } => distance_cm,
        }
    }

    /// Inverse-square point-source intensity at the bag surface (mW/cm²).
    pub fn effective_intensity(
        &self,
        lamp_power_w: f64,
        transmission: f64,
        distance_cm: f64,
    ) -> Result<f64, DegenerateResultError> {
        if !(distance_cm.is_finite() && distance_cm > 0.0) {
            return Err(DegenerateResultError::NonPositiveDistance { distance_cm });
        }

        let intensity = lamp_power_w * 1000.0 * self.params.lamp_efficiency * transmission
            / (4.0 * PI * distance_cm * distance_cm);

        if !(intensity.is_finite() && intensity > 0.0) {
            return Err(DegenerateResultError::ZeroIntensity {
                intensity_mw_per_cm2: intensity,
            });
        }
        Ok(intensity)
    }

    /// Self-shielding of the product by its own cells.
    pub fn shielding_fraction(
        &self,
        mnc_concentration: f64,
        rbc_contamination: f64,
        hematocrit_ratio: f64,
    ) -> f64 {
        let rbc_weight = if self.params.scale_rbc_shielding_by_hematocrit {
            hematocrit_ratio
        } else {
            1.0
        };
        self.params.mnc_shielding_coefficient * mnc_concentration
            + self.params.rbc_shielding_coefficient * rbc_contamination * rbc_weight
    }

    /// Fraction of transmitted dose that reaches the cells, never below the floor.
    pub fn delivered_fraction(&self, shielding_fraction: f64) -> f64 {
        (1.0 - shielding_fraction).max(self.params.dose_floor_fraction)
    }

    pub fn effective_dose(
        &self,
        target_dose_j_cm2: f64,
        transmission: f64,
        shielding_fraction: f64,
    ) -> f64 {
        target_dose_j_cm2 * transmission * self.delivered_fraction(shielding_fraction)
    }

    /// Time to deliver `effective_dose_j_cm2` at `intensity_mw_cm2` (minutes).
    pub fn exposure_time_min(
        &self,
        effective_dose_j_cm2: f64,
        intensity_mw_cm2: f64,
    ) -> Result<f64, DegenerateResultError> {
        if !(intensity_mw_cm2.is_finite() && intensity_mw_cm2 > 0.0) {
            return Err(DegenerateResultError::ZeroIntensity {
                intensity_mw_per_cm2: intensity_mw_cm2,
            });
        }
        let minutes = effective_dose_j_cm2 / (intensity_mw_cm2 / 1000.0) / 60.0;
        if !minutes.is_finite() {
            return Err(DegenerateResultError::NonFiniteExposureTime {
                exposure_time_min: minutes,
            });
        }
        Ok(minutes)
    }

    /// Run the full dosimetry stage for one bag.
    pub fn evaluate(
        &self,
        bag: &BagProfile,
        inputs: &DoseInputs,
    ) -> Result<DoseDelivery, DegenerateResultError> {
        let transmission = bag.transmission();
        let source_distance_cm = self.source_distance_cm(inputs.placement);
        let effective_intensity_mw_cm2 =
            self.effective_intensity(inputs.lamp_power_w, transmission, source_distance_cm)?;

        let shielding_fraction = self.shielding_fraction(
            inputs.mnc_concentration,
            inputs.rbc_contamination,
            inputs.hematocrit_ratio,
        );
        let floor_engaged = 1.0 - shielding_fraction < self.params.dose_floor_fraction;
        let effective_dose_j_cm2 =
            self.effective_dose(inputs.target_dose_j_cm2, transmission, shielding_fraction);
        let exposure_time_min =
            self.exposure_time_min(effective_dose_j_cm2, effective_intensity_mw_cm2)?;

        log::debug!(
            "{}: T={:.4} r={} cm I={:.3} mW/cm² shielding={:.3} dose={:.3} J/cm² t={:.2} min",
            bag.id,
            transmission,
            source_distance_cm,
            effective_intensity_mw_cm2,
            shielding_fraction,
            effective_dose_j_cm2,
            exposure_time_min
        );

        Ok(DoseDelivery {
            transmission,
            source_distance_cm,
            effective_intensity_mw_cm2,
            shielding_fraction,
            effective_dose_j_cm2,
            exposure_time_min,
            floor_engaged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> DoseInputs {
        DoseInputs {
            lamp_power_w: 15.0,
            target_dose_j_cm2: 1.0,
            placement: SourcePlacement::LaminarHood,
            hematocrit_ratio: 1.0,
            mnc_concentration: 2.56,
            rbc_contamination: 1.75,
        }
    }

    #[test]
    fn test_source_distance() {
        let model = DosimetryModel::default();
        assert_eq!(model.source_distance_cm(SourcePlacement::LaminarHood), 20.0);
        assert_eq!(model.source_distance_cm(SourcePlacement::OpenBench), 15.0);
        assert_eq!(
            model.source_distance_cm(SourcePlacement::Distance { distance_cm: 12.5 }),
            12.5
        );
    }

    #[test]
    fn test_inverse_square_law() {
        let model = DosimetryModel::default();
        let near = model.effective_intensity(15.0, 0.5, 10.0).unwrap();
        let far = model.effective_intensity(15.0, 0.5, 20.0).unwrap();
        assert!((near / far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance_is_degenerate() {
        let model = DosimetryModel::default();
        assert_eq!(
            model.effective_intensity(15.0, 0.5, 0.0),
            Err(DegenerateResultError::NonPositiveDistance { distance_cm: 0.0 })
        );
        assert!(model.effective_intensity(15.0, 0.5, -3.0).is_err());
    }

    #[test]
    fn test_zero_power_is_degenerate() {
        let model = DosimetryModel::default();
        assert!(matches!(
            model.effective_intensity(0.0, 0.5, 20.0),
            Err(DegenerateResultError::ZeroIntensity { .. })
        ));
    }

    #[test]
    fn test_floor_clamps_heavy_shielding() {
        let model = DosimetryModel::default();
        let dose = model.effective_dose(2.0, 0.4, 0.9);
        assert!((dose - 2.0 * 0.4 * 0.5).abs() < 1e-12);
        let light = model.effective_dose(2.0, 0.4, 0.1);
        assert!((light - 2.0 * 0.4 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_hematocrit_scaled_shielding() {
        let mut model = DosimetryModel::default();
        let scaled = model.shielding_fraction(2.0, 3.0, 1.25);
        assert!((scaled - (0.02 + 0.02 * 3.0 * 1.25)).abs() < 1e-12);

        model.params.scale_rbc_shielding_by_hematocrit = false;
        let unscaled = model.shielding_fraction(2.0, 3.0, 1.25);
        assert!((unscaled - (0.02 + 0.06)).abs() < 1e-12);
    }

    #[test]
    fn test_exposure_time_units() {
        let model = DosimetryModel::default();
        // 1 J/cm² at 1 mW/cm² takes 1000 s
        let minutes = model.exposure_time_min(1.0, 1.0).unwrap();
        assert!((minutes - 1000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_subnormal_intensity_overflows_exposure_time() {
        let model = DosimetryModel::default();
        assert!(matches!(
            model.exposure_time_min(1.0, 1e-320),
            Err(DegenerateResultError::NonFiniteExposureTime { exposure_time_min })
                if exposure_time_min.is_infinite()
        ));
    }

    #[test]
    fn test_evaluate_polyethylene_in_hood() {
        let model = DosimetryModel::default();
        let delivery = model.evaluate(&BagProfile::polyethylene(), &inputs()).unwrap();
        assert!(!delivery.floor_engaged);
        assert_eq!(delivery.source_distance_cm, 20.0);
        // 0.0256 + 0.035
        assert!((delivery.shielding_fraction - 0.0606).abs() < 1e-9);
        assert!(delivery.exposure_time_min > 0.0);
    }
}
