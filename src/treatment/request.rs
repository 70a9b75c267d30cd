//! Treatment request: the caller-supplied parameter set.

use serde::{Deserialize, Serialize};

use crate::apheresis::CollectionInputs;
use crate::config::{DeviceProfile, RequestLimits};
use crate::dosimetry::SourcePlacement;
use crate::error::{ensure_in_range, ValidationError};

/// One planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRequest {
    /// Apheresis device identifier
    pub device_id: String,
    /// Treatment bag identifier
    pub bag_id: String,

    /// Total leukocyte count (×10³/µL)
    pub tlc_k_per_ul: f64,
    /// Lymphocyte fraction (%)
    pub lymphocyte_percent: f64,
    /// Hematocrit (%)
    pub hematocrit_percent: f64,

    /// UV-C lamp power (W)
    pub lamp_power_w: f64,
    /// Prescribed dose (J/cm²)
    pub target_dose_j_cm2: f64,
    pub placement: SourcePlacement,

    /// Interface position (machine units)
    pub interface_position: f64,
    /// Inlet flow rate (mL/min)
    pub flow_rate_ml_per_min: f64,
    /// Plasma removal (%)
    pub plasma_removal_percent: f64,
    /// Anticoagulant ratio (1:X)
    pub acd_ratio: f64,
}

impl Default for TreatmentRequest {
    /// Typical adult ECP run on a Spectra Optia in a laminar hood
    fn default() -> Self {
        Self {
            device_id: "Spectra Optia".to_string(),
            bag_id: "Spectra Optia (Polyethylene)".to_string(),
            tlc_k_per_ul: 8.0,
            lymphocyte_percent: 30.0,
            hematocrit_percent: 40.0,
            lamp_power_w: 15.0,
            target_dose_j_cm2: 1.0,
            placement: SourcePlacement::LaminarHood,
            interface_position: 1.0,
            flow_rate_ml_per_min: 50.0,
            plasma_removal_percent: 15.0,
            acd_ratio: 13.0,
        }
    }
}

impl TreatmentRequest {
    /// Check every numeric field against the device envelope and request limits.
    ///
    /// Nothing is clamped; the first offending field is reported.
    pub fn validate(
        &self,
        device: &DeviceProfile,
        limits: &RequestLimits,
    ) -> Result<(), ValidationError> {
        ensure_in_range("tlc_k_per_ul", self.tlc_k_per_ul, limits.tlc_range)?;
        ensure_in_range(
            "lymphocyte_percent",
            self.lymphocyte_percent,
            limits.lymphocyte_percent_range,
        )?;
        ensure_in_range(
            "hematocrit_percent",
            self.hematocrit_percent,
            limits.hematocrit_percent_range,
        )?;
        ensure_in_range("lamp_power_w", self.lamp_power_w, limits.lamp_power_range_w)?;
        ensure_in_range(
            "target_dose_j_cm2",
            self.target_dose_j_cm2,
            limits.target_dose_range_j_cm2,
        )?;

        ensure_in_range(
            "interface_position",
            self.interface_position,
            device.interface_range,
        )?;
        ensure_in_range(
            "flow_rate_ml_per_min",
            self.flow_rate_ml_per_min,
            device.flow_range_ml_per_min,
        )?;
        ensure_in_range(
            "plasma_removal_percent",
            self.plasma_removal_percent,
            device.plasma_removal_range_percent,
        )?;
        ensure_in_range("acd_ratio", self.acd_ratio, device.acd_ratio_range)
    }

    pub fn collection_inputs(&self) -> CollectionInputs {
        CollectionInputs {
            hematocrit_percent: self.hematocrit_percent,
            interface_position: self.interface_position,
            flow_rate_ml_per_min: self.flow_rate_ml_per_min,
            plasma_removal_percent: self.plasma_removal_percent,
            tlc_k_per_ul: self.tlc_k_per_ul,
            lymphocyte_percent: self.lymphocyte_percent,
        }
    }
}
