//! Apheresis performance model.
//!
//! Converts machine settings and patient blood values into normalised
//! collection-efficiency factors and an estimate of the collected product:
//!
//! - Hematocrit efficiency: η_hct = 1 − k_hct · (Hct − 40) / 40
//! - Interface factor: proximity of the interface position to its best value, × η_hct
//! - Flow factor: position of the flow rate within the device range, × η_hct
//! - Purity: 0.7 + 0.15 · interface · η_hct
//! - MNC (×10⁶/mL) = TLC · lymph% · yield · flow factor · interface factor
//! - RBC (×10⁹) = base · (Hct / 40) · (1 − plasma% / normalisation)
//!
//! All factors are empirical. Nothing is clamped: out-of-range inputs must be
//! rejected before they reach this model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ApheresisParameters, DeviceProfile};
use crate::error::ValidationError;

/// Shape of the interface-position efficiency curve.
///
/// Both shapes are in clinical use and give materially different efficiency
/// for the same interface setting, so the active one is always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterfacePolicy {
    /// 1.0 at the low end of the device range falling linearly to 0.0 at the high end
    #[default]
    LinearRamp,
    /// 1.0 at `optimum` falling linearly to 0.0 at the farther range bound
    TriangularPeak { optimum: f64 },
}

impl InterfacePolicy {
    /// Proximity of `position` to the preferred interface, before hematocrit scaling.
    ///
    /// Lies in [0, 1] for any position inside `range`.
    pub fn proximity(&self, position: f64, (low, high): (f64, f64)) -> f64 {
        match *self {
            InterfacePolicy::LinearRamp => 1.0 - (position - low) / (high - low),
            InterfacePolicy::TriangularPeak { optimum } => {
                let half_width = (optimum - low).max(high - optimum);
                1.0 - (position - optimum).abs() / half_width
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterfacePolicy::LinearRamp => "linear ramp",
            InterfacePolicy::TriangularPeak { .. } => "triangular peak",
        }
    }
}

impl fmt::Display for InterfacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfacePolicy::LinearRamp => write!(f, "linear ramp from range minimum"),
            InterfacePolicy::TriangularPeak { optimum } => {
                write!(f, "triangular peak at {}", optimum)
            }
        }
    }
}

/// Machine and patient values that drive collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionInputs {
    /// Hematocrit (%)
    pub hematocrit_percent: f64,
    /// Interface position (machine units)
    pub interface_position: f64,
    /// Inlet flow rate (mL/min)
    pub flow_rate_ml_per_min: f64,
    /// Plasma removal (%)
    pub plasma_removal_percent: f64,
    /// Total leukocyte count (×10³/µL)
    pub tlc_k_per_ul: f64,
    /// Lymphocyte fraction (%)
    pub lymphocyte_percent: f64,
}

/// Efficiency factors and estimated product composition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApheresisPerformance {
    pub hct_efficiency: f64,
    pub interface_factor: f64,
    pub flow_factor: f64,
    /// T-cell purity factor (dimensionless)
    pub purity_factor: f64,
    /// Estimated MNC concentration (×10⁶/mL)
    pub mnc_concentration: f64,
    /// Estimated RBC contamination (×10⁹)
    pub rbc_contamination: f64,
}

/// Apheresis performance model
#[derive(Debug, Clone, Default)]
pub struct ApheresisModel {
    pub params: ApheresisParameters,
}

impl ApheresisModel {
    pub fn new(params: ApheresisParameters) -> Self {
        Self { params }
    }

    /// Active interface-position policy
    pub fn interface_policy(&self) -> InterfacePolicy {
        self.params.interface_policy
    }

    /// Collection efficiency relative to the reference hematocrit.
    ///
    /// Exactly 1.0 at the reference for every device. May be zero or negative
    /// at extreme hematocrit; [`evaluate`](Self::evaluate) rejects that.
    pub fn hematocrit_efficiency(&self, device: &DeviceProfile, hematocrit_percent: f64) -> f64 {
        let reference = self.params.reference_hematocrit_percent;
        1.0 - device.hct_impact * (hematocrit_percent - reference) / reference
    }

    pub fn interface_factor(
        &self,
        device: &DeviceProfile,
        interface_position: f64,
        hct_efficiency: f64,
    ) -> f64 {
        self.params
            .interface_policy
            .proximity(interface_position, device.interface_range)
            * hct_efficiency
    }

    pub fn flow_factor(
        &self,
        device: &DeviceProfile,
        flow_rate_ml_per_min: f64,
        hct_efficiency: f64,
    ) -> f64 {
        let (low, high) = device.flow_range_ml_per_min;
        (flow_rate_ml_per_min - low) / (high - low) * hct_efficiency
    }

    /// Collecting deeper into the lymphocyte layer raises T-cell purity.
    pub fn purity_factor(&self, interface_position: f64, hct_efficiency: f64) -> f64 {
        self.params.purity_baseline
            + self.params.purity_interface_slope * interface_position * hct_efficiency
    }

    /// Estimated MNC concentration (×10⁶/mL)
    pub fn mnc_concentration(
        &self,
        tlc_k_per_ul: f64,
        lymphocyte_percent: f64,
        flow_factor: f64,
        interface_factor: f64,
    ) -> f64 {
        tlc_k_per_ul
            * (lymphocyte_percent / 100.0)
            * self.params.yield_multiplier
            * flow_factor
            * interface_factor
    }

    /// Estimated RBC contamination (×10⁹).
    ///
    /// Non-decreasing in hematocrit, non-increasing in plasma removal.
    pub fn rbc_contamination(
        &self,
        device: &DeviceProfile,
        hematocrit_percent: f64,
        plasma_removal_percent: f64,
    ) -> f64 {
        device.rbc_contamination_base
            * (hematocrit_percent / self.params.reference_hematocrit_percent)
            * (1.0 - plasma_removal_percent / device.plasma_removal_normalization_percent)
    }

    /// Run the full model for one device.
    pub fn evaluate(
        &self,
        device: &DeviceProfile,
        inputs: &CollectionInputs,
    ) -> Result<ApheresisPerformance, ValidationError> {
        let hct_efficiency = self.hematocrit_efficiency(device, inputs.hematocrit_percent);
        if hct_efficiency.is_nan() || hct_efficiency <= 0.0 {
            return Err(ValidationError::NonPositiveEfficiency {
                hematocrit: inputs.hematocrit_percent,
                efficiency: hct_efficiency,
            });
        }

        let interface_factor =
            self.interface_factor(device, inputs.interface_position, hct_efficiency);
        let flow_factor = self.flow_factor(device, inputs.flow_rate_ml_per_min, hct_efficiency);
        let purity_factor = self.purity_factor(inputs.interface_position, hct_efficiency);
        let mnc_concentration = self.mnc_concentration(
            inputs.tlc_k_per_ul,
            inputs.lymphocyte_percent,
            flow_factor,
            interface_factor,
        );
        let rbc_contamination = self.rbc_contamination(
            device,
            inputs.hematocrit_percent,
            inputs.plasma_removal_percent,
        );

        log::debug!(
            "{}: η_hct={:.3} interface={:.3} flow={:.3} MNC={:.2} RBC={:.2}",
            device.id,
            hct_efficiency,
            interface_factor,
            flow_factor,
            mnc_concentration,
            rbc_contamination
        );

        Ok(ApheresisPerformance {
            hct_efficiency,
            interface_factor,
            flow_factor,
            purity_factor,
            mnc_concentration,
            rbc_contamination,
        })
    }
}
