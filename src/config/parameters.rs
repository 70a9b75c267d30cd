//! Model constants for the apheresis, dosimetry and viability stages.
//!
//! Defaults reproduce the empirical constants of the bedside ECP calculator.
//! Any subset can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{check_bounds, check_finite, check_positive, check_range, read_json};
use crate::apheresis::InterfacePolicy;
use crate::error::ConfigurationError;

const PROFILE: &str = "engine parameters";

/// Top-level parameters container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    pub apheresis: ApheresisParameters,
    pub dosimetry: DosimetryParameters,
    pub viability: ViabilityParameters,
    pub limits: RequestLimits,
}

impl EngineParameters {
    /// Load from a JSON file, or use defaults if the file doesn't exist.
    ///
    /// A file that exists but is malformed is an error, not a fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let params = match read_json::<Self>(path.as_ref())? {
            Some(params) => {
                log::info!("Loaded engine parameters from {:?}", path.as_ref());
                params
            }
            None => {
                log::info!("Engine parameters file not found, using defaults");
                Self::default()
            }
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.apheresis.validate()?;
        self.dosimetry.validate()?;
        self.viability.validate()?;
        self.limits.validate()
    }
}

/// Collection-efficiency and product-composition constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApheresisParameters {
    /// Hematocrit at which efficiency is exactly 1.0 (%)
    pub reference_hematocrit_percent: f64,

    /// MNC yield multiplier (1.2 collection gain × 4 concentration factor)
    pub yield_multiplier: f64,

    /// Purity of the product at interface position zero
    pub purity_baseline: f64,

    /// Purity gain per unit of interface position
    pub purity_interface_slope: f64,

    /// Shape of the interface-position efficiency curve
    pub interface_policy: InterfacePolicy,
}

impl Default for ApheresisParameters {
    fn default() -> Self {
        Self {
            reference_hematocrit_percent: 40.0,
            yield_multiplier: 1.2 * 4.0,
            purity_baseline: 0.7,
            purity_interface_slope: 0.15,
            interface_policy: InterfacePolicy::LinearRamp,
        }
    }
}

impl ApheresisParameters {
    fn validate(&self) -> Result<(), ConfigurationError> {
        check_positive(
            PROFILE,
            "reference_hematocrit_percent",
            self.reference_hematocrit_percent,
        )?;
        check_positive(PROFILE, "yield_multiplier", self.yield_multiplier)?;
        check_bounds(PROFILE, "purity_baseline", self.purity_baseline, (0.0, 1.0))?;
        check_bounds(
            PROFILE,
            "purity_interface_slope",
            self.purity_interface_slope,
            (0.0, f64::MAX),
        )?;
        if let InterfacePolicy::TriangularPeak { optimum } = self.interface_policy {
            check_finite(PROFILE, "interface_policy.optimum", optimum)?;
        }
        Ok(())
    }
}

/// Lamp, geometry and self-shielding constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosimetryParameters {
    /// Fraction of electrical lamp power emitted as 254 nm UV-C
    pub lamp_efficiency: f64,

    /// Source-to-bag distance inside the laminar hood (cm)
    pub hood_distance_cm: f64,

    /// Source-to-bag distance used on an open bench (cm)
    pub open_distance_cm: f64,

    /// Shielding per unit MNC concentration (per 10⁶/mL)
    pub mnc_shielding_coefficient: f64,

    /// Shielding per unit RBC contamination (per 10⁹)
    pub rbc_shielding_coefficient: f64,

    /// Scale the RBC shielding term by hematocrit / reference hematocrit
    pub scale_rbc_shielding_by_hematocrit: bool,

    /// Minimum fraction of the transmitted dose that survives shielding (0.3-0.5)
    pub dose_floor_fraction: f64,
}

impl Default for DosimetryParameters {
    fn default() -> Self {
        Self {
            lamp_efficiency: 0.85,
            hood_distance_cm: 20.0,
            open_distance_cm: 15.0,
            mnc_shielding_coefficient: 0.01,
            rbc_shielding_coefficient: 0.02,
            scale_rbc_shielding_by_hematocrit: true,
            dose_floor_fraction: 0.5,
        }
    }
}

impl DosimetryParameters {
    fn validate(&self) -> Result<(), ConfigurationError> {
        check_positive(PROFILE, "lamp_efficiency", self.lamp_efficiency)?;
        check_bounds(PROFILE, "lamp_efficiency", self.lamp_efficiency, (0.0, 1.0))?;
        check_positive(PROFILE, "hood_distance_cm", self.hood_distance_cm)?;
        check_positive(PROFILE, "open_distance_cm", self.open_distance_cm)?;
        check_bounds(
            PROFILE,
            "mnc_shielding_coefficient",
            self.mnc_shielding_coefficient,
            (0.0, f64::MAX),
        )?;
        check_bounds(
            PROFILE,
            "rbc_shielding_coefficient",
            self.rbc_shielding_coefficient,
            (0.0, f64::MAX),
        )?;
        check_bounds(
            PROFILE,
            "dose_floor_fraction",
            self.dose_floor_fraction,
            (0.3, 0.5),
        )
    }
}

/// First-order UV inactivation constants and default plot axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViabilityParameters {
    /// Decay constant for target lymphocytes (cm²/J)
    pub target_decay_per_j_cm2: f64,

    /// Decay constant for bystander monocytes (cm²/J)
    pub monocyte_decay_per_j_cm2: f64,

    /// Points per default curve
    pub curve_samples: usize,

    /// Default dose axis extends to at least this dose (J/cm²)
    pub min_dose_axis_j_cm2: f64,

    /// Default time axis extends to at least this time (min)
    pub min_time_axis_min: f64,

    /// Default axes extend to this multiple of the computed dose/time
    pub axis_span_factor: f64,
}

impl Default for ViabilityParameters {
    fn default() -> Self {
        Self {
            target_decay_per_j_cm2: 1.0,
            monocyte_decay_per_j_cm2: 0.25,
            curve_samples: 100,
            min_dose_axis_j_cm2: 2.5,
            min_time_axis_min: 40.0,
            axis_span_factor: 2.0,
        }
    }
}

impl ViabilityParameters {
    fn validate(&self) -> Result<(), ConfigurationError> {
        check_bounds(
            PROFILE,
            "target_decay_per_j_cm2",
            self.target_decay_per_j_cm2,
            (0.0, f64::MAX),
        )?;
        check_bounds(
            PROFILE,
            "monocyte_decay_per_j_cm2",
            self.monocyte_decay_per_j_cm2,
            (0.0, f64::MAX),
        )?;
        check_bounds(
            PROFILE,
            "curve_samples",
            self.curve_samples as f64,
            (2.0, f64::MAX),
        )?;
        check_positive(PROFILE, "min_dose_axis_j_cm2", self.min_dose_axis_j_cm2)?;
        check_positive(PROFILE, "min_time_axis_min", self.min_time_axis_min)?;
        check_positive(PROFILE, "axis_span_factor", self.axis_span_factor)
    }
}

/// Accepted ranges for patient and lamp inputs.
///
/// Device-specific ranges (interface, flow, plasma removal, ACD) live on
/// the device profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    /// Total leukocyte count (×10³/µL)
    pub tlc_range: (f64, f64),
    /// Lymphocyte fraction (%)
    pub lymphocyte_percent_range: (f64, f64),
    /// Hematocrit (%)
    pub hematocrit_percent_range: (f64, f64),
    /// UV-C lamp power (W)
    pub lamp_power_range_w: (f64, f64),
    /// Prescribed dose (J/cm²)
    pub target_dose_range_j_cm2: (f64, f64),
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            tlc_range: (1.0, 50.0),
            lymphocyte_percent_range: (5.0, 90.0),
            hematocrit_percent_range: (15.0, 60.0),
            lamp_power_range_w: (5.0, 30.0),
            target_dose_range_j_cm2: (0.0, 6.0),
        }
    }
}

impl RequestLimits {
    fn validate(&self) -> Result<(), ConfigurationError> {
        check_range(PROFILE, "tlc_range", self.tlc_range)?;
        check_range(PROFILE, "lymphocyte_percent_range", self.lymphocyte_percent_range)?;
        check_range(PROFILE, "hematocrit_percent_range", self.hematocrit_percent_range)?;
        check_range(PROFILE, "lamp_power_range_w", self.lamp_power_range_w)?;
        check_range(PROFILE, "target_dose_range_j_cm2", self.target_dose_range_j_cm2)
    }
}
