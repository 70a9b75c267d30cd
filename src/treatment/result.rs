//! Derived treatment quantities.

use serde::{Deserialize, Serialize};

use crate::apheresis::{ApheresisPerformance, InterfacePolicy};
use crate::dosimetry::DoseDelivery;
use crate::viability::ResponseCurve;

/// Immutable result of one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreatmentResult {
    /// Interface policy that produced `collection.interface_factor`
    pub interface_policy: InterfacePolicy,
    pub collection: ApheresisPerformance,
    pub delivery: DoseDelivery,
}

impl TreatmentResult {
    pub fn hct_efficiency(&self) -> f64 {
        self.collection.hct_efficiency
    }

    pub fn purity_factor(&self) -> f64 {
        self.collection.purity_factor
    }

    pub fn mnc_concentration(&self) -> f64 {
        self.collection.mnc_concentration
    }

    pub fn rbc_contamination(&self) -> f64 {
        self.collection.rbc_contamination
    }

    pub fn transmission(&self) -> f64 {
        self.delivery.transmission
    }

    pub fn effective_intensity_mw_cm2(&self) -> f64 {
        self.delivery.effective_intensity_mw_cm2
    }

    pub fn effective_dose_j_cm2(&self) -> f64 {
        self.delivery.effective_dose_j_cm2
    }

    pub fn exposure_time_min(&self) -> f64 {
        self.delivery.exposure_time_min
    }
}

/// Result plus its dose-domain and time-domain response curves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreatmentPlan {
    pub result: TreatmentResult,
    pub dose_curve: ResponseCurve,
    pub time_curve: ResponseCurve,
}
