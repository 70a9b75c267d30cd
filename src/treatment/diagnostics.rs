//! Clinical-guidance diagnostics for a computed plan.

use crate::viability::CellPopulation;

use super::TreatmentPlan;

/// Transmission below which the bag blocks most of the UV
const LOW_TRANSMISSION: f64 = 0.3;
/// Exposure time (min) beyond which a session becomes impractical
const LONG_EXPOSURE_MIN: f64 = 60.0;
/// Target-cell viability (%) at the delivered dose above which inactivation is weak
const RESIDUAL_TARGET_VIABILITY_PERCENT: f64 = 50.0;

/// Metrics, status lines and warnings for display.
#[derive(Debug, Clone, Default)]
pub struct TreatmentDiagnostics {
    pub metrics: Vec<(String, f64)>,
    pub status: Vec<String>,
    pub warnings: Vec<String>,
}

impl TreatmentDiagnostics {
    pub fn from_plan(plan: &TreatmentPlan) -> Self {
        let result = &plan.result;
        let delivery = &result.delivery;
        let mut diag = Self::default();

        diag.add_metric("MNC concentration (×10⁶/mL)", result.mnc_concentration());
        diag.add_metric("RBC contamination (×10⁹)", result.rbc_contamination());
        diag.add_metric("T-cell purity factor", result.purity_factor());
        diag.add_metric("UV transmission (%)", result.transmission() * 100.0);
        diag.add_metric("Effective intensity (mW/cm²)", result.effective_intensity_mw_cm2());
        diag.add_metric("Shielding fraction", delivery.shielding_fraction);
        diag.add_metric("Effective dose (J/cm²)", result.effective_dose_j_cm2());
        diag.add_metric("Treatment time (min)", result.exposure_time_min());

        // The time curve already carries transmission through the intensity.
        let residual = plan
            .time_curve
            .viability(CellPopulation::TargetLymphocytes, result.exposure_time_min());
        diag.add_metric("T-cell viability at delivered dose (%)", residual);

        diag.add_status(&format!("Interface policy: {}", result.interface_policy));
        diag.add_status(&format!(
            "Source distance: {:.1} cm",
            delivery.source_distance_cm
        ));

        if delivery.floor_engaged {
            diag.add_warning(&format!(
                "Shielding {:.2} exceeds the dose floor; delivered dose is floor-limited",
                delivery.shielding_fraction
            ));
        }
        if result.transmission() < LOW_TRANSMISSION {
            diag.add_warning(&format!(
                "Bag transmits only {:.1}% of incident UV",
                result.transmission() * 100.0
            ));
        }
        if result.exposure_time_min() > LONG_EXPOSURE_MIN {
            diag.add_warning(&format!(
                "Treatment time {:.1} min exceeds {:.0} min",
                result.exposure_time_min(),
                LONG_EXPOSURE_MIN
            ));
        }
        if residual > RESIDUAL_TARGET_VIABILITY_PERCENT {
            diag.add_warning(&format!(
                "T-cell viability stays at {:.1}% after the delivered dose",
                residual
            ));
        }

        diag
    }

    pub fn add_metric(&mut self, name: &str, value: f64) {
        self.metrics.push((name.to_string(), value));
    }

    pub fn add_status(&mut self, msg: &str) {
        self.status.push(msg.to_string());
    }

    pub fn add_warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    /// Print a formatted summary
    pub fn print_summary(&self) {
        println!("=== ECP Treatment Plan ===");
        println!();

        if !self.metrics.is_empty() {
            println!("Metrics:");
            for (name, value) in &self.metrics {
                println!("  {}: {:.3}", name, value);
            }
            println!();
        }

        if !self.status.is_empty() {
            println!("Status:");
            for msg in &self.status {
                println!("  {}", msg);
            }
            println!();
        }

        if !self.warnings.is_empty() {
            println!("Warnings:");
            for msg in &self.warnings {
                println!("  {}", msg);
            }
        }
    }
}
