//! Treatment planning: requests, results and the planner that connects the
//! apheresis, dosimetry and viability stages.
//!
//! Data flows one way: collection estimates feed the shielding term of the
//! dosimetry stage, whose dose and intensity parameterise the response curves.

mod diagnostics;
mod planner;
mod request;
mod result;

pub use diagnostics::TreatmentDiagnostics;
pub use planner::{
    TreatmentPlanner, BAG_PROFILES_FILE, DEVICE_PROFILES_FILE, ENGINE_PARAMETERS_FILE,
};
pub use request::TreatmentRequest;
pub use result::{TreatmentPlan, TreatmentResult};
