//! ECP Simulator X - extracorporeal photopheresis treatment-planning engine
//!
//! This library estimates the collected apheresis product, UV-C transmission
//! through the treatment bag, the delivered dose and exposure time, and the
//! resulting viability curves for target lymphocytes and monocytes.
//!
//! All computations are pure: a [`TreatmentPlanner`] holds only immutable
//! profile tables and model constants.

pub mod apheresis;
pub mod config;
pub mod dosimetry;
pub mod error;
pub mod export;
pub mod treatment;
pub mod viability;

pub use apheresis::{ApheresisModel, ApheresisPerformance, CollectionInputs, InterfacePolicy};
pub use config::{BagCatalog, BagProfile, DeviceCatalog, DeviceProfile, EngineParameters};
pub use dosimetry::{diffusion_transmission, DoseDelivery, DosimetryModel, SourcePlacement};
pub use error::{ConfigurationError, DegenerateResultError, EngineError, Result, ValidationError};
pub use treatment::{
    TreatmentDiagnostics, TreatmentPlan, TreatmentPlanner, TreatmentRequest, TreatmentResult,
};
pub use viability::{
    CellPopulation, CurveAxis, CurveDomain, CurvePoints, ResponseCurve, ViabilityModel,
    ViabilityPoint,
};
