//! Treatment planner: validation followed by the two model stages.
//!
//! Stateless. Every call to [`TreatmentPlanner::evaluate`] is an independent
//! pure computation over the immutable profile tables, so a planner can be
//! shared freely between threads.

use std::path::Path;

use crate::apheresis::{ApheresisModel, InterfacePolicy};
use crate::config::{BagCatalog, DeviceCatalog, EngineParameters};
use crate::dosimetry::{DoseInputs, DosimetryModel};
use crate::error::{ConfigurationError, Result};
use crate::viability::{CurveDomain, ResponseCurve, ViabilityModel};

use super::{TreatmentPlan, TreatmentRequest, TreatmentResult};

/// File names looked up by [`TreatmentPlanner::load_from_dir`]
pub const ENGINE_PARAMETERS_FILE: &str = "engine.json";
pub const DEVICE_PROFILES_FILE: &str = "devices.json";
pub const BAG_PROFILES_FILE: &str = "bags.json";

#[derive(Debug, Clone)]
pub struct TreatmentPlanner {
    params: EngineParameters,
    devices: DeviceCatalog,
    bags: BagCatalog,
    apheresis: ApheresisModel,
    dosimetry: DosimetryModel,
    viability: ViabilityModel,
}

impl Default for TreatmentPlanner {
    fn default() -> Self {
        Self::from_validated(
            EngineParameters::default(),
            DeviceCatalog::default(),
            BagCatalog::default(),
        )
    }
}

impl TreatmentPlanner {
    pub fn new(
        params: EngineParameters,
        devices: DeviceCatalog,
        bags: BagCatalog,
    ) -> std::result::Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self::from_validated(params, devices, bags))
    }

    fn from_validated(params: EngineParameters, devices: DeviceCatalog, bags: BagCatalog) -> Self {
        Self {
            apheresis: ApheresisModel::new(params.apheresis.clone()),
            dosimetry: DosimetryModel::new(params.dosimetry.clone()),
            viability: ViabilityModel::new(params.viability.clone()),
            params,
            devices,
            bags,
        }
    }

    /// Load parameters and profile tables from a directory.
    ///
    /// Missing files fall back to built-in defaults; malformed files are fatal.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> std::result::Result<Self, ConfigurationError> {
        let dir = dir.as_ref();
        let params = EngineParameters::load_or_default(dir.join(ENGINE_PARAMETERS_FILE))?;
        let devices = DeviceCatalog::load_or_default(dir.join(DEVICE_PROFILES_FILE))?;
        let bags = BagCatalog::load_or_default(dir.join(BAG_PROFILES_FILE))?;
        Self::new(params, devices, bags)
    }

    /// Same tables with a different interface-position policy
    pub fn with_interface_policy(
        self,
        policy: InterfacePolicy,
    ) -> std::result::Result<Self, ConfigurationError> {
        let mut params = self.params;
        params.apheresis.interface_policy = policy;
        Self::new(params, self.devices, self.bags)
    }

    pub fn parameters(&self) -> &EngineParameters {
        &self.params
    }

    pub fn devices(&self) -> &DeviceCatalog {
        &self.devices
    }

    pub fn bags(&self) -> &BagCatalog {
        &self.bags
    }

    pub fn interface_policy(&self) -> InterfacePolicy {
        self.apheresis.interface_policy()
    }

    /// Validate the request and compute all derived quantities.
    pub fn evaluate(&self, request: &TreatmentRequest) -> Result<TreatmentResult> {
        let device = self.devices.get(&request.device_id)?;
        let bag = self.bags.get(&request.bag_id)?;
        request.validate(device, &self.params.limits)?;

        let collection = self
            .apheresis
            .evaluate(device, &request.collection_inputs())?;

        let hematocrit_ratio =
            request.hematocrit_percent / self.params.apheresis.reference_hematocrit_percent;
        let delivery = self.dosimetry.evaluate(
            bag,
            &DoseInputs {
                lamp_power_w: request.lamp_power_w,
                target_dose_j_cm2: request.target_dose_j_cm2,
                placement: request.placement,
                hematocrit_ratio,
                mnc_concentration: collection.mnc_concentration,
                rbc_contamination: collection.rbc_contamination,
            },
        )?;

        Ok(TreatmentResult {
            interface_policy: self.interface_policy(),
            collection,
            delivery,
        })
    }

    /// Evaluate and attach response curves over the default domains.
    pub fn plan(&self, request: &TreatmentRequest) -> Result<TreatmentPlan> {
        let result = self.evaluate(request)?;
        let dose_domain = self
            .viability
            .default_dose_domain(result.effective_dose_j_cm2())?;
        let time_domain = self
            .viability
            .default_time_domain(result.exposure_time_min())?;

        Ok(TreatmentPlan {
            result,
            dose_curve: self.dose_response(&result, dose_domain),
            time_curve: self.time_response(&result, time_domain),
        })
    }

    pub fn dose_response(&self, result: &TreatmentResult, domain: CurveDomain) -> ResponseCurve {
        self.viability
            .dose_response(result.transmission(), result.purity_factor(), domain)
    }

    pub fn time_response(&self, result: &TreatmentResult, domain: CurveDomain) -> ResponseCurve {
        self.viability.time_response(
            result.effective_intensity_mw_cm2(),
            result.purity_factor(),
            domain,
        )
    }
}
