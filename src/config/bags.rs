//! UV-C treatment bag optical profiles (254 nm).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{check_positive, read_json};
use crate::dosimetry::diffusion_transmission;
use crate::error::{ConfigurationError, ValidationError};

/// Optical properties of a bag/material combination filled with product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagProfile {
    /// Identifier used by requests
    pub id: String,
    /// Absorption coefficient μa (cm⁻¹)
    pub absorption_per_cm: f64,
    /// Scattering coefficient μs (cm⁻¹)
    pub scattering_per_cm: f64,
    /// Optical path thickness (cm)
    pub thickness_cm: f64,
}

impl BagProfile {
    pub fn polyethylene() -> Self {
        Self {
            id: "Spectra Optia (Polyethylene)".to_string(),
            absorption_per_cm: 0.9,
            scattering_per_cm: 5.5,
            thickness_cm: 0.20,
        }
    }

    pub fn pvc() -> Self {
        Self {
            id: "Haemonetics (PVC)".to_string(),
            absorption_per_cm: 1.3,
            scattering_per_cm: 7.0,
            thickness_cm: 0.25,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_positive(&self.id, "absorption_per_cm", self.absorption_per_cm)?;
        check_positive(&self.id, "scattering_per_cm", self.scattering_per_cm)?;
        check_positive(&self.id, "thickness_cm", self.thickness_cm)
    }

    /// Fraction of incident UV transmitted through the bag
    pub fn transmission(&self) -> f64 {
        diffusion_transmission(
            self.absorption_per_cm,
            self.scattering_per_cm,
            self.thickness_cm,
        )
    }
}

/// Read-only table of bag profiles keyed by identifier.
#[derive(Debug, Clone)]
pub struct BagCatalog {
    profiles: BTreeMap<String, BagProfile>,
}

impl BagCatalog {
    pub fn new(profiles: Vec<BagProfile>) -> Result<Self, ConfigurationError> {
        let mut map = BTreeMap::new();
        for profile in profiles {
            profile.validate()?;
            if map.contains_key(&profile.id) {
                return Err(ConfigurationError::DuplicateIdentifier(profile.id));
            }
            map.insert(profile.id.clone(), profile);
        }
        Ok(Self { profiles: map })
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        match read_json::<Vec<BagProfile>>(path.as_ref())? {
            Some(profiles) => {
                let catalog = Self::new(profiles)?;
                log::info!(
                    "Loaded {} bag profiles from {:?}",
                    catalog.len(),
                    path.as_ref()
                );
                Ok(catalog)
            }
            None => {
                log::info!("Bag profile file not found, using built-in table");
                Ok(Self::default())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<&BagProfile, ValidationError> {
        self.profiles
            .get(id)
            .ok_or_else(|| ValidationError::UnknownBag(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BagProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for BagCatalog {
    fn default() -> Self {
        let profiles = [BagProfile::polyethylene(), BagProfile::pvc()];
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        }
    }
}
