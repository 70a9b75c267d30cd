//! Apheresis device profiles.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{check_bounds, check_positive, check_range, read_json};
use crate::error::{ConfigurationError, ValidationError};

/// Operating envelope and empirical coefficients of one apheresis system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Identifier used by requests (e.g. "Spectra Optia")
    pub id: String,

    /// Supported interface positions (machine units)
    pub interface_range: (f64, f64),

    /// Supported inlet flow rates (mL/min)
    pub flow_range_ml_per_min: (f64, f64),

    /// Supported plasma removal (% of processed volume)
    pub plasma_removal_range_percent: (f64, f64),

    /// Supported anticoagulant ratios (1:X, the X value)
    pub acd_ratio_range: (f64, f64),

    /// Sensitivity of collection efficiency to hematocrit deviation from 40 % (0-1)
    pub hct_impact: f64,

    /// Red-cell contamination at reference hematocrit and no plasma removal (×10⁹)
    /// Midpoint of the 2-5 ×10⁹ contamination typically seen in MNC products
    pub rbc_contamination_base: f64,

    /// Plasma removal (%) at which the contamination estimate would reach zero.
    /// Must exceed the upper bound of `plasma_removal_range_percent`.
    pub plasma_removal_normalization_percent: f64,
}

impl DeviceProfile {
    /// Spectra Optia continuous-flow system
    pub fn spectra_optia() -> Self {
        Self {
            id: "Spectra Optia".to_string(),
            interface_range: (0.5, 2.0),
            flow_range_ml_per_min: (40.0, 70.0),
            plasma_removal_range_percent: (5.0, 25.0),
            acd_ratio_range: (12.0, 16.0),
            hct_impact: 0.3,
            rbc_contamination_base: 3.5,
            plasma_removal_normalization_percent: 30.0,
        }
    }

    /// Haemonetics intermittent-flow system
    pub fn haemonetics() -> Self {
        Self {
            id: "Haemonetics".to_string(),
            interface_range: (0.5, 2.0),
            flow_range_ml_per_min: (40.0, 65.0),
            plasma_removal_range_percent: (5.0, 20.0),
            acd_ratio_range: (12.0, 15.0),
            hct_impact: 0.7,
            rbc_contamination_base: 3.5,
            plasma_removal_normalization_percent: 25.0,
        }
    }

    /// Reject profiles that would divide by zero or produce negative contamination.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let id = self.id.as_str();
        check_range(id, "interface_range", self.interface_range)?;
        check_range(id, "flow_range_ml_per_min", self.flow_range_ml_per_min)?;
        check_range(
            id,
            "plasma_removal_range_percent",
            self.plasma_removal_range_percent,
        )?;
        check_range(id, "acd_ratio_range", self.acd_ratio_range)?;
        check_bounds(id, "hct_impact", self.hct_impact, (0.0, 1.0))?;
        check_positive(id, "rbc_contamination_base", self.rbc_contamination_base)?;
        check_positive(
            id,
            "plasma_removal_normalization_percent",
            self.plasma_removal_normalization_percent,
        )?;

        let upper = self.plasma_removal_range_percent.1;
        if self.plasma_removal_normalization_percent <= upper {
            return Err(ConfigurationError::OutOfBounds {
                profile: self.id.clone(),
                field: "plasma_removal_normalization_percent",
                value: self.plasma_removal_normalization_percent,
                min: upper,
                max: f64::INFINITY,
            });
        }
        Ok(())
    }
}

/// Read-only table of device profiles keyed by identifier.
#[derive(Debug, Clone)]
pub struct DeviceCatalog {
    profiles: BTreeMap<String, DeviceProfile>,
}

impl DeviceCatalog {
    /// Build a catalog, validating every profile.
    pub fn new(profiles: Vec<DeviceProfile>) -> Result<Self, ConfigurationError> {
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

    /// Load from a JSON array of profiles, or use the built-in table if the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        match read_json::<Vec<DeviceProfile>>(path.as_ref())? {
            Some(profiles) => {
                let catalog = Self::new(profiles)?;
                log::info!(
                    "Loaded {} device profiles from {:?}",
                    catalog.len(),
                    path.as_ref()
                );
                Ok(catalog)
            }
            None => {
                log::info!("Device profile file not found, using built-in table");
                Ok(Self::default())
            }
        }
    }

    /// Look up a profile by identifier.
    pub fn get(&self, id: &str) -> Result<&DeviceProfile, ValidationError> {
        self.profiles
            .get(id)
            .ok_or_else(|| ValidationError::UnknownDevice(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        let profiles = [DeviceProfile::spectra_optia(), DeviceProfile::haemonetics()];
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        assert!(DeviceProfile::spectra_optia().validate().is_ok());
        assert!(DeviceProfile::haemonetics().validate().is_ok());
    }

    #[test]
    fn test_zero_width_flow_range_rejected() {
        let mut profile = DeviceProfile::spectra_optia();
        profile.flow_range_ml_per_min = (50.0, 50.0);
        assert!(matches!(
            DeviceCatalog::new(vec![profile]),
            Err(ConfigurationError::EmptyRange { field: "flow_range_ml_per_min", .. })
        ));
    }

    #[test]
    fn test_normalization_below_plasma_range_rejected() {
        let mut profile = DeviceProfile::spectra_optia();
        profile.plasma_removal_normalization_percent = 20.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let result = DeviceCatalog::new(vec![
            DeviceProfile::haemonetics(),
            DeviceProfile::haemonetics(),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateIdentifier("Haemonetics".into())
        );
    }

    #[test]
    fn test_lookup() {
        let catalog = DeviceCatalog::default();
        assert_eq!(catalog.len(), 2);
        assert!((catalog.get("Haemonetics").unwrap().hct_impact - 0.7).abs() < 1e-12);
        assert_eq!(
            catalog.get("Amicus").unwrap_err(),
            ValidationError::UnknownDevice("Amicus".into())
        );
    }
}
