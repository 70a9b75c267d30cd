//! Configuration module for model constants and the static profile tables.
//!
//! Device and bag tables are loaded once at process start and are read-only
//! afterwards. Adding a device or bag is a data-file edit.

mod bags;
mod devices;
mod parameters;

pub use bags::{BagCatalog, BagProfile};
pub use devices::{DeviceCatalog, DeviceProfile};
pub use parameters::{
    ApheresisParameters, DosimetryParameters, EngineParameters, RequestLimits,
    ViabilityParameters,
};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigurationError;

/// Read and parse a JSON file.
///
/// A missing file yields `Ok(None)` so callers can fall back to built-in
/// tables. Any other failure is a configuration error.
pub(crate) fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, ConfigurationError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigurationError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigurationError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Validate a closed `(low, high)` range used as a normalisation denominator.
pub(crate) fn check_range(
    profile: &str,
    field: &'static str,
    (low, high): (f64, f64),
) -> Result<(), ConfigurationError> {
    check_finite(profile, field, low)?;
    check_finite(profile, field, high)?;
    if low == high {
        return Err(ConfigurationError::EmptyRange {
            profile: profile.to_string(),
            field,
            low,
            high,
        });
    }
    if low > high {
        return Err(ConfigurationError::InvertedRange {
            profile: profile.to_string(),
            field,
            low,
            high,
        });
    }
    Ok(())
}

/// Reject NaN and infinite values.
pub(crate) fn check_finite(
    profile: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NonFinite {
            profile: profile.to_string(),
            field,
            value,
        })
    }
}

/// Validate a strictly positive, finite coefficient.
pub(crate) fn check_positive(
    profile: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive {
            profile: profile.to_string(),
            field,
            value,
        })
    }
}

/// Validate `value ∈ [min, max]` for a configured coefficient.
pub(crate) fn check_bounds(
    profile: &str,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ConfigurationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfBounds {
            profile: profile.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}
