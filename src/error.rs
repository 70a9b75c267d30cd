//! Error taxonomy for the treatment-planning engine.
//!
//! Three families of failure exist and none of them is transient:
//! - [`ConfigurationError`]: a device/bag table or parameter file is malformed.
//!   Raised while loading, before any request is evaluated.
//! - [`ValidationError`]: a request names an unknown profile or carries a value
//!   outside its declared range. Raised before any dosimetry is computed.
//! - [`DegenerateResultError`]: the inputs were in range but the geometry makes
//!   the light-transport result meaningless (zero intensity, infinite time).

use thiserror::Error;

/// Configuration errors, fatal at load time.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A range whose bounds are equal (would divide by zero when normalising).
    #[error("{profile}: {field} range has zero width ({low} == {high})")]
    EmptyRange {
        profile: String,
        field: &'static str,
        low: f64,
        high: f64,
    },

    /// A range whose lower bound exceeds its upper bound.
    #[error("{profile}: {field} range is inverted ({low} > {high})")]
    InvertedRange {
        profile: String,
        field: &'static str,
        low: f64,
        high: f64,
    },

    /// A bound or coefficient that is NaN or infinite.
    #[error("{profile}: {field} must be finite, got {value}")]
    NonFinite {
        profile: String,
        field: &'static str,
        value: f64,
    },

    /// A coefficient that must be strictly positive and finite.
    #[error("{profile}: {field} must be positive and finite, got {value}")]
    NonPositive {
        profile: String,
        field: &'static str,
        value: f64,
    },

    /// A coefficient outside its admissible interval.
    #[error("{profile}: {field} = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        profile: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Two profiles in one table share an identifier.
    #[error("duplicate profile identifier: {0}")]
    DuplicateIdentifier(String),

    /// Configuration file exists but could not be read.
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    /// Configuration file could not be parsed.
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Request validation errors, surfaced before any computation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("unknown apheresis device: {0}")]
    UnknownDevice(String),

    #[error("unknown treatment bag: {0}")]
    UnknownBag(String),

    /// Field outside its declared range (NaN always lands here).
    #[error("{field} = {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Hematocrit so far from the reference that collection efficiency vanishes.
    #[error("hematocrit {hematocrit}% gives non-positive collection efficiency ({efficiency:.3})")]
    NonPositiveEfficiency { hematocrit: f64, efficiency: f64 },

    /// Curve sampling domain that cannot be iterated.
    #[error("invalid curve domain [{start}, {end}] with {samples} samples")]
    InvalidDomain { start: f64, end: f64, samples: usize },
}

/// Degenerate light-transport results.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DegenerateResultError {
    #[error("source distance must be positive and finite, got {distance_cm} cm")]
    NonPositiveDistance { distance_cm: f64 },

    #[error("effective UV intensity is zero or non-finite ({intensity_mw_per_cm2} mW/cm²)")]
    ZeroIntensity { intensity_mw_per_cm2: f64 },

    #[error("exposure time is not finite ({exposure_time_min} min)")]
    NonFiniteExposureTime { exposure_time_min: f64 },
}

/// Top-level engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("degenerate result: {0}")]
    DegenerateResult(#[from] DegenerateResultError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Check `value ∈ [min, max]`; NaN is always out of range.
pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> std::result::Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
