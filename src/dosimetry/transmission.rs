//! UV transmission through a turbid treatment bag.
//!
//! Uses the diffusion approximation for light transport in a scattering
//! medium. The effective attenuation coefficient is
//!
//! μ_eff = sqrt(3 · μa · (μa + μs))
//!
//! and the transmitted fraction through thickness d is T = exp(−μ_eff · d).
//!
//! Reference: Star WM. Diffusion theory of light transport. In: Welch AJ,
//! van Gemert MJC (eds). Optical-Thermal Response of Laser-Irradiated Tissue, 1995

/// Effective attenuation coefficient μ_eff (cm⁻¹)
pub fn effective_attenuation(absorption_per_cm: f64, scattering_per_cm: f64) -> f64 {
    (3.0 * absorption_per_cm * (absorption_per_cm + scattering_per_cm)).sqrt()
}

/// Transmitted fraction, in (0, 1] for finite non-negative coefficients.
///
/// Strictly decreasing in each of absorption, scattering and thickness
/// while the other two are positive.
pub fn diffusion_transmission(
    absorption_per_cm: f64,
    scattering_per_cm: f64,
    thickness_cm: f64,
) -> f64 {
    (-effective_attenuation(absorption_per_cm, scattering_per_cm) * thickness_cm).exp()
}
