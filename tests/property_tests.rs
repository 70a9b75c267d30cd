//! Property tests for bounds, monotonicity and determinism

use ecp_simulator_x::{
    diffusion_transmission, ApheresisModel, CellPopulation, CurveDomain, DeviceProfile,
    DosimetryModel, TreatmentPlanner, TreatmentRequest, ViabilityModel,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn transmission_in_unit_interval(
        a in 1e-3f64..10.0,
        s in 1e-3f64..100.0,
        d in 1e-3f64..2.0,
    ) {
        let t = diffusion_transmission(a, s, d);
        prop_assert!(t > 0.0 && t <= 1.0);
    }

    #[test]
    fn transmission_strictly_decreasing(
        a in 0.01f64..5.0,
        s in 0.01f64..50.0,
        d in 0.01f64..1.0,
        bump in 0.01f64..1.0,
    ) {
        let t = diffusion_transmission(a, s, d);
        prop_assert!(diffusion_transmission(a + bump, s, d) < t);
        prop_assert!(diffusion_transmission(a, s + bump, d) < t);
        prop_assert!(diffusion_transmission(a, s, d + bump) < t);
    }

    #[test]
    fn unit_efficiency_at_reference(impact in 0.0f64..=1.0) {
        let device = DeviceProfile { hct_impact: impact, ..DeviceProfile::haemonetics() };
        prop_assert_eq!(ApheresisModel::default().hematocrit_efficiency(&device, 40.0), 1.0);
    }

    #[test]
    fn rbc_contamination_monotonic(
        hct in 15.0f64..60.0,
        hct_step in 0.0f64..10.0,
        plasma in 5.0f64..20.0,
        plasma_step in 0.0f64..5.0,
    ) {
        let model = ApheresisModel::default();
        let device = DeviceProfile::spectra_optia();
        let base = model.rbc_contamination(&device, hct, plasma);
        prop_assert!(model.rbc_contamination(&device, hct + hct_step, plasma) >= base);
        prop_assert!(model.rbc_contamination(&device, hct, plasma + plasma_step) <= base);
    }

    #[test]
    fn effective_dose_never_below_floor(
        target in 0.0f64..6.0,
        t in 0.01f64..=1.0,
        shielding in 0.0f64..20.0,
    ) {
        let model = DosimetryModel::default();
        let floor = model.params.dose_floor_fraction;
        let dose = model.effective_dose(target, t, shielding);
        prop_assert!(dose >= target * t * floor);
        prop_assert!(dose <= target * t);
    }

    #[test]
    fn viability_full_at_origin(
        transmission in 1e-6f64..=1.0,
        purity in 0.5f64..1.5,
        intensity in 1e-3f64..100.0,
    ) {
        let model = ViabilityModel::default();
        let domain = CurveDomain::new(0.0, 1.0, 2).unwrap();
        let dose = model.dose_response(transmission, purity, domain);
        let time = model.time_response(intensity, purity, domain);
        for population in CellPopulation::ALL {
            prop_assert_eq!(dose.viability(population, 0.0), 100.0);
            prop_assert_eq!(time.viability(population, 0.0), 100.0);
        }
    }

    #[test]
    fn evaluation_is_deterministic(
        tlc in 1.0f64..50.0,
        lymph in 5.0f64..90.0,
        hct in 15.0f64..60.0,
        flow in 40.0f64..65.0,
        interface in 0.5f64..2.0,
        plasma in 5.0f64..20.0,
        dose in 0.0f64..6.0,
    ) {
        let planner = TreatmentPlanner::default();
        let request = TreatmentRequest {
            tlc_k_per_ul: tlc,
            lymphocyte_percent: lymph,
            hematocrit_percent: hct,
            flow_rate_ml_per_min: flow,
            interface_position: interface,
            plasma_removal_percent: plasma,
            target_dose_j_cm2: dose,
            ..Default::default()
        };
        let first = planner.evaluate(&request).unwrap();
        let second = planner.evaluate(&request).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!(first.exposure_time_min().is_finite());
    }
}
