//! Validation tests for dose-response and time-response curves
//!
//! Key validation targets:
//! - 100% viability at x = 0 for both populations and any parameters
//! - Target lymphocytes more UV-sensitive than monocytes
//! - Time curve consistent with the dose delivered at the bag intensity
//! - Curves are lazy, finite and restartable

use ecp_simulator_x::{
    CellPopulation, CurveAxis, CurveDomain, TreatmentPlanner, TreatmentRequest, ViabilityModel,
};

// ============================================================================
// Boundary Conditions
// ============================================================================

#[test]
fn test_origin_is_full_viability_for_all_parameters() {
    let model = ViabilityModel::default();
    let domain = CurveDomain::new(0.0, 3.0, 50).unwrap();

    for transmission in [1e-6, 0.24, 0.4354, 1.0] {
        for purity in [0.7, 0.85, 1.0, 1.3] {
            let dose = model.dose_response(transmission, purity, domain);
            let time = model.time_response(transmission * 100.0, purity, domain);
            for population in CellPopulation::ALL {
                assert_eq!(dose.viability(population, 0.0), 100.0);
                assert_eq!(time.viability(population, 0.0), 100.0);
            }
            let first = dose.iter().next().unwrap();
            assert_eq!(first.target_viability_percent, 100.0);
            assert_eq!(first.monocyte_viability_percent, 100.0);
        }
    }
}

#[test]
fn test_viability_decreasing_along_curve() {
    let plan = TreatmentPlanner::default()
        .plan(&TreatmentRequest::default())
        .unwrap();

    for curve in [plan.dose_curve, plan.time_curve] {
        let points: Vec<_> = curve.iter().collect();
        for pair in points.windows(2) {
            assert!(pair[1].target_viability_percent < pair[0].target_viability_percent);
            assert!(pair[1].monocyte_viability_percent < pair[0].monocyte_viability_percent);
        }
    }
}

// ============================================================================
// Population Sensitivity
// ============================================================================

#[test]
fn test_target_cells_more_sensitive() {
    let plan = TreatmentPlanner::default()
        .plan(&TreatmentRequest::default())
        .unwrap();

    for point in plan.dose_curve.iter().skip(1) {
        assert!(
            point.target_viability_percent < point.monocyte_viability_percent,
            "at {:.2} J/cm²: T-cells {:.1}% vs monocytes {:.1}%",
            point.x,
            point.target_viability_percent,
            point.monocyte_viability_percent
        );
    }
}

#[test]
fn test_dose_curve_closed_form() {
    let model = ViabilityModel::default();
    let domain = CurveDomain::new(0.0, 2.5, 100).unwrap();
    let curve = model.dose_response(0.4354, 0.85, domain);

    let x = 1.7;
    let expected_t = 100.0 * (-1.0 * x * 0.4354 * 0.85_f64).exp();
    let expected_m = 100.0 * (-0.25 * x * 0.4354_f64).exp();
    assert!((curve.viability(CellPopulation::TargetLymphocytes, x) - expected_t).abs() < 1e-9);
    assert!((curve.viability(CellPopulation::Monocytes, x) - expected_m).abs() < 1e-9);
}

// ============================================================================
// Time Axis
// ============================================================================

#[test]
fn test_time_curve_matches_delivered_dose() {
    let planner = TreatmentPlanner::default();
    let plan = planner.plan(&TreatmentRequest::default()).unwrap();
    let result = plan.result;

    assert_eq!(plan.time_curve.axis(), CurveAxis::Time);

    // Dose delivered after t minutes at intensity I (mW/cm²)
    let t = result.exposure_time_min();
    let delivered = result.effective_intensity_mw_cm2() / 1000.0 * t * 60.0;
    assert!((delivered - result.effective_dose_j_cm2()).abs() < 1e-9);

    let expected = 100.0 * (-delivered * result.purity_factor()).exp();
    let actual = plan
        .time_curve
        .viability(CellPopulation::TargetLymphocytes, t);
    assert!((actual - expected).abs() < 1e-9, "{} vs {}", actual, expected);
}

// ============================================================================
// Laziness and Resampling
// ============================================================================

#[test]
fn test_curve_can_be_iterated_twice() {
    let plan = TreatmentPlanner::default()
        .plan(&TreatmentRequest::default())
        .unwrap();

    let a: Vec<_> = plan.dose_curve.iter().collect();
    let b: Vec<_> = plan.dose_curve.iter().collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), plan.dose_curve.domain().samples());
}

#[test]
fn test_caller_supplied_domain() {
    let planner = TreatmentPlanner::default();
    let result = planner.evaluate(&TreatmentRequest::default()).unwrap();
    let domain = CurveDomain::new(0.0, 1.5 * result.effective_dose_j_cm2(), 7).unwrap();
    let curve = planner.dose_response(&result, domain);

    let xs: Vec<f64> = curve.iter().map(|p| p.x).collect();
    assert_eq!(xs.len(), 7);
    assert_eq!(xs[0], 0.0);
    assert_eq!(xs[6], 1.5 * result.effective_dose_j_cm2());
}

#[test]
fn test_resample_preserves_closed_form() {
    let plan = TreatmentPlanner::default()
        .plan(&TreatmentRequest::default())
        .unwrap();
    let fine = plan
        .time_curve
        .resample(CurveDomain::new(0.0, 10.0, 1001).unwrap());

    let x = 3.3;
    assert_eq!(
        fine.viability(CellPopulation::Monocytes, x),
        plan.time_curve.viability(CellPopulation::Monocytes, x)
    );
    assert_eq!(fine.iter().count(), 1001);
}
