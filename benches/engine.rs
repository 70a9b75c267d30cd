//! Planner benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ecp_simulator_x::{CurveDomain, TreatmentPlanner, TreatmentRequest};

fn bench_evaluate(c: &mut Criterion) {
    let planner = TreatmentPlanner::default();
    let request = TreatmentRequest::default();

    c.bench_function("evaluate", |b| {
        b.iter(|| planner.evaluate(black_box(&request)))
    });
}

fn bench_plan(c: &mut Criterion) {
    let planner = TreatmentPlanner::default();
    let request = TreatmentRequest::default();

    c.bench_function("plan", |b| b.iter(|| planner.plan(black_box(&request))));
}

fn bench_curve_sampling(c: &mut Criterion) {
    let planner = TreatmentPlanner::default();
    let result = planner
        .evaluate(&TreatmentRequest::default())
        .expect("default request is valid");
    let domain = CurveDomain::new(0.0, 5.0, 10_000).expect("valid domain");
    let curve = planner.dose_response(&result, domain);

    c.bench_function("dose_curve_10k", |b| {
        b.iter(|| black_box(&curve).iter().map(|p| p.target_viability_percent).sum::<f64>())
    });
}

criterion_group!(benches, bench_evaluate, bench_plan, bench_curve_sampling);
criterion_main!(benches);
