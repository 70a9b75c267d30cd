//! ECP Simulator X - Entry point
//!
//! One-shot treatment calculation from the command line.
//!
//! CLI Usage:
//!   cargo run                                   # Default Spectra Optia run
//!   cargo run -- --device Haemonetics --bag "Haemonetics (PVC)" --flow 55
//!   cargo run -- --policy triangular --optimum 1.25 --export
//!   cargo run -- --list                         # Show loaded devices and bags

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ecp_simulator_x::{
    export::{export_curves_csv, export_result_json},
    CellPopulation, InterfacePolicy, ResponseCurve, SourcePlacement, TreatmentDiagnostics,
    TreatmentPlanner, TreatmentRequest,
};

#[derive(Parser)]
#[command(
    name = "ecp-simulator-x",
    version,
    about = "Extracorporeal photopheresis UV-C dose and treatment-time calculator"
)]
struct Cli {
    /// Directory holding engine.json, devices.json and bags.json.
    #[arg(long = "config-dir", value_name = "DIR", default_value = "data/parameters")]
    config_dir: PathBuf,

    /// Print the loaded device and bag profiles and exit.
    #[arg(long)]
    list: bool,

    /// Apheresis system.
    #[arg(long, default_value = "Spectra Optia")]
    device: String,

    /// Treatment bag.
    #[arg(long, default_value = "Spectra Optia (Polyethylene)")]
    bag: String,

    /// Total leukocyte count (×10³/µL).
    #[arg(long, default_value_t = 8.0)]
    tlc: f64,

    /// Lymphocyte fraction (%).
    #[arg(long = "lymph", default_value_t = 30.0)]
    lymphocyte_percent: f64,

    /// Hematocrit (%).
    #[arg(long = "hct", default_value_t = 40.0)]
    hematocrit_percent: f64,

    /// UV-C lamp power (W).
    #[arg(long = "lamp-power", default_value_t = 15.0)]
    lamp_power_w: f64,

    /// Target dose (J/cm²).
    #[arg(long = "dose", default_value_t = 1.0)]
    target_dose_j_cm2: f64,

    /// Irradiate on an open bench instead of in the laminar hood.
    #[arg(long = "no-hood", conflicts_with = "distance_cm")]
    no_hood: bool,

    /// Explicit source-to-bag distance (cm).
    #[arg(long = "distance", value_name = "CM")]
    distance_cm: Option<f64>,

    /// Interface position.
    #[arg(long = "interface", default_value_t = 1.0)]
    interface_position: f64,

    /// Flow rate (mL/min).
    #[arg(long = "flow", default_value_t = 50.0)]
    flow_rate_ml_per_min: f64,

    /// Plasma removal (%).
    #[arg(long = "plasma-removal", default_value_t = 15.0)]
    plasma_removal_percent: f64,

    /// Anticoagulant ratio (1:X).
    #[arg(long = "acd", default_value_t = 13.0)]
    acd_ratio: f64,

    /// Interface efficiency curve (overrides the configured policy).
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Optimum interface position for the triangular policy [default: 1.25].
    #[arg(long, requires = "policy")]
    optimum: Option<f64>,

    /// Write the result as JSON and both curves as CSV.
    #[arg(long)]
    export: bool,

    /// Export directory.
    #[arg(long = "export-dir", value_name = "DIR", default_value = "exports")]
    export_dir: PathBuf,
}

/// Triangular optimum when `--optimum` is not given
const DEFAULT_OPTIMUM: f64 = 1.25;

/// Rows printed per response table
const TABLE_ROWS: usize = 10;

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Linear,
    Triangular,
}

impl Cli {
    fn request(&self) -> TreatmentRequest {
        let placement = match (self.no_hood, self.distance_cm) {
            (_, Some(distance_cm)) => SourcePlacement::Distance { distance_cm },
            (true, None) => SourcePlacement::OpenBench,
            (false, None) => SourcePlacement::LaminarHood,
        };

        TreatmentRequest {
            device_id: self.device.clone(),
            bag_id: self.bag.clone(),
            tlc_k_per_ul: self.tlc,
            lymphocyte_percent: self.lymphocyte_percent,
            hematocrit_percent: self.hematocrit_percent,
            lamp_power_w: self.lamp_power_w,
            target_dose_j_cm2: self.target_dose_j_cm2,
            placement,
            interface_position: self.interface_position,
            flow_rate_ml_per_min: self.flow_rate_ml_per_min,
            plasma_removal_percent: self.plasma_removal_percent,
            acd_ratio: self.acd_ratio,
        }
    }

    fn policy(&self) -> Result<Option<InterfacePolicy>> {
        let policy = match (self.policy, self.optimum) {
            (None, _) => None,
            (Some(PolicyArg::Linear), Some(optimum)) => {
                bail!("--optimum {} has no effect with --policy linear", optimum)
            }
            (Some(PolicyArg::Linear), None) => Some(InterfacePolicy::LinearRamp),
            (Some(PolicyArg::Triangular), optimum) => Some(InterfacePolicy::TriangularPeak {
                optimum: optimum.unwrap_or(DEFAULT_OPTIMUM),
            }),
        };
        Ok(policy)
    }
}

fn print_profiles(planner: &TreatmentPlanner) {
    println!("=== Apheresis Devices ===");
    for device in planner.devices().iter() {
        println!(
            "  {}: interface {:?}, flow {:?} mL/min, plasma removal {:?}%, ACD 1:{:?}, hct impact {}",
            device.id,
            device.interface_range,
            device.flow_range_ml_per_min,
            device.plasma_removal_range_percent,
            device.acd_ratio_range,
            device.hct_impact
        );
    }
    println!();
    println!("=== Treatment Bags ===");
    for bag in planner.bags().iter() {
        println!(
            "  {}: μa {} cm⁻¹, μs {} cm⁻¹, {} cm, T = {:.1}%",
            bag.id,
            bag.absorption_per_cm,
            bag.scattering_per_cm,
            bag.thickness_cm,
            bag.transmission() * 100.0
        );
    }
}

fn print_curve(title: &str, unit: &str, curve: &ResponseCurve) {
    println!();
    println!("=== {} ===", title);
    let step = (curve.domain().samples() / TABLE_ROWS).max(1);
    for point in curve.iter().step_by(step) {
        println!(
            "  {:6.2} {:<6} {}: {:5.1}%  {}: {:5.1}%",
            point.x,
            unit,
            CellPopulation::TargetLymphocytes.label(),
            point.target_viability_percent,
            CellPopulation::Monocytes.label(),
            point.monocyte_viability_percent
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let policy = cli.policy()?;
    let mut planner = TreatmentPlanner::load_from_dir(&cli.config_dir)
        .with_context(|| format!("loading configuration from {}", cli.config_dir.display()))?;
    if let Some(policy) = policy {
        planner = planner.with_interface_policy(policy)?;
    }
    log::info!(
        "Loaded {} devices and {} bags, interface policy: {}",
        planner.devices().len(),
        planner.bags().len(),
        planner.interface_policy()
    );

    if cli.list {
        print_profiles(&planner);
        return Ok(());
    }

    let request = cli.request();
    let plan = planner.plan(&request)?;

    let diagnostics = TreatmentDiagnostics::from_plan(&plan);
    diagnostics.print_summary();
    for warning in &diagnostics.warnings {
        log::warn!("{}", warning);
    }

    print_curve("Dose Response", "J/cm²", &plan.dose_curve);
    print_curve("Time Course", "min", &plan.time_curve);

    if cli.export {
        let json_path = export_result_json(&cli.export_dir, &request, &plan.result)?;
        let (dose_path, time_path) = export_curves_csv(&cli.export_dir, &plan)?;
        println!();
        println!("Exported: {}", json_path.display());
        println!("Exported: {}", dose_path.display());
        println!("Exported: {}", time_path.display());
    }

    Ok(())
}
