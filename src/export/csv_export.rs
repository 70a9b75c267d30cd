//! CSV export for response curves.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::treatment::TreatmentPlan;
use crate::viability::ResponseCurve;

/// Write one curve, one row per sample
///
/// Columns: axis value, T-cell viability (%), monocyte viability (%)
pub fn export_curve_csv(curve: &ResponseCurve, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        curve.axis().label(),
        "target_viability_percent",
        "monocyte_viability_percent",
    ])?;
    for point in curve {
        writer.write_record(&[
            point.x.to_string(),
            point.target_viability_percent.to_string(),
            point.monocyte_viability_percent.to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("CSV curve exported: {}", path.display());
    Ok(())
}

/// Write both curves of a plan into `dir`
///
/// Creates the directory if it doesn't exist.
/// Filenames are auto-generated with timestamp.
///
/// Returns the dose-curve and time-curve paths.
pub fn export_curves_csv(dir: &Path, plan: &TreatmentPlan) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let dose_path = dir.join(format!("dose_response_{}.csv", timestamp));
    let time_path = dir.join(format!("time_response_{}.csv", timestamp));

    export_curve_csv(&plan.dose_curve, &dose_path)?;
    export_curve_csv(&plan.time_curve, &time_path)?;

    Ok((dose_path, time_path))
}
