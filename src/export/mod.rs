//! Export functionality for computed plans.
//!
//! Provides JSON snapshots of a request/result pair and CSV export of the
//! response curves.

mod csv_export;
mod json_export;

pub use csv_export::{export_curve_csv, export_curves_csv};
pub use json_export::{export_result_json, export_result_json_to, ResultExport};
