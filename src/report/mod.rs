use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::coords::Group;
use crate::pipeline::stage1_scan::ScanDiagnostics;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub table_source: String,
    pub scan: Option<ScanDiagnostics>,
    pub load_seconds: Option<f64>,
    pub observations: u64,
    pub overall_mean: f64,
    pub per_group: BTreeMap<Group, f64>,
    pub views: Vec<String>,
}

/// A two-axis reducer view laid out as a matrix: one row per group, one
/// column per value of the second axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTable {
    pub column_axis: String,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}
