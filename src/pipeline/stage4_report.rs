use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::model::coords::{CoordinateSpace, Domain, Group, TrialSize};
use crate::pipeline::stage2_cache::{GatedTable, TableSource};
use crate::pipeline::stage3_reduce::{
    TrialSizeFilter, per_group, per_group_domain, per_group_trial_size,
};
use crate::report::json::render_summary_json;
use crate::report::text::{render_report_text, render_view_tsv};
use crate::report::{SummaryData, ViewTable};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes every reducer view as a TSV matrix plus `summary.json` and
/// `report.txt`. Returns the summary that was written.
pub fn write_reports(gated: &GatedTable, out_dir: &Path) -> Result<SummaryData, ReportError> {
    fs::create_dir_all(out_dir)?;
    let table = &gated.table;
    let space = CoordinateSpace;

    let mut views = Vec::new();
    let mut emit = |name: String, view: ViewTable| -> Result<(), ReportError> {
        write_text(&out_dir.join(&name), &render_view_tsv(&view))?;
        views.push(name);
        Ok(())
    };

    let group_means = per_group(table);
    emit(
        "per_group.tsv".to_string(),
        ViewTable {
            column_axis: "all".to_string(),
            columns: vec!["mean".to_string()],
            rows: space
                .groups()
                .iter()
                .map(|g| (g.to_string(), vec![lookup(&group_means, g)]))
                .collect(),
        },
    )?;

    emit(
        "per_group_per_domain.tsv".to_string(),
        domain_view(&per_group_domain(table, TrialSizeFilter::All)),
    )?;

    for &n in space.trial_sizes() {
        emit(
            format!("per_group_per_domain_n={n}.tsv"),
            domain_view(&per_group_domain(table, TrialSizeFilter::At(n))),
        )?;
    }

    for &domain in space.domains() {
        emit(
            format!("per_group_per_n_domain={domain}.tsv"),
            trial_size_view(&per_group_trial_size(table, domain)),
        )?;
    }

    let total = table.total();
    let (table_source, scan, load_seconds) = match &gated.source {
        TableSource::Snapshot => ("snapshot", None, None),
        TableSource::Scanned {
            diagnostics,
            load_seconds,
        } => ("scan", Some(*diagnostics), Some(*load_seconds)),
    };
    let summary = SummaryData {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        table_source: table_source.to_string(),
        scan,
        load_seconds,
        observations: total.count,
        overall_mean: total.mean(),
        per_group: group_means,
        views,
    };

    write_text(&out_dir.join("summary.json"), &render_summary_json(&summary)?)?;
    write_text(&out_dir.join("report.txt"), &render_report_text(&summary))?;
    info!(
        "wrote {} views to {}",
        summary.views.len(),
        out_dir.display()
    );
    Ok(summary)
}

fn lookup<K: Ord>(map: &BTreeMap<K, f64>, key: &K) -> f64 {
    map.get(key).copied().unwrap_or(0.0)
}

fn domain_view(means: &BTreeMap<(Group, Domain), f64>) -> ViewTable {
    let space = CoordinateSpace;
    ViewTable {
        column_axis: "domain".to_string(),
        columns: space.domains().iter().map(Domain::to_string).collect(),
        rows: space
            .groups()
            .iter()
            .map(|&g| {
                let values = space
                    .domains()
                    .iter()
                    .map(|&d| lookup(means, &(g, d)))
                    .collect();
                (g.to_string(), values)
            })
            .collect(),
    }
}

fn trial_size_view(means: &BTreeMap<(Group, TrialSize), f64>) -> ViewTable {
    let space = CoordinateSpace;
    ViewTable {
        column_axis: "n".to_string(),
        columns: space.trial_sizes().iter().map(|n| n.to_string()).collect(),
        rows: space
            .groups()
            .iter()
            .map(|&g| {
                let values = space
                    .trial_sizes()
                    .iter()
                    .map(|&n| lookup(means, &(g, n)))
                    .collect();
                (g.to_string(), values)
            })
            .collect(),
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
