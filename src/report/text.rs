use std::fmt::Write;

use crate::report::{SummaryData, ViewTable, format_f64_6};

/// Tab-separated matrix. The corner cell names both axes, e.g. `group/domain`.
pub fn render_view_tsv(view: &ViewTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "group/{}", view.column_axis);
    for col in &view.columns {
        out.push('\t');
        out.push_str(col);
    }
    out.push('\n');
    for (label, values) in &view.rows {
        out.push_str(label);
        for v in values {
            out.push('\t');
            out.push_str(&format_f64_6(*v));
        }
        out.push('\n');
    }
    out
}

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Tournament Score Report\n");
    out.push_str("=======================\n\n");

    let _ = writeln!(out, "Table source: {}", data.table_source);
    match &data.scan {
        Some(scan) => {
            let _ = writeln!(
                out,
                "Files: {} seen, {} scanned, {} unclassified, {} out of space, {} unreadable",
                scan.files_seen,
                scan.files_scanned,
                scan.files_unclassified,
                scan.files_out_of_space,
                scan.files_unreadable
            );
            let _ = writeln!(out, "Total rows: {}", scan.total_rows);
            let _ = writeln!(
                out,
                "Lost rows: {} ({}%)",
                scan.lost_rows,
                format_f64_6(scan.lost_fraction() * 100.0)
            );
        }
        None => out.push_str("Row counts unavailable (table loaded from snapshot)\n"),
    }
    let _ = writeln!(out, "Observations: {}", data.observations);
    let _ = writeln!(out, "Overall mean score: {}\n", format_f64_6(data.overall_mean));

    out.push_str("Average score per group\n");
    for (group, mean) in &data.per_group {
        let _ = writeln!(out, "  G{}: {}", group, format_f64_6(*mean));
    }

    out.push_str("\nViews written\n");
    for view in &data.views {
        let _ = writeln!(out, "  {}", view);
    }
    out
}
