use std::fs;

use super::*;
use crate::model::coords::Coordinate;
use crate::model::stats::AggregateTable;
use crate::pipeline::stage1_scan::ScanDiagnostics;

fn gated_table() -> GatedTable {
    let mut table = AggregateTable::initialize();
    table
        .accumulate(Coordinate::new(1, Domain::Labeled(2), 10), 4.0)
        .unwrap();
    table
        .accumulate(Coordinate::new(1, Domain::Labeled(2), 10), 6.0)
        .unwrap();
    table
        .accumulate(Coordinate::new(1, Domain::Null, 10), 2.0)
        .unwrap();
    GatedTable {
        table,
        source: TableSource::Scanned {
            diagnostics: ScanDiagnostics {
                files_seen: 2,
                files_scanned: 2,
                total_rows: 4,
                lost_rows: 1,
                ..ScanDiagnostics::default()
            },
            load_seconds: 0.5,
        },
    }
}

#[test]
fn test_write_reports_emits_every_view() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plots");
    let summary = write_reports(&gated_table(), &out).unwrap();

    assert_eq!(summary.views.len(), 2 + 11 + 9);
    for name in &summary.views {
        assert!(out.join(name).is_file(), "{name}");
    }
    assert!(out.join("summary.json").is_file());
    assert!(out.join("report.txt").is_file());
    assert!(out.join("per_group_per_domain_n=10.tsv").is_file());
    assert!(out.join("per_group_per_n_domain=null.tsv").is_file());

    assert_eq!(summary.observations, 3);
    assert_eq!(summary.overall_mean, 4.0);
    assert_eq!(summary.table_source, "scan");
    assert_eq!(summary.per_group[&1], 4.0);
}

#[test]
fn test_domain_table_contents() {
    let dir = tempfile::tempdir().unwrap();
    write_reports(&gated_table(), dir.path()).unwrap();
    let tsv = fs::read_to_string(dir.path().join("per_group_per_domain_n=10.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 1 + 8);
    assert_eq!(lines[0], "group/domain\t1\t2\t3\t4\t5\t6\t7\t8\tnull");
    assert!(lines[1].starts_with("1\t0.000000\t5.000000\t"));
    assert!(lines[1].ends_with("\t2.000000"));
    assert!(lines[2].split('\t').skip(1).all(|v| v == "0.000000"));
}

#[test]
fn test_snapshot_summary_has_no_scan_counts() {
    let dir = tempfile::tempdir().unwrap();
    let gated = GatedTable {
        table: AggregateTable::initialize(),
        source: TableSource::Snapshot,
    };
    let summary = write_reports(&gated, dir.path()).unwrap();
    assert_eq!(summary.table_source, "snapshot");
    assert!(summary.scan.is_none());
    assert_eq!(summary.overall_mean, 0.0);
    let text = fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert!(text.contains("Row counts unavailable"));
}
