use std::fs;

use super::*;

#[test]
fn test_decode_valid_row() {
    let row = ["7", "12345", "40", "hello, world", "hello world", "0.75"];
    let record = decode_row(&row, 40).unwrap();
    assert_eq!(
        record,
        RawRecord {
            agent: 7,
            seed: 12345,
            trial_size: 40,
            message: "hello, world".to_string(),
            decoded: "hello world".to_string(),
            score: 0.75,
        }
    );
}

#[test]
fn test_numeric_fields_tolerate_padding() {
    let row = [" 1", "2 ", " 10 ", "m", "d", " -3.5 "];
    let record = decode_row(&row, 10).unwrap();
    assert_eq!(record.agent, 1);
    assert_eq!(record.score, -3.5);
}

#[test]
fn test_field_count_mismatch() {
    let short = ["1", "2", "10", "m", "d"];
    assert_eq!(
        decode_row(&short, 10),
        Err(RowError::FieldCount {
            expected: 6,
            found: 5
        })
    );
    let long = ["1", "2", "10", "m", "d", "1.0", "extra"];
    assert!(matches!(
        decode_row(&long, 10),
        Err(RowError::FieldCount { found: 7, .. })
    ));
}

#[test]
fn test_coercion_failures_name_the_column() {
    let bad_agent = ["x", "2", "10", "m", "d", "1.0"];
    assert!(matches!(
        decode_row(&bad_agent, 10),
        Err(RowError::Coerce { column: "agent", .. })
    ));
    let bad_score = ["1", "2", "10", "m", "d", "high"];
    assert!(matches!(
        decode_row(&bad_score, 10),
        Err(RowError::Coerce {
            column: "score",
            kind: ColumnType::Real,
            ..
        })
    ));
    let nan_score = ["1", "2", "10", "m", "d", "NaN"];
    assert!(matches!(
        decode_row(&nan_score, 10),
        Err(RowError::Coerce { column: "score", .. })
    ));
}

#[test]
fn test_trial_size_must_match_file() {
    let row = ["1", "2", "20", "m", "d", "1.0"];
    assert_eq!(
        decode_row(&row, 10),
        Err(RowError::TrialSizeMismatch {
            expected: 10,
            found: 20
        })
    );
}

#[test]
fn test_result_reader_skips_header_and_keeps_ragged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results_1_2_0_10.csv");
    fs::write(
        &path,
        "agent,seed,n,message,decoded,score\n1,2,10,\"a,b\",ab,4.0\n1,2,10\n",
    )
    .unwrap();

    let data = read_result_file(&path).unwrap();
    let mut reader = result_reader(&data);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 6);
    assert_eq!(&rows[0][3], "a,b");
    assert_eq!(rows[1].len(), 3);
}

#[test]
fn test_count_blank_rows_after_header() {
    let data = b"agent,seed,n,message,decoded,score\n1,1,10,m,m,4.0\n\n2,2,10,m,m,6.0\n";
    assert_eq!(count_blank_rows(data), 1);
    assert_eq!(count_blank_rows(b"agent,seed\n\n\n1,2\n\n"), 3);
}

#[test]
fn test_count_blank_rows_ignores_trailing_newline_and_header() {
    assert_eq!(count_blank_rows(b""), 0);
    assert_eq!(count_blank_rows(b"\nagent,seed\n"), 0);
    assert_eq!(count_blank_rows(b"agent,seed\n1,2\n"), 0);
    assert_eq!(count_blank_rows(b"agent,seed\n1,2"), 0);
}

#[test]
fn test_count_blank_rows_skips_quoted_newlines() {
    let data = b"agent,seed,n,message,decoded,score\n1,1,10,\"a\n\nb\",ab,4.0\n";
    assert_eq!(count_blank_rows(data), 0);
}

#[test]
fn test_count_blank_rows_crlf() {
    assert_eq!(count_blank_rows(b"agent,seed\r\n1,2\r\n\r\n3,4\r\n"), 1);
}
