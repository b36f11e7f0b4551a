//! Integration tests for table export and run reports

use polars::prelude::*;
use sdam_output::{ExportFormat, Exporter, RunReport, StageSummary, export_table, import_table};

#[test]
fn test_annotated_table_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let finance = dir.path().join("finance_table.csv");
    let annotated = dir.path().join("price_annotated_table.csv");

    let mut table = df!(
        "CORP_NAME" => ["한화3우B", "다코"],
        "KRX_CODE" => ["00088K", "091440"],
        "DART_CODE" => ["00160588", "00434003"],
        "ISSUED_STOCK" => [1_000i64, 0]
    )
    .unwrap();
    export_table(&mut table, &finance).unwrap();

    let mut reloaded = import_table(&finance, &["KRX_CODE", "DART_CODE"]).unwrap();
    reloaded
        .with_column(Column::new("STOCK_PRICE".into(), vec![41_050i64, 0]))
        .unwrap();
    export_table(&mut reloaded, &annotated).unwrap();

    let final_table = import_table(&annotated, &["KRX_CODE", "DART_CODE"]).unwrap();
    assert_eq!(final_table.width(), 5);
    let codes: Vec<&str> = final_table
        .column("KRX_CODE")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(codes, vec!["00088K", "091440"]);

    let mut report = RunReport::new("2022Q1", "CFS").with_companies(2);
    report.push_stage(StageSummary::new("prices", 1, 1, 0));
    report.push_output(&finance);
    report.push_output(&annotated);
    report.finish(final_table.height());

    let report_path = dir.path().join("run_report.json");
    report
        .export_to_file(&report_path, ExportFormat::PrettyJson)
        .unwrap();
    let restored: RunReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(restored.rows, 2);
    assert_eq!(restored.outputs.len(), 2);
    assert_eq!(restored.stage("prices").unwrap().no_data, 1);
}
