//! Per-run collection report.

use crate::export::{ExportError, ExportFormat, Exporter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fetch outcome counts of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    /// Stage name (statements, shares, prices).
    pub stage: String,

    /// Fetches that returned data.
    pub found: usize,

    /// Fetches the upstream answered without data.
    pub no_data: usize,

    /// Fetches that failed in transport or parsing.
    pub failed: usize,
}

impl StageSummary {
    /// Create a new stage summary.
    pub fn new(stage: impl Into<String>, found: usize, no_data: usize, failed: usize) -> Self {
        Self {
            stage: stage.into(),
            found,
            no_data,
            failed,
        }
    }

    /// Total number of fetches.
    pub const fn total(&self) -> usize {
        self.found + self.no_data + self.failed
    }

    /// Share of fetches that returned data, in percent.
    pub fn coverage_pct(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.found as f64 / self.total() as f64 * 100.0
    }
}

/// What one run collected and where it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Fiscal period, e.g. `2022Q1`.
    pub period: String,

    /// Statement document queried.
    pub doc_type: String,

    /// Run start.
    pub started_at: DateTime<Utc>,

    /// Run end, once finished.
    pub finished_at: Option<DateTime<Utc>>,

    /// Companies in the resolved registry.
    pub companies: usize,

    /// Rows in the final table.
    pub rows: usize,

    /// Per-stage outcome counts.
    pub stages: Vec<StageSummary>,

    /// Files written by the run.
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    /// Start a report for one period.
    pub fn new(period: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            doc_type: doc_type.into(),
            started_at: Utc::now(),
            finished_at: None,
            companies: 0,
            rows: 0,
            stages: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the registry size.
    pub const fn with_companies(mut self, companies: usize) -> Self {
        self.companies = companies;
        self
    }

    /// Record a stage.
    pub fn push_stage(&mut self, stage: StageSummary) {
        self.stages.push(stage);
    }

    /// Record a written file.
    pub fn push_output(&mut self, path: impl Into<PathBuf>) {
        self.outputs.push(path.into());
    }

    /// Stamp the end of the run.
    pub fn finish(&mut self, rows: usize) {
        self.rows = rows;
        self.finished_at = Some(Utc::now());
    }

    /// Look up a stage by name.
    pub fn stage(&self, name: &str) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a plain-text table for the terminal.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nCollection Report: {} ({})\n",
            self.period, self.doc_type
        ));
        output.push_str(&format!("Companies: {}  Rows: {}\n", self.companies, self.rows));
        if let Some(finished_at) = self.finished_at {
            let elapsed = finished_at - self.started_at;
            output.push_str(&format!("Elapsed: {}s\n", elapsed.num_seconds()));
        }
        output.push_str(&"=".repeat(64));
        output.push('\n');

        output.push_str(&format!(
            "{:<12} {:>10} {:>10} {:>10} {:>14}\n",
            "Stage", "Found", "No data", "Failed", "Coverage"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for stage in &self.stages {
            output.push_str(&format!(
                "{:<12} {:>10} {:>10} {:>10} {:>13.1}%\n",
                stage.stage,
                stage.found,
                stage.no_data,
                stage.failed,
                stage.coverage_pct()
            ));
        }

        if !self.outputs.is_empty() {
            output.push_str(&"-".repeat(64));
            output.push('\n');
            for path in &self.outputs {
                output.push_str(&format!("wrote {}\n", path.display()));
            }
        }

        output
    }
}

impl Exporter for RunReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for stage in &self.stages {
                    wtr.serialize(stage)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => self.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn report() -> RunReport {
        let mut report = RunReport::new("2022Q1", "CFS").with_companies(3);
        report.push_stage(StageSummary::new("statements", 2, 1, 0));
        report.push_stage(StageSummary::new("shares", 1, 1, 1));
        report.push_output("results/finance_table.csv");
        report.finish(3);
        report
    }

    #[rstest]
    #[case(StageSummary::new("prices", 3, 1, 0), 75.0)]
    #[case(StageSummary::new("prices", 0, 0, 0), 0.0)]
    fn test_coverage(#[case] stage: StageSummary, #[case] expected: f64) {
        assert!((stage.coverage_pct() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_json_roundtrip_fields() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["period"], "2022Q1");
        assert_eq!(value["rows"], 3);
        assert_eq!(value["stages"][1]["failed"], 1);
    }

    #[test]
    fn test_csv_export() {
        let csv = report().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "stage,found,no_data,failed");
        assert_eq!(lines[1], "statements,2,1,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_ascii_table() {
        let table = report().to_ascii_table();
        assert!(table.contains("Collection Report: 2022Q1 (CFS)"));
        assert!(table.contains("statements"));
        assert!(table.contains("wrote results/finance_table.csv"));
    }

    #[test]
    fn test_stage_lookup() {
        let report = report();
        assert_eq!(report.stage("shares").map(StageSummary::total), Some(3));
        assert!(report.stage("prices").is_none());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/run_report.json");
        report()
            .export_to_file(&path, ExportFormat::PrettyJson)
            .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"doc_type\": \"CFS\""));
    }
}
