//! Report generation for comparison and tuning runs.
//!
//! Writes a JSON summary for automated analysis and a JSON Lines file with
//! one record per scored pair.

pub mod json;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{BenchError, BenchResult};
use crate::validation::MatchingResult;

pub use json::{AccuracySummary, ComparisonReport, PairRecord, ReportMetadata, ScoringSettings, REPORT_VERSION};

/// File name of the per-pair report.
pub const PAIRS_FILE: &str = "pairs.jsonl";
/// File name of the summary report.
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes reports into one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create the writer, creating `output_dir` if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> BenchResult<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| BenchError::io(&output_dir, e))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `records` as JSON Lines to `file_name`.
    pub fn write_jsonl<T: Serialize>(&self, file_name: &str, records: &[T]) -> BenchResult<PathBuf> {
        let path = self.output_dir.join(file_name);
        let file = File::create(&path).map_err(|e| BenchError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n").map_err(|e| BenchError::io(&path, e))?;
        }
        writer.flush().map_err(|e| BenchError::io(&path, e))?;
        tracing::debug!(path = %path.display(), records = records.len(), "wrote JSON Lines report");
        Ok(path)
    }

    /// Write `value` as pretty JSON to `file_name`.
    pub fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> BenchResult<PathBuf> {
        let path = self.output_dir.join(file_name);
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, content).map_err(|e| BenchError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote JSON report");
        Ok(path)
    }

    /// Write `pairs.jsonl` and `summary.json` for a comparison.
    pub fn write_comparison(&self, result: &MatchingResult, report: &ComparisonReport) -> BenchResult<ReportPaths> {
        let pairs = self.write_jsonl(PAIRS_FILE, &PairRecord::from_result(result))?;
        let summary = self.write_json(SUMMARY_FILE, report)?;
        tracing::info!(dir = %self.output_dir.display(), pairs = result.pairs.len(), "reports written");
        Ok(ReportPaths { pairs, summary })
    }
}

/// Paths of the files written for a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub pairs: PathBuf,
    pub summary: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroundTruthConfig;
    use crate::datasets::{GroundTruthGenerator, PopulationGenerator};
    use crate::tuning::ThresholdGrid;
    use crate::validation::{MatchingComparator, SignificanceBackend};
    use personality_knot_core::MatchingConfig;

    #[test]
    fn test_write_comparison() {
        let profiles = PopulationGenerator::new(5, 10).generate_profiles().unwrap();
        let gt = GroundTruthGenerator::new(GroundTruthConfig::default())
            .generate(&profiles)
            .unwrap();
        let config = MatchingConfig::default();
        let result = MatchingComparator::new(config.clone(), ThresholdGrid::default(), SignificanceBackend::StudentT)
            .compare(&profiles, &gt);
        let report = ComparisonReport::new(&result, &config, ReportMetadata::new(5, true));

        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("out")).unwrap();
        let paths = writer.write_comparison(&result, &report).unwrap();

        let lines = std::fs::read_to_string(&paths.pairs).unwrap();
        let records: Vec<PairRecord> = lines.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(records.len(), 45);
        assert!(records.iter().all(|r| r.integrated_threshold == result.integrated.threshold));

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();
        assert_eq!(summary["metadata"]["version"], REPORT_VERSION);
        assert_eq!(summary["summary"]["total_pairs"], 45);
        assert_eq!(summary["settings"]["fusion"], config.fusion.key());
        assert!(summary.get("cross_validation").is_none());
    }

    #[test]
    fn test_empty_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let path = writer.write_jsonl::<PairRecord>("empty.jsonl", &[]).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }
}
