use serde::Serialize;

use super::result::{ComponentResult, Confidence, Status};

/// Run-level summary produced by the aggregator (§2 item 7, §6).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub reachable: usize,
    pub imported: usize,
    #[serde(rename = "notReachable")]
    pub not_reachable: usize,
    pub unknown: usize,
    #[serde(rename = "warningsCount")]
    pub warnings_count: usize,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u128,
}

impl Summary {
    pub fn from_results(results: &[ComponentResult], elapsed_ms: u128) -> Self {
        let mut summary = Summary {
            total: results.len(),
            elapsed_ms,
            ..Default::default()
        };
        for r in results {
            match r.status {
                Status::Reachable => summary.reachable += 1,
                Status::Imported => summary.imported += 1,
                Status::NotReachable => summary.not_reachable += 1,
                Status::Unknown => summary.unknown += 1,
            }
            summary.warnings_count += r.warnings.len();
        }
        summary
    }
}

/// The complete result document (§6).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub results: Vec<ComponentResult>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl Report {
    pub fn new(results: Vec<ComponentResult>, elapsed_ms: u128, cancelled: bool) -> Self {
        let summary = Summary::from_results(&results, elapsed_ms);
        Self {
            results,
            summary,
            cancelled,
        }
    }

    /// CLI exit code per §6: 0 clean, 1 any `reachable` at `high` confidence.
    pub fn exit_code(&self) -> i32 {
        let any_high_reachable = self
            .results
            .iter()
            .any(|r| r.status == Status::Reachable && r.confidence == Confidence::High);
        if any_high_reachable { 1 } else { 0 }
    }
}
