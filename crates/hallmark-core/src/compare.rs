use serde::{Deserialize, Serialize};

use crate::model::ExecutionResult;

/// Side-by-side numbers for one candidate against the gold standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub candidate_value: f64,
    pub reference_value: f64,
    pub variance_percent: f64,
    pub candidate_bytes: Option<u64>,
    pub reference_bytes: Option<u64>,
    pub candidate_duration_ms: Option<u64>,
    pub reference_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Comparison {
    Report(ComparisonReport),
    CandidateFailed { error: String },
}

/// Percentage difference of candidate vs reference. Defined as 0 when the
/// reference is zero; that avoids the division but yields a misleadingly
/// perfect score when truth is zero. Known limitation, kept as-is for
/// comparability with the existing baseline.
pub fn variance_percent(reference: f64, candidate: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        (candidate - reference) / reference * 100.0
    }
}

pub fn compare(reference: &ExecutionResult, candidate: &ExecutionResult) -> Comparison {
    if !candidate.succeeded() {
        return Comparison::CandidateFailed {
            error: candidate
                .error
                .clone()
                .unwrap_or_else(|| "execution failed".to_string()),
        };
    }

    let reference_value = reference.aggregate_or_zero();
    let candidate_value = candidate.aggregate_or_zero();

    Comparison::Report(ComparisonReport {
        candidate_value,
        reference_value,
        variance_percent: variance_percent(reference_value, candidate_value),
        candidate_bytes: candidate.bytes_scanned,
        reference_bytes: reference.bytes_scanned,
        candidate_duration_ms: candidate.duration_ms,
        reference_duration_ms: reference.duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExecStatus, ExecutionResult};

    fn success(value: f64) -> ExecutionResult {
        ExecutionResult {
            status: ExecStatus::Success,
            sql: "SELECT 1".to_string(),
            aggregate_value: Some(value),
            bytes_scanned: Some(100),
            duration_ms: Some(10),
            rows: vec![],
            error: None,
        }
    }

    #[test]
    fn variance_is_signed_percentage() {
        assert_eq!(variance_percent(100.0, 95.0), -5.0);
        assert_eq!(variance_percent(100.0, 110.0), 10.0);
    }

    #[test]
    fn zero_reference_defines_variance_as_zero() {
        assert_eq!(variance_percent(0.0, 50.0), 0.0);
    }

    #[test]
    fn compare_produces_report() {
        let comparison = compare(&success(100.0), &success(95.0));
        match comparison {
            Comparison::Report(r) => {
                assert_eq!(r.variance_percent, -5.0);
                assert_eq!(r.reference_value, 100.0);
                assert_eq!(r.candidate_value, 95.0);
                assert_eq!(r.candidate_bytes, Some(100));
            }
            Comparison::CandidateFailed { .. } => panic!("expected report"),
        }
    }

    #[test]
    fn failed_candidate_carries_error_not_variance() {
        let failed = ExecutionResult::failed("SELECT nope", "table not found");
        match compare(&success(100.0), &failed) {
            Comparison::CandidateFailed { error } => assert_eq!(error, "table not found"),
            Comparison::Report(_) => panic!("expected failure report"),
        }
    }
}
