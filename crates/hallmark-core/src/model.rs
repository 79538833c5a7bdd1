use serde::{Deserialize, Serialize};

/// A hand-verified reference computation for one business metric.
///
/// The template carries `{project}` / `{dataset}` placeholders and must
/// yield a result set with one grouping key column and exactly one
/// numeric aggregate column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub reference_query_template: String,
}

/// One natural-language request, consumed by every strategy in turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub scenario_title: String,
    pub prompt: String,
}

/// SQL produced by one strategy for one request. Untrusted free text:
/// may be empty, malformed or semantically wrong until judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub strategy: String,
    pub sql: String,
    pub request: GenerationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

/// Terminal verdict for exactly one candidate. A rejected candidate is
/// never executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgment {
    pub decision: Decision,
    pub reason: String,
}

impl Judgment {
    pub fn approved(&self) -> bool {
        self.decision == Decision::Approved
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Rejected,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    Success,
    Failed,
}

/// Outcome of one warehouse execution. Always returned as a value;
/// failures never cross the engine boundary as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecStatus,
    pub sql: String,
    pub aggregate_value: Option<f64>,
    pub bytes_scanned: Option<u64>,
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn failed(sql: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: ExecStatus::Failed,
            sql: sql.into(),
            aggregate_value: None,
            bytes_scanned: None,
            duration_ms: None,
            rows: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == ExecStatus::Success
    }

    /// Comparable scalar for variance computation. Absent values compare
    /// as zero, matching the reference comparison rules.
    pub fn aggregate_or_zero(&self) -> f64 {
        self.aggregate_value.unwrap_or(0.0)
    }
}

/// Response envelope from the text-generation capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}
