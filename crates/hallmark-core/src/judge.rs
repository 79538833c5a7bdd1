use std::sync::Arc;

use crate::errors::JudgmentDecodeError;
use crate::model::{Decision, Judgment};
use crate::providers::llm::{strip_code_fences, LlmClient};
use regex::Regex;
use serde::Deserialize;

const PARSE_FALLBACK_REASON: &str = "Judge failed to parse response";

/// Safety/correctness gate in front of the execution engine.
///
/// Every failure mode maps to a decision; `judge` itself cannot fail.
/// Fail-closed: when the verdict cannot be obtained or decoded, the
/// candidate is rejected, never executed.
pub struct SqlJudge {
    client: Arc<dyn LlmClient>,
    destructive: Regex,
}

impl SqlJudge {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            destructive: Regex::new(r"(?i)\b(DROP|DELETE|INSERT|UPDATE|TRUNCATE|ALTER|MERGE)\b")
                .expect("destructive statement pattern"),
        }
    }

    pub async fn judge(&self, sql: &str, original_prompt: &str) -> Judgment {
        // Destructive statements are screened locally so the guarantee
        // does not depend on the model's judgment.
        if let Some(m) = self.destructive.find(sql) {
            let verdict = Judgment::rejected(format!(
                "destructive statement: {} is never allowed",
                m.as_str().to_uppercase()
            ));
            tracing::info!(event = "judge_decision", decision = "rejected", screened = true);
            return verdict;
        }

        let rubric = format!(
            "You are a SQL Safety & Correctness Judge.\n\
             User Request: \"{original_prompt}\"\n\
             Generated SQL:\n```sql\n{sql}\n```\n\n\
             Rules:\n\
             1. REJECT if it contains DROP, DELETE, INSERT, UPDATE.\n\
             2. REJECT if it clearly ignores business logic (e.g., summing 'amount' \
             without checking currency or refunds).\n\
             3. APPROVE if it looks safe and plausible.\n\n\
             Output JSON: {{\"decision\": \"APPROVED\" or \"REJECTED\", \"reason\": \"...\"}}"
        );

        let verdict = match self.client.complete(&rubric).await {
            Ok(resp) => match decode_judgment(&resp.text) {
                Ok(judgment) => judgment,
                Err(e) => {
                    tracing::warn!(event = "judge_parse_failure", error = %e);
                    Judgment::rejected(PARSE_FALLBACK_REASON)
                }
            },
            Err(e) => {
                tracing::warn!(event = "judge_request_failure", error = %e);
                Judgment::rejected(format!("judge request failed: {e}"))
            }
        };

        tracing::info!(
            event = "judge_decision",
            decision = ?verdict.decision,
            reason = %verdict.reason
        );
        verdict
    }
}

#[derive(Deserialize)]
struct RawJudgment {
    decision: String,
    #[serde(default)]
    reason: String,
}

/// Typed decode of the judge's loosely-structured reply. The payload must
/// carry the two-field decision structure after fence stripping; anything
/// else is a decode error for the caller to map fail-closed.
pub fn decode_judgment(text: &str) -> Result<Judgment, JudgmentDecodeError> {
    let cleaned = strip_code_fences(text);
    let raw: RawJudgment = serde_json::from_str(&cleaned)
        .map_err(|e| JudgmentDecodeError(e.to_string()))?;
    let decision = match raw.decision.to_ascii_uppercase().as_str() {
        "APPROVED" => Decision::Approved,
        "REJECTED" => Decision::Rejected,
        other => {
            return Err(JudgmentDecodeError(format!(
                "unrecognized decision value: {other}"
            )))
        }
    };
    Ok(Judgment {
        decision,
        reason: raw.reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fenced_approval() {
        let j = decode_judgment("```json\n{\"decision\": \"APPROVED\", \"reason\": \"ok\"}\n```")
            .unwrap();
        assert_eq!(j.decision, Decision::Approved);
        assert_eq!(j.reason, "ok");
    }

    #[test]
    fn decodes_rejection_without_reason() {
        let j = decode_judgment("{\"decision\": \"REJECTED\"}").unwrap();
        assert_eq!(j.decision, Decision::Rejected);
        assert_eq!(j.reason, "");
    }

    #[test]
    fn free_text_is_a_decode_error() {
        assert!(decode_judgment("Looks fine to me!").is_err());
    }

    #[test]
    fn unknown_decision_value_is_a_decode_error() {
        assert!(decode_judgment("{\"decision\": \"MAYBE\", \"reason\": \"?\"}").is_err());
    }
}
