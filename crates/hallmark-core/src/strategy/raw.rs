use std::sync::Arc;

use super::GenerationStrategy;
use crate::config::BenchConfig;
use crate::model::GenerationRequest;
use crate::providers::llm::{strip_code_fences, LlmClient};
use crate::registry::resolve;
use async_trait::async_trait;

/// Free-form generation against a raw schema description. The model gets
/// the table layout and the business rules spelled out in prose, and has
/// to apply them itself.
pub struct RawSqlStrategy {
    client: Arc<dyn LlmClient>,
    context: String,
}

const SCHEMA_CONTEXT: &str = r#"Tables:
- `{project}.{dataset}.fct_transactions` (txn_id, acct_id, merch_id, amount, currency, txn_date)
- `{project}.{dataset}.dim_accounts` (acct_id, cust_id, prod_code, status)
- `{project}.{dataset}.dim_customers` (cust_id, branch_id, name, risk_score)
- `{project}.{dataset}.dim_merchants` (merch_id, name, category)
- `{project}.{dataset}.dim_branches` (branch_id, state, manager)

IMPORTANT:
- Revenue = amount (USD) or amount * 1.1 (EUR).
- Exclude refunds (amount < 0).
- Only include accounts with status = 'ACTIVE'.
- Segment: risk_score >= 700 (High Value), >= 500 (Standard), else (High Risk)."#;

impl RawSqlStrategy {
    pub fn new(client: Arc<dyn LlmClient>, config: &BenchConfig) -> Self {
        Self {
            client,
            context: resolve(SCHEMA_CONTEXT, &config.project_id, &config.dataset_id),
        }
    }
}

#[async_trait]
impl GenerationStrategy for RawSqlStrategy {
    fn name(&self) -> &'static str {
        "raw_sql"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let instruction = format!(
            "Write BigQuery SQL for: {}\n{}\n\nReturn ONLY SQL.",
            request.prompt, self.context
        );
        let resp = self.client.complete(&instruction).await?;
        Ok(strip_code_fences(&resp.text))
    }
}
