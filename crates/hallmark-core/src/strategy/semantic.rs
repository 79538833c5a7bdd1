use std::sync::Arc;

use super::GenerationStrategy;
use crate::config::BenchConfig;
use crate::model::GenerationRequest;
use crate::providers::llm::{strip_code_fences, LlmClient};
use crate::registry::resolve;
use async_trait::async_trait;

/// Compilation through the governed semantic model. Currency
/// normalization, refund exclusion and status filters are declared in the
/// model document, not left to the prompt author.
pub struct SemanticLayerStrategy {
    client: Arc<dyn LlmClient>,
    context: String,
}

const SEMANTIC_MODEL: &str = r#"source: transactions is table('{project}.{dataset}.fct_transactions') {
  primary_key: txn_id
  join_one: accounts is table('{project}.{dataset}.dim_accounts') on acct_id = accounts.acct_id
  join_one: merchants is table('{project}.{dataset}.dim_merchants') on merch_id = merchants.merch_id

  // Deep join: accounts -> customers -> branches
  join_one: customers is table('{project}.{dataset}.dim_customers') on accounts.cust_id = customers.cust_id
  join_one: branches is table('{project}.{dataset}.dim_branches') on customers.branch_id = branches.branch_id

  // Logic
  dimension: standardized_amount is pick amount * 1.1 when currency = 'EUR' else amount
  dimension: is_refund is amount < 0

  // Virtual dimension: segment
  dimension: customer_segment is
    pick 'High Value' when customers.risk_score >= 700
    pick 'Standard' when customers.risk_score >= 500
    else 'High Risk'

  measure: total_revenue is sum(standardized_amount) {
    where: not is_refund and accounts.status = 'ACTIVE'
  }

  measure: txn_count is count()
  measure: avg_txn_amount is avg(standardized_amount) {
    where: not is_refund and accounts.status = 'ACTIVE'
  }
}"#;

impl SemanticLayerStrategy {
    pub fn new(client: Arc<dyn LlmClient>, config: &BenchConfig) -> Self {
        Self {
            client,
            context: resolve(SEMANTIC_MODEL, &config.project_id, &config.dataset_id),
        }
    }
}

#[async_trait]
impl GenerationStrategy for SemanticLayerStrategy {
    fn name(&self) -> &'static str {
        "semantic_layer"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let instruction = format!(
            "You are the semantic layer compiler.\n\
             Context: {}\n\
             Task: Compile a SQL query for: \"{}\" based on the model.\n\
             IMPORTANT: Use the full table names defined in the source.\n\
             Ensure you respect the 'where' clauses in the measure.\n\
             Return ONLY SQL.",
            self.context, request.prompt
        );
        let resp = self.client.complete(&instruction).await?;
        Ok(strip_code_fences(&resp.text))
    }
}
