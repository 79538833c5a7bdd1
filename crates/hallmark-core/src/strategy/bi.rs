use std::sync::Arc;

use super::GenerationStrategy;
use crate::config::BenchConfig;
use crate::model::GenerationRequest;
use crate::providers::llm::{strip_code_fences, LlmClient};
use crate::registry::resolve;
use async_trait::async_trait;

/// Compilation through the business-intelligence model: views with
/// dimensions/measures and explicit filters.
pub struct BiLayerStrategy {
    client: Arc<dyn LlmClient>,
    context: String,
}

const BI_MODEL: &str = r#"view: transactions {
  sql_table_name: `{project}.{dataset}.fct_transactions` ;;

  dimension: standardized_amount {
    type: number
    sql: CASE WHEN ${currency} = 'EUR' THEN ${amount} * 1.1 ELSE ${amount} END ;;
  }

  measure: total_revenue {
    type: sum
    sql: ${standardized_amount} ;;
    filters: [is_refund: "no", accounts.status: "ACTIVE"]
  }

  measure: txn_count { type: count }
  measure: avg_txn_amount {
    type: average
    sql: ${standardized_amount} ;;
    filters: [is_refund: "no", accounts.status: "ACTIVE"]
  }
}

view: customers {
  sql_table_name: `{project}.{dataset}.dim_customers` ;;

  dimension: risk_score { type: number sql: ${TABLE}.risk_score ;; }

  dimension: segment {
    type: string
    case: {
      when: { sql: ${risk_score} >= 700 ;; label: "High Value" }
      when: { sql: ${risk_score} >= 500 ;; label: "Standard" }
      else: "High Risk"
    }
  }
}

view: accounts {
  sql_table_name: `{project}.{dataset}.dim_accounts` ;;
  dimension: status { sql: ${TABLE}.status ;; }
}

view: merchants {
  sql_table_name: `{project}.{dataset}.dim_merchants` ;;
  dimension: category { sql: ${TABLE}.category ;; }
}

view: branches {
  sql_table_name: `{project}.{dataset}.dim_branches` ;;
  dimension: state { sql: ${TABLE}.state ;; }
}"#;

impl BiLayerStrategy {
    pub fn new(client: Arc<dyn LlmClient>, config: &BenchConfig) -> Self {
        Self {
            client,
            context: resolve(BI_MODEL, &config.project_id, &config.dataset_id),
        }
    }
}

#[async_trait]
impl GenerationStrategy for BiLayerStrategy {
    fn name(&self) -> &'static str {
        "bi_layer"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let instruction = format!(
            "You are the BI layer SQL runner.\n\
             Context: {}\n\
             Task: Generate the SQL the BI tool would run for: \"{}\".\n\
             Use the defined dimensions and measures.\n\
             IMPORTANT: When applying filters like 'is_refund: no', generate the raw SQL \
             condition (e.g., `amount >= 0`). Do not use modeling syntax in the final SQL.\n\
             Return ONLY SQL.",
            self.context, request.prompt
        );
        let resp = self.client.complete(&instruction).await?;
        Ok(strip_code_fences(&resp.text))
    }
}
