use std::sync::Arc;

use crate::config::BenchConfig;
use crate::model::GenerationRequest;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;

/// One way of turning a natural-language request into SQL.
///
/// The three implementations are behaviorally interchangeable; they
/// differ only in the fixed context document embedded in the instruction.
/// Callers hold them as trait objects and never branch on the name except
/// for reporting labels.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns candidate SQL with code-fence markup already stripped.
    /// Fails when the text-generation capability does.
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

mod bi;
mod raw;
mod semantic;

pub use bi::BiLayerStrategy;
pub use raw::RawSqlStrategy;
pub use semantic::SemanticLayerStrategy;

/// The fixed, ordered strategy list the orchestrator iterates.
pub fn default_strategies(
    client: Arc<dyn LlmClient>,
    config: &BenchConfig,
) -> Vec<Arc<dyn GenerationStrategy>> {
    vec![
        Arc::new(RawSqlStrategy::new(client.clone(), config)),
        Arc::new(SemanticLayerStrategy::new(client.clone(), config)),
        Arc::new(BiLayerStrategy::new(client, config)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::fake::FakeLlmClient;

    fn request() -> GenerationRequest {
        GenerationRequest {
            scenario_title: "Governed Metric".to_string(),
            prompt: "Total Revenue by Month (use txn_date).".to_string(),
        }
    }

    #[tokio::test]
    async fn strategies_are_ordered_and_named() {
        let client = Arc::new(FakeLlmClient::new());
        let strategies = default_strategies(client, &BenchConfig::default());
        let names: Vec<_> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["raw_sql", "semantic_layer", "bi_layer"]);
    }

    #[tokio::test]
    async fn generate_strips_fences() {
        let client = Arc::new(FakeLlmClient::scripted(["```sql\nSELECT 1\n```"]));
        let strategy = RawSqlStrategy::new(client, &BenchConfig::default());
        let sql = strategy.generate(&request()).await.unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[tokio::test]
    async fn each_strategy_embeds_its_context() {
        let cfg = BenchConfig::default();
        for (expected, marker) in [
            ("raw_sql", "fct_transactions (txn_id"),
            ("semantic_layer", "source: transactions is table"),
            ("bi_layer", "view: transactions"),
        ] {
            let client = Arc::new(FakeLlmClient::scripted(["SELECT 1"]));
            let strategies = default_strategies(client.clone(), &cfg);
            let strategy = strategies
                .iter()
                .find(|s| s.name() == expected)
                .expect("strategy registered");
            strategy.generate(&request()).await.unwrap();
            let prompts = client.prompts();
            assert_eq!(prompts.len(), 1);
            assert!(
                prompts[0].contains(marker),
                "{expected} prompt missing context marker"
            );
            assert!(prompts[0].contains("Total Revenue by Month"));
        }
    }

    #[tokio::test]
    async fn generation_failure_surfaces_as_error() {
        let client = Arc::new(FakeLlmClient::new());
        let strategy = SemanticLayerStrategy::new(client, &BenchConfig::default());
        assert!(strategy.generate(&request()).await.is_err());
    }
}
