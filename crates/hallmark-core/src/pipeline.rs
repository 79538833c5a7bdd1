use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};

use crate::compare::{compare, Comparison};
use crate::config::BenchConfig;
use crate::engine::ExecutionEngine;
use crate::judge::SqlJudge;
use crate::model::{Candidate, ExecutionResult, GenerationRequest, Judgment};
use crate::registry::{resolve, GoldStandardRegistry};
use crate::scenarios::Scenario;
use crate::strategy::GenerationStrategy;

/// Terminal state of one (scenario, strategy) iteration.
///
/// `Generating -> Judging -> {Blocked | Executing -> {Succeeded |
/// ExecutionFailed}} | GenerationFailed`. Strictly sequential, no
/// backtracking, no retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum StrategyOutcome {
    GenerationFailed { error: String },
    Blocked { reason: String },
    ExecutionFailed { error: String },
    Succeeded { comparison: Comparison },
}

/// Everything recorded for one strategy within one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: String,
    pub sql: Option<String>,
    pub judgment: Option<Judgment>,
    pub execution: Option<ExecutionResult>,
    pub outcome: StrategyOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub reference: ExecutionResult,
    pub runs: Vec<StrategyRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub started_at: String,
    pub finished_at: String,
    pub scenarios: Vec<ScenarioReport>,
}

/// End-to-end driver: scenarios × strategies, with the judge gate in
/// front of every execution and one reference execution per scenario.
///
/// Failures local to one iteration are recorded in that iteration's run
/// and never abort the whole thing; only an unknown metric name (a
/// configuration defect) propagates. Every external round trip is capped
/// by the configured timeout so one hung call cannot hang the run.
pub struct Pipeline {
    config: BenchConfig,
    registry: GoldStandardRegistry,
    strategies: Vec<Arc<dyn GenerationStrategy>>,
    judge: SqlJudge,
    engine: ExecutionEngine,
}

impl Pipeline {
    pub fn new(
        config: BenchConfig,
        registry: GoldStandardRegistry,
        strategies: Vec<Arc<dyn GenerationStrategy>>,
        judge: SqlJudge,
        engine: ExecutionEngine,
    ) -> Self {
        Self {
            config,
            registry,
            strategies,
            judge,
            engine,
        }
    }

    fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    pub async fn run(&self, scenarios: &[Scenario]) -> anyhow::Result<RunArtifacts> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(self.run_scenario(scenario).await?);
        }
        Ok(RunArtifacts {
            started_at,
            finished_at: chrono::Utc::now().to_rfc3339(),
            scenarios: reports,
        })
    }

    async fn run_scenario(&self, scenario: &Scenario) -> anyhow::Result<ScenarioReport> {
        tracing::info!(event = "scenario_start", title = %scenario.title, metric = %scenario.metric);

        // The gold standard is strategy-independent: resolved and executed
        // once here, reused for every comparison below.
        let definition = self.registry.lookup(&scenario.metric)?;
        let reference_sql = resolve(
            &definition.reference_query_template,
            &self.config.project_id,
            &self.config.dataset_id,
        );
        let reference = self.execute_capped(&reference_sql).await;
        if !reference.succeeded() {
            tracing::warn!(
                event = "reference_failed",
                metric = %scenario.metric,
                error = reference.error.as_deref().unwrap_or("")
            );
        }

        let request = GenerationRequest {
            scenario_title: scenario.title.clone(),
            prompt: scenario.prompt.clone(),
        };

        let mut runs = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            runs.push(self.run_strategy(strategy.as_ref(), &request, &reference).await);
        }

        Ok(ScenarioReport {
            scenario: scenario.clone(),
            reference,
            runs,
        })
    }

    async fn run_strategy(
        &self,
        strategy: &dyn GenerationStrategy,
        request: &GenerationRequest,
        reference: &ExecutionResult,
    ) -> StrategyRun {
        let name = strategy.name();

        let sql = match timeout(self.call_timeout(), strategy.generate(request)).await {
            Ok(Ok(sql)) => sql,
            Ok(Err(e)) => {
                tracing::warn!(event = "generation_failed", strategy = name, error = %e);
                return generation_failed(name, e.to_string());
            }
            Err(_) => {
                tracing::warn!(event = "generation_timeout", strategy = name);
                return generation_failed(
                    name,
                    format!("generation timed out after {}s", self.config.timeout_seconds),
                );
            }
        };

        let candidate = Candidate {
            strategy: name.to_string(),
            sql,
            request: request.clone(),
        };

        // A judge that cannot answer in time is treated like a judge that
        // cannot be parsed: the candidate stays blocked.
        let judgment = match timeout(
            self.call_timeout(),
            self.judge.judge(&candidate.sql, &candidate.request.prompt),
        )
        .await
        {
            Ok(judgment) => judgment,
            Err(_) => Judgment::rejected(format!(
                "judge request failed: timed out after {}s",
                self.config.timeout_seconds
            )),
        };

        if !judgment.approved() {
            return StrategyRun {
                strategy: candidate.strategy,
                sql: Some(candidate.sql),
                outcome: StrategyOutcome::Blocked {
                    reason: judgment.reason.clone(),
                },
                judgment: Some(judgment),
                execution: None,
            };
        }

        let execution = self.execute_capped(&candidate.sql).await;
        let outcome = if execution.succeeded() {
            StrategyOutcome::Succeeded {
                comparison: compare(reference, &execution),
            }
        } else {
            StrategyOutcome::ExecutionFailed {
                error: execution
                    .error
                    .clone()
                    .unwrap_or_else(|| "execution failed".to_string()),
            }
        };

        StrategyRun {
            strategy: candidate.strategy,
            sql: Some(candidate.sql),
            judgment: Some(judgment),
            execution: Some(execution),
            outcome,
        }
    }

    async fn execute_capped(&self, sql: &str) -> ExecutionResult {
        match timeout(self.call_timeout(), self.engine.execute(sql)).await {
            Ok(result) => result,
            Err(_) => ExecutionResult::failed(
                sql,
                format!("execution timed out after {}s", self.config.timeout_seconds),
            ),
        }
    }
}

fn generation_failed(strategy: &str, error: String) -> StrategyRun {
    StrategyRun {
        strategy: strategy.to_string(),
        sql: None,
        judgment: None,
        execution: None,
        outcome: StrategyOutcome::GenerationFailed { error },
    }
}
