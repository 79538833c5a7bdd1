use std::sync::Arc;

use anyhow::Context;

use hallmark_core::config::BenchConfig;
use hallmark_core::engine::ExecutionEngine;
use hallmark_core::judge::SqlJudge;
use hallmark_core::pipeline::Pipeline;
use hallmark_core::providers::llm::gemini::GeminiClient;
use hallmark_core::providers::warehouse::bigquery::BigQueryClient;
use hallmark_core::registry::GoldStandardRegistry;
use hallmark_core::report::console;
use hallmark_core::scenarios::stress_scenarios;
use hallmark_core::strategy::default_strategies;

use hallmark_datagen::generate::{GeneratorConfig, SyntheticDataset};
use hallmark_datagen::load::upload;

use super::args::{Cli, Command, RunArgs, SeedArgs};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run(args).await,
        Command::Seed(args) => seed(args).await,
    }
}

fn require_env(key: &str, hint: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("config error: {key} not set ({hint})"))
}

fn warehouse(config: &BenchConfig) -> anyhow::Result<BigQueryClient> {
    let token = require_env("HALLMARK_BQ_TOKEN", "OAuth2 bearer token for BigQuery")?;
    Ok(BigQueryClient::new(config, token))
}

async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let config = BenchConfig::from_env();
    let api_key = require_env("GEMINI_API_KEY", "API key for the Gemini endpoint")?;

    let llm = Arc::new(GeminiClient::new(config.model.clone(), api_key));
    let engine = ExecutionEngine::new(Arc::new(warehouse(&config)?));

    tracing::info!(
        event = "run_start",
        project = %config.project_id,
        dataset = %config.dataset_id,
        model = %config.model
    );

    let pipeline = Pipeline::new(
        config.clone(),
        GoldStandardRegistry::builtin(),
        default_strategies(llm.clone(), &config),
        SqlJudge::new(llm),
        engine,
    );

    let artifacts = pipeline.run(&stress_scenarios()).await?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&artifacts)?),
        _ => console::print_run(&artifacts),
    }

    // Every iteration's outcome is in the report; a completed run exits
    // clean regardless of per-iteration failures.
    Ok(0)
}

async fn seed(args: SeedArgs) -> anyhow::Result<i32> {
    let config = BenchConfig::from_env();
    let warehouse = warehouse(&config)?;

    let gen_cfg = GeneratorConfig {
        seed: args.seed,
        customers: args.customers,
        ..GeneratorConfig::default()
    };
    tracing::info!(event = "seed_start", seed = gen_cfg.seed, customers = gen_cfg.customers);

    let data = SyntheticDataset::generate(&gen_cfg);
    upload(&warehouse, &data).await?;

    println!(
        "Seeded {}.{}: {} accounts, {} transactions, {} disputes",
        config.project_id,
        config.dataset_id,
        data.accounts.len(),
        data.transactions.len(),
        data.disputes.len()
    );
    Ok(0)
}
