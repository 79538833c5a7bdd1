use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hallmark",
    version,
    about = "Validates LLM-generated warehouse SQL against gold-standard metrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full stress test: scenarios x strategies through the
    /// judge gate, compared against the gold standard.
    Run(RunArgs),
    /// Generate the synthetic enterprise dataset and load it into the
    /// warehouse.
    Seed(SeedArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(long, default_value_t = 2025)]
    pub seed: u64,

    /// Number of customers to generate (accounts and transactions scale
    /// with it).
    #[arg(long, default_value_t = 100)]
    pub customers: usize,
}
