use crate::compare::Comparison;
use crate::pipeline::{RunArtifacts, ScenarioReport, StrategyOutcome};

fn fmt_opt(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn print_run(artifacts: &RunArtifacts) {
    for report in &artifacts.scenarios {
        println!();
        println!("SCENARIO: {}", report.scenario.title);
        println!("  Prompt: {}", report.scenario.prompt);
        println!(
            "  Gold standard ({}): {} | bytes={} | {}ms",
            report.scenario.metric,
            report
                .reference
                .aggregate_value
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| format!(
                    "FAILED ({})",
                    report.reference.error.as_deref().unwrap_or("unknown")
                )),
            fmt_opt(report.reference.bytes_scanned),
            fmt_opt(report.reference.duration_ms),
        );
        println!("{}", "-".repeat(92));
        println!(
            "{:<16} | {:<18} | {:<14} | {:<10} | {:<12} | {:<8}",
            "Strategy", "Outcome", "Value", "Delta", "Bytes", "Time"
        );
        println!("{}", "-".repeat(92));

        for run in &report.runs {
            match &run.outcome {
                StrategyOutcome::GenerationFailed { error } => {
                    println!(
                        "{:<16} | {:<18} | {:<14} | {:<10} | {:<12} | {:<8}",
                        run.strategy, "generation failed", "-", "-", "-", "-"
                    );
                    println!("{:<16}   {}", "", error);
                }
                StrategyOutcome::Blocked { reason } => {
                    println!(
                        "{:<16} | {:<18} | {:<14} | {:<10} | {:<12} | {:<8}",
                        run.strategy, "blocked", "-", "-", "-", "-"
                    );
                    println!("{:<16}   {}", "", reason);
                }
                StrategyOutcome::ExecutionFailed { error } => {
                    println!(
                        "{:<16} | {:<18} | {:<14} | {:<10} | {:<12} | {:<8}",
                        run.strategy, "execution failed", "-", "-", "-", "-"
                    );
                    println!("{:<16}   {}", "", error);
                }
                StrategyOutcome::Succeeded { comparison } => match comparison {
                    Comparison::Report(r) => {
                        println!(
                            "{:<16} | {:<18} | {:<14.2} | {:>8.2}% | {:<12} | {:<6}ms",
                            run.strategy,
                            "succeeded",
                            r.candidate_value,
                            r.variance_percent,
                            fmt_opt(r.candidate_bytes),
                            fmt_opt(r.candidate_duration_ms),
                        );
                    }
                    Comparison::CandidateFailed { error } => {
                        println!(
                            "{:<16} | {:<18} | {:<14} | {:<10} | {:<12} | {:<8}",
                            run.strategy, "failed", "-", "-", "-", "-"
                        );
                        println!("{:<16}   {}", "", error);
                    }
                },
            }
        }
    }

    print_tally(&artifacts.scenarios);
}

fn print_tally(reports: &[ScenarioReport]) {
    let mut succeeded = 0;
    let mut blocked = 0;
    let mut exec_failed = 0;
    let mut gen_failed = 0;

    for report in reports {
        for run in &report.runs {
            match run.outcome {
                StrategyOutcome::Succeeded { .. } => succeeded += 1,
                StrategyOutcome::Blocked { .. } => blocked += 1,
                StrategyOutcome::ExecutionFailed { .. } => exec_failed += 1,
                StrategyOutcome::GenerationFailed { .. } => gen_failed += 1,
            }
        }
    }

    eprintln!(
        "Results: succeeded={} blocked={} execution_failed={} generation_failed={}",
        succeeded, blocked, exec_failed, gen_failed
    );
}
