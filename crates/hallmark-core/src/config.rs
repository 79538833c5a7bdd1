/// Identifiers and model selection for one benchmark process.
///
/// Constructed once at startup and passed by reference into the registry,
/// strategies, engine and orchestrator. There is no other configuration
/// surface: no config file, no mutable globals.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub project_id: String,
    pub dataset_id: String,
    pub location: String,
    pub model: String,
    /// Ceiling on each external round trip (generation, judging, query).
    pub timeout_seconds: u64,
}

pub const DEFAULT_PROJECT_ID: &str = "semantic-poc-2025";
pub const DEFAULT_DATASET_ID: &str = "lumi_enterprise_raw";
pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl BenchConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            project_id: env_or("HALLMARK_PROJECT_ID", &d.project_id),
            dataset_id: env_or("HALLMARK_DATASET_ID", &d.dataset_id),
            location: env_or("HALLMARK_LOCATION", &d.location),
            model: env_or("HALLMARK_MODEL", &d.model),
            timeout_seconds: std::env::var("HALLMARK_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.timeout_seconds),
        }
    }

    /// Fully-qualified table name in the benchmark dataset.
    pub fn table(&self, name: &str) -> String {
        format!("`{}.{}.{}`", self.project_id, self.dataset_id, name)
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_benchmark_dataset() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.project_id, "semantic-poc-2025");
        assert_eq!(cfg.dataset_id, "lumi_enterprise_raw");
        assert_eq!(
            cfg.table("fct_transactions"),
            "`semantic-poc-2025.lumi_enterprise_raw.fct_transactions`"
        );
    }
}
