use super::{ColumnDef, QueryOutput, Row, Value, Warehouse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory backend for tests: serves scripted query results in FIFO
/// order, logs every SQL string it executes, and stores loaded tables so
/// upload plumbing can be exercised offline.
#[derive(Default)]
pub struct FakeWarehouse {
    results: Mutex<VecDeque<QueryOutput>>,
    executed: Mutex<Vec<String>>,
    tables: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    dataset_ready: Mutex<bool>,
}

impl FakeWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_result(&self, output: QueryOutput) {
        self.results.lock().unwrap().push_back(output);
    }

    /// Convenience: a single-row result with one grouping key and one
    /// numeric aggregate, the shape every gold query produces.
    pub fn push_aggregate(&self, key: &str, value: f64) {
        self.push_result(QueryOutput {
            rows: vec![Row::from_pairs(vec![
                ("segment", Value::Text(key.to_string())),
                ("metric_value", Value::Number(value)),
            ])],
            total_bytes_processed: Some(1024),
        });
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn table_rows(&self, table: &str) -> Option<Vec<serde_json::Value>> {
        self.tables.lock().unwrap().get(table).cloned()
    }

    pub fn dataset_ready(&self) -> bool {
        *self.dataset_ready.lock().unwrap()
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    async fn query(&self, sql: &str) -> anyhow::Result<QueryOutput> {
        self.executed.lock().unwrap().push(sql.to_string());
        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(output) => Ok(output),
            None => anyhow::bail!("fake warehouse: no scripted result left"),
        }
    }

    async fn ensure_dataset(&self) -> anyhow::Result<()> {
        *self.dataset_ready.lock().unwrap() = true;
        Ok(())
    }

    async fn replace_table(
        &self,
        table: &str,
        _schema: &[ColumnDef],
        rows: &[serde_json::Value],
    ) -> anyhow::Result<()> {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}
