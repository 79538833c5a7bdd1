use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One typed cell value from a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One result row: cells in the column order the backend defined.
/// Order matters; aggregate extraction scans left to right.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<(String, Value)>,
}

impl Row {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            cells: pairs.into_iter().map(|(c, v)| (c.into(), v)).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        for (column, value) in &self.cells {
            let v = match value {
                Value::Number(n) => serde_json::json!(n),
                Value::Text(s) => serde_json::json!(s),
                Value::Bool(b) => serde_json::json!(b),
                Value::Null => serde_json::Value::Null,
            };
            obj.insert(column.clone(), v);
        }
        serde_json::Value::Object(obj)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub total_bytes_processed: Option<u64>,
}

/// Column type for table creation during data loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int64,
    Float64,
    Date,
}

impl ColumnType {
    pub fn bigquery_name(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Int64 => "INT64",
            ColumnType::Float64 => "FLOAT64",
            ColumnType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// The query-execution backend. Implementations must never serve cached
/// results for `query`: every call measures true cost and latency.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn query(&self, sql: &str) -> anyhow::Result<QueryOutput>;

    async fn ensure_dataset(&self) -> anyhow::Result<()>;

    /// Truncate-and-load: drops any existing table content and loads the
    /// given rows under the given schema.
    async fn replace_table(
        &self,
        table: &str,
        schema: &[ColumnDef],
        rows: &[serde_json::Value],
    ) -> anyhow::Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub mod bigquery;
pub mod fake;
