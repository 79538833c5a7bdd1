use super::{ColumnDef, QueryOutput, Row, Value, Warehouse};
use crate::config::BenchConfig;
use async_trait::async_trait;
use serde_json::json;

const API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";
const INSERT_BATCH: usize = 500;

/// BigQuery REST client. Auth is a plain OAuth2 bearer token supplied by
/// the caller; query jobs always run with the result cache disabled.
pub struct BigQueryClient {
    pub project_id: String,
    pub dataset_id: String,
    pub location: String,
    pub access_token: String,
    pub client: reqwest::Client,
}

impl BigQueryClient {
    pub fn new(config: &BenchConfig, access_token: String) -> Self {
        Self {
            project_id: config.project_id.clone(),
            dataset_id: config.dataset_id.clone(),
            location: config.location.clone(),
            access_token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/projects/{}{}", API_BASE, self.project_id, suffix)
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let payload: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown BigQuery error");
            anyhow::bail!("BigQuery API error ({}): {}", status, message);
        }
        Ok(payload)
    }
}

fn parse_cell(field_type: &str, raw: &serde_json::Value) -> Value {
    if raw.is_null() {
        return Value::Null;
    }
    let Some(s) = raw.as_str() else {
        return Value::Null;
    };
    match field_type {
        "INTEGER" | "INT64" | "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => {
            match s.parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Text(s.to_string()),
            }
        }
        "BOOLEAN" | "BOOL" => Value::Bool(s == "true"),
        _ => Value::Text(s.to_string()),
    }
}

fn parse_rows(payload: &serde_json::Value) -> Vec<Row> {
    let fields: Vec<(String, String)> = payload
        .pointer("/schema/fields")
        .and_then(|v| v.as_array())
        .map(|fs| {
            fs.iter()
                .map(|f| {
                    (
                        f.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        f.get("type").and_then(|v| v.as_str()).unwrap_or("STRING").to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let Some(raw_rows) = payload.get("rows").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    raw_rows
        .iter()
        .map(|raw| {
            let cells = raw
                .get("f")
                .and_then(|v| v.as_array())
                .map(|cs| {
                    cs.iter()
                        .zip(fields.iter())
                        .map(|(cell, (name, ty))| {
                            let v = cell.get("v").cloned().unwrap_or(serde_json::Value::Null);
                            (name.clone(), parse_cell(ty, &v))
                        })
                        .collect()
                })
                .unwrap_or_default();
            Row { cells }
        })
        .collect()
}

#[async_trait]
impl Warehouse for BigQueryClient {
    async fn query(&self, sql: &str) -> anyhow::Result<QueryOutput> {
        let body = json!({
            "query": sql,
            "useLegacySql": false,
            // Force real execution so every run pays real cost.
            "useQueryCache": false,
            "location": self.location,
            "timeoutMs": 60_000,
        });
        let payload = self.post(&self.url("/queries"), body).await?;

        if let Some(errors) = payload.get("errors").and_then(|v| v.as_array()) {
            if let Some(first) = errors.first() {
                let message = first
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown query error");
                anyhow::bail!("query failed: {}", message);
            }
        }

        if payload.get("jobComplete").and_then(|v| v.as_bool()) != Some(true) {
            anyhow::bail!("query did not complete within the request deadline");
        }

        let total_bytes_processed = payload
            .get("totalBytesProcessed")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<u64>().ok());

        Ok(QueryOutput {
            rows: parse_rows(&payload),
            total_bytes_processed,
        })
    }

    async fn ensure_dataset(&self) -> anyhow::Result<()> {
        let body = json!({
            "datasetReference": { "projectId": self.project_id, "datasetId": self.dataset_id },
            "location": "US",
        });
        let resp = self
            .client
            .post(self.url("/datasets"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        // 409: dataset already exists.
        if !resp.status().is_success() && resp.status().as_u16() != 409 {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("failed to create dataset: {}", text);
        }
        Ok(())
    }

    async fn replace_table(
        &self,
        table: &str,
        schema: &[ColumnDef],
        rows: &[serde_json::Value],
    ) -> anyhow::Result<()> {
        let table_url = self.url(&format!("/datasets/{}/tables/{}", self.dataset_id, table));

        // Drop-and-recreate gives WRITE_TRUNCATE semantics. 404 means the
        // table never existed.
        let del = self
            .client
            .delete(&table_url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        if !del.status().is_success() && del.status().as_u16() != 404 {
            let text = del.text().await.unwrap_or_default();
            anyhow::bail!("failed to drop table {}: {}", table, text);
        }

        let fields: Vec<serde_json::Value> = schema
            .iter()
            .map(|c| json!({ "name": c.name, "type": c.ty.bigquery_name() }))
            .collect();
        let body = json!({
            "tableReference": {
                "projectId": self.project_id,
                "datasetId": self.dataset_id,
                "tableId": table,
            },
            "schema": { "fields": fields },
        });
        self.post(&self.url(&format!("/datasets/{}/tables", self.dataset_id)), body)
            .await?;

        for chunk in rows.chunks(INSERT_BATCH) {
            let payload = json!({
                "rows": chunk.iter().map(|r| json!({ "json": r })).collect::<Vec<_>>(),
            });
            let resp = self
                .post(&format!("{}/insertAll", table_url), payload)
                .await?;
            if let Some(errs) = resp.get("insertErrors").and_then(|v| v.as_array()) {
                if !errs.is_empty() {
                    anyhow::bail!(
                        "insert into {} reported {} row errors (first: {})",
                        table,
                        errs.len(),
                        errs[0]
                    );
                }
            }
        }

        tracing::info!(event = "table_loaded", table, rows = rows.len());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "bigquery"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(schema: serde_json::Value, rows: serde_json::Value) -> serde_json::Value {
        json!({ "schema": { "fields": schema }, "rows": rows })
    }

    #[test]
    fn parses_typed_cells_in_column_order() {
        let p = payload(
            json!([
                { "name": "segment", "type": "STRING" },
                { "name": "metric_value", "type": "FLOAT64" }
            ]),
            json!([ { "f": [ { "v": "High Value" }, { "v": "1234.5" } ] } ]),
        );
        let rows = parse_rows(&p);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[0].0, "segment");
        assert_eq!(rows[0].cells[0].1, Value::Text("High Value".to_string()));
        assert_eq!(rows[0].cells[1].1, Value::Number(1234.5));
    }

    #[test]
    fn null_cells_stay_null() {
        let p = payload(
            json!([{ "name": "metric_value", "type": "INT64" }]),
            json!([ { "f": [ { "v": null } ] } ]),
        );
        let rows = parse_rows(&p);
        assert_eq!(rows[0].cells[0].1, Value::Null);
    }

    #[test]
    fn missing_rows_is_empty_result() {
        let p = json!({ "schema": { "fields": [] }, "jobComplete": true });
        assert!(parse_rows(&p).is_empty());
    }
}
