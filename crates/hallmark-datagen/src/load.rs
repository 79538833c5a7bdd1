use hallmark_core::providers::warehouse::Warehouse;

use crate::generate::SyntheticDataset;

/// Loads all nine tables with truncate-and-load semantics. The pipeline
/// never calls this; it is seeding plumbing for the benchmark dataset.
pub async fn upload(warehouse: &dyn Warehouse, data: &SyntheticDataset) -> anyhow::Result<()> {
    warehouse.ensure_dataset().await?;
    for (table, schema, rows) in data.tables() {
        tracing::info!(event = "uploading_table", table, rows = rows.len());
        warehouse.replace_table(table, schema, &rows).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GeneratorConfig, SyntheticDataset};
    use hallmark_core::providers::warehouse::fake::FakeWarehouse;

    #[tokio::test]
    async fn uploads_every_table() -> anyhow::Result<()> {
        let warehouse = FakeWarehouse::new();
        let data = SyntheticDataset::generate(&GeneratorConfig {
            customers: 10,
            ..GeneratorConfig::default()
        });

        upload(&warehouse, &data).await?;

        assert!(warehouse.dataset_ready());
        for (table, _, rows) in data.tables() {
            let loaded = warehouse.table_rows(table).expect(table);
            assert_eq!(loaded.len(), rows.len(), "{table}");
        }

        let txns = warehouse.table_rows("fct_transactions").unwrap();
        assert!(txns[0].get("amount").is_some());
        assert!(txns[0].get("currency").is_some());
        Ok(())
    }
}
