use std::collections::BTreeMap;

use crate::errors::UnknownMetric;
use crate::model::MetricDefinition;

/// Read-only registry of gold-standard metric definitions.
///
/// Populated once at startup; there is no mutation API. These reference
/// queries are what the governed semantic model compiles to, verified by
/// hand, and are the single source of truth for "correct" business logic.
pub struct GoldStandardRegistry {
    metrics: BTreeMap<String, MetricDefinition>,
}

impl GoldStandardRegistry {
    pub fn builtin() -> Self {
        let mut metrics = BTreeMap::new();
        for (name, template) in [
            ("total_revenue", TOTAL_REVENUE),
            ("active_customer_count", ACTIVE_CUSTOMER_COUNT),
            ("txn_count", TXN_COUNT),
            ("avg_txn_amount", AVG_TXN_AMOUNT),
        ] {
            metrics.insert(
                name.to_string(),
                MetricDefinition {
                    name: name.to_string(),
                    reference_query_template: template.to_string(),
                },
            );
        }
        Self { metrics }
    }

    pub fn lookup(&self, metric_name: &str) -> Result<&MetricDefinition, UnknownMetric> {
        self.metrics
            .get(metric_name)
            .ok_or_else(|| UnknownMetric(metric_name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(|k| k.as_str())
    }
}

/// Substitutes `{project}` / `{dataset}` placeholders. Text substitution
/// only: the result is not parsed or validated here.
pub fn resolve(template: &str, project_id: &str, dataset_id: &str) -> String {
    template
        .replace("{project}", project_id)
        .replace("{dataset}", dataset_id)
}

// Exclude refunds, convert EUR->USD, only active accounts.
const TOTAL_REVENUE: &str = r#"
SELECT
    c.segment,
    SUM(
        CASE
            WHEN t.currency = 'EUR' THEN t.amount * 1.1
            ELSE t.amount
        END
    ) AS metric_value
FROM `{project}.{dataset}.fct_transactions` t
JOIN `{project}.{dataset}.dim_accounts` a ON t.acct_id = a.acct_id
JOIN `{project}.{dataset}.dim_customers` c ON a.cust_id = c.cust_id
WHERE t.amount > 0 AND a.status = 'ACTIVE'
GROUP BY 1
ORDER BY 1
"#;

// Distinct customers with at least one transaction on an active account.
const ACTIVE_CUSTOMER_COUNT: &str = r#"
SELECT
    c.segment,
    COUNT(DISTINCT c.cust_id) AS metric_value
FROM `{project}.{dataset}.dim_customers` c
JOIN `{project}.{dataset}.dim_accounts` a ON c.cust_id = a.cust_id
JOIN `{project}.{dataset}.fct_transactions` t ON a.acct_id = t.acct_id
WHERE a.status = 'ACTIVE'
GROUP BY 1
ORDER BY 1
"#;

// Plain transaction volume by merchant category. No adjustments apply.
const TXN_COUNT: &str = r#"
SELECT
    m.category,
    COUNT(*) AS metric_value
FROM `{project}.{dataset}.fct_transactions` t
JOIN `{project}.{dataset}.dim_merchants` m ON t.merch_id = m.merch_id
GROUP BY 1
ORDER BY 1
"#;

// Average normalized amount per risk segment, refunds excluded,
// active accounts only.
const AVG_TXN_AMOUNT: &str = r#"
SELECT
    CASE
        WHEN c.risk_score >= 700 THEN 'High Value'
        WHEN c.risk_score >= 500 THEN 'Standard'
        ELSE 'High Risk'
    END AS segment,
    AVG(
        CASE
            WHEN t.currency = 'EUR' THEN t.amount * 1.1
            ELSE t.amount
        END
    ) AS metric_value
FROM `{project}.{dataset}.fct_transactions` t
JOIN `{project}.{dataset}.dim_accounts` a ON t.acct_id = a.acct_id
JOIN `{project}.{dataset}.dim_customers` c ON a.cust_id = c.cust_id
WHERE t.amount > 0 AND a.status = 'ACTIVE'
GROUP BY 1
ORDER BY 1
"#;
