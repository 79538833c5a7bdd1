use chrono::{Duration, Utc};
use hallmark_core::providers::warehouse::ColumnDef;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::rows::*;

// Injected data-quality traps. The adjustment logic every generation
// strategy must reproduce hinges on these rows being present.
const REFUND_RATE: f64 = 0.10;
const EUR_RATE: f64 = 0.15;
const DISPUTE_RATE: f64 = 0.05;
const RESPONSE_RATE: f64 = 0.30;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub customers: usize,
    pub branches: usize,
    pub merchants: usize,
    pub campaigns: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 2025,
            customers: 100,
            branches: 10,
            merchants: 20,
            campaigns: 5,
        }
    }
}

/// The nine related tables, generated in dependency order. Deterministic
/// for a fixed seed.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub branches: Vec<Branch>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub merchants: Vec<Merchant>,
    pub campaigns: Vec<Campaign>,
    pub transactions: Vec<Transaction>,
    pub disputes: Vec<Dispute>,
    pub responses: Vec<CampaignResponse>,
}

const FIRST_NAMES: &[&str] = &[
    "Ava", "Noah", "Mia", "Liam", "Zoe", "Ethan", "Ruby", "Lucas", "Ella", "Mason", "Iris",
    "Henry", "Nora", "Owen", "Lena", "Felix",
];
const LAST_NAMES: &[&str] = &[
    "Hughes", "Walsh", "Romero", "Klein", "Osei", "Tanaka", "Novak", "Silva", "Larsen", "Okafor",
    "Meyer", "Duarte", "Kovacs", "Moreau",
];
const COMPANY_STEMS: &[&str] = &[
    "Apex", "Harbor", "Summit", "Cobalt", "Meridian", "Juniper", "Atlas", "Beacon", "Crescent",
    "Vertex",
];
const COMPANY_SUFFIXES: &[&str] = &["Trading", "Holdings", "Outfitters", "Group", "Supply", "Co"];
const STATES: &[&str] = &[
    "CA", "NY", "TX", "WA", "IL", "FL", "MA", "CO", "GA", "OR", "AZ", "NC",
];
const CATEGORIES: &[&str] = &["Travel", "Retail", "Dining"];
const ACCOUNT_STATUSES: &[&str] = &["ACTIVE", "CLOSED", "CHURNED"];
const DISPUTE_REASONS: &[&str] = &["Fraud", "Duplicate", "Not Recognized"];
const DISPUTE_STATUSES: &[&str] = &["OPEN", "RESOLVED"];

fn pick<'a>(rng: &mut ChaCha8Rng, pool: &'a [&'a str]) -> &'a str {
    pool.choose(rng).copied().expect("non-empty pool")
}

fn person_name(rng: &mut ChaCha8Rng) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

fn company_name(rng: &mut ChaCha8Rng) -> String {
    format!("{} {}", pick(rng, COMPANY_STEMS), pick(rng, COMPANY_SUFFIXES))
}

fn hex_id(rng: &mut ChaCha8Rng) -> String {
    format!("{:032x}", rng.gen::<u128>())
}

fn date_within_days(rng: &mut ChaCha8Rng, days_back: i64) -> String {
    let offset = rng.gen_range(0..days_back);
    (Utc::now().date_naive() - Duration::days(offset)).to_string()
}

impl SyntheticDataset {
    pub fn generate(cfg: &GeneratorConfig) -> Self {
        let rng = &mut ChaCha8Rng::seed_from_u64(cfg.seed);

        let branches: Vec<Branch> = (0..cfg.branches)
            .map(|i| Branch {
                branch_id: format!("B_{i}"),
                state: pick(rng, STATES).to_string(),
                manager: person_name(rng),
            })
            .collect();

        // Fixed card catalog.
        let products = vec![
            Product {
                prod_code: "P_PLAT".into(),
                name: "Platinum Card".into(),
                fee: 550,
            },
            Product {
                prod_code: "P_GOLD".into(),
                name: "Gold Card".into(),
                fee: 250,
            },
            Product {
                prod_code: "P_BLUE".into(),
                name: "Blue Cash".into(),
                fee: 0,
            },
        ];

        let customers: Vec<Customer> = (0..cfg.customers)
            .map(|i| Customer {
                cust_id: format!("C_{i}"),
                branch_id: branches[rng.gen_range(0..branches.len())].branch_id.clone(),
                name: person_name(rng),
                risk_score: rng.gen_range(300..=850),
            })
            .collect();

        let mut accounts = Vec::new();
        for c in &customers {
            for _ in 0..rng.gen_range(1..=3) {
                accounts.push(Account {
                    acct_id: format!("A_{}", &hex_id(rng)[..8]),
                    cust_id: c.cust_id.clone(),
                    prod_code: products[rng.gen_range(0..products.len())].prod_code.clone(),
                    status: pick(rng, ACCOUNT_STATUSES).to_string(),
                });
            }
        }

        let merchants: Vec<Merchant> = (0..cfg.merchants)
            .map(|i| Merchant {
                merch_id: format!("M_{i}"),
                name: company_name(rng),
                category: pick(rng, CATEGORIES).to_string(),
            })
            .collect();

        let campaigns: Vec<Campaign> = (0..cfg.campaigns)
            .map(|i| Campaign {
                camp_id: format!("CMP_{i}"),
                name: format!("Promo {}", 2024 + i),
                channel: "Email".into(),
            })
            .collect();

        let mut transactions = Vec::new();
        for a in &accounts {
            for _ in 0..rng.gen_range(5..=20) {
                let mut amount = (rng.gen_range(10.0..2000.0) * 100.0_f64).round() / 100.0;
                if rng.gen_bool(REFUND_RATE) {
                    amount = -amount;
                }
                let currency = if rng.gen_bool(EUR_RATE) { "EUR" } else { "USD" };
                transactions.push(Transaction {
                    txn_id: hex_id(rng),
                    acct_id: a.acct_id.clone(),
                    merch_id: merchants[rng.gen_range(0..merchants.len())].merch_id.clone(),
                    amount,
                    currency: currency.to_string(),
                    txn_date: date_within_days(rng, 365),
                });
            }
        }

        let mut disputes = Vec::new();
        for t in &transactions {
            if rng.gen_bool(DISPUTE_RATE) {
                disputes.push(Dispute {
                    dispute_id: hex_id(rng),
                    txn_id: t.txn_id.clone(),
                    reason: pick(rng, DISPUTE_REASONS).to_string(),
                    status: pick(rng, DISPUTE_STATUSES).to_string(),
                });
            }
        }

        let mut responses = Vec::new();
        for c in &customers {
            if rng.gen_bool(RESPONSE_RATE) {
                responses.push(CampaignResponse {
                    resp_id: hex_id(rng),
                    cust_id: c.cust_id.clone(),
                    camp_id: campaigns[rng.gen_range(0..campaigns.len())].camp_id.clone(),
                    responded_at: date_within_days(rng, 200),
                });
            }
        }

        Self {
            branches,
            products,
            customers,
            accounts,
            merchants,
            campaigns,
            transactions,
            disputes,
            responses,
        }
    }

    /// Tables in load order, as (name, schema, serialized rows).
    pub fn tables(&self) -> Vec<(&'static str, &'static [ColumnDef], Vec<serde_json::Value>)> {
        fn rows<T: Serialize>(items: &[T]) -> Vec<serde_json::Value> {
            items
                .iter()
                .map(|r| serde_json::to_value(r).expect("row serializes"))
                .collect()
        }

        vec![
            ("dim_branches", BRANCH_SCHEMA, rows(&self.branches)),
            ("dim_products", PRODUCT_SCHEMA, rows(&self.products)),
            ("dim_customers", CUSTOMER_SCHEMA, rows(&self.customers)),
            ("dim_accounts", ACCOUNT_SCHEMA, rows(&self.accounts)),
            ("dim_merchants", MERCHANT_SCHEMA, rows(&self.merchants)),
            ("dim_campaigns", CAMPAIGN_SCHEMA, rows(&self.campaigns)),
            ("fct_transactions", TRANSACTION_SCHEMA, rows(&self.transactions)),
            ("fct_disputes", DISPUTE_SCHEMA, rows(&self.disputes)),
            ("fct_responses", RESPONSE_SCHEMA, rows(&self.responses)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dataset() -> SyntheticDataset {
        SyntheticDataset::generate(&GeneratorConfig::default())
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = SyntheticDataset::generate(&GeneratorConfig::default());
        let b = SyntheticDataset::generate(&GeneratorConfig::default());
        assert_eq!(a.transactions.len(), b.transactions.len());
        assert_eq!(a.transactions[0].txn_id, b.transactions[0].txn_id);
        assert_eq!(a.customers[7].name, b.customers[7].name);
    }

    #[test]
    fn row_counts_follow_config() {
        let data = dataset();
        assert_eq!(data.branches.len(), 10);
        assert_eq!(data.products.len(), 3);
        assert_eq!(data.customers.len(), 100);
        assert_eq!(data.merchants.len(), 20);
        assert_eq!(data.campaigns.len(), 5);
        assert!(data.accounts.len() >= 100 && data.accounts.len() <= 300);
        assert!(data.transactions.len() >= data.accounts.len() * 5);
    }

    #[test]
    fn trap_rates_are_in_range() {
        let data = dataset();
        let n = data.transactions.len() as f64;
        let refunds = data.transactions.iter().filter(|t| t.amount < 0.0).count() as f64;
        let eur = data
            .transactions
            .iter()
            .filter(|t| t.currency == "EUR")
            .count() as f64;
        let refund_rate = refunds / n;
        let eur_rate = eur / n;
        assert!((0.06..=0.14).contains(&refund_rate), "refund rate {refund_rate}");
        assert!((0.10..=0.20).contains(&eur_rate), "eur rate {eur_rate}");
    }

    #[test]
    fn referential_integrity_holds() {
        let data = dataset();
        let branch_ids: HashSet<_> = data.branches.iter().map(|b| &b.branch_id).collect();
        let cust_ids: HashSet<_> = data.customers.iter().map(|c| &c.cust_id).collect();
        let acct_ids: HashSet<_> = data.accounts.iter().map(|a| &a.acct_id).collect();
        let merch_ids: HashSet<_> = data.merchants.iter().map(|m| &m.merch_id).collect();
        let txn_ids: HashSet<_> = data.transactions.iter().map(|t| &t.txn_id).collect();
        let camp_ids: HashSet<_> = data.campaigns.iter().map(|c| &c.camp_id).collect();

        assert!(data.customers.iter().all(|c| branch_ids.contains(&c.branch_id)));
        assert!(data.accounts.iter().all(|a| cust_ids.contains(&a.cust_id)));
        assert!(data
            .transactions
            .iter()
            .all(|t| acct_ids.contains(&t.acct_id) && merch_ids.contains(&t.merch_id)));
        assert!(data.disputes.iter().all(|d| txn_ids.contains(&d.txn_id)));
        assert!(data
            .responses
            .iter()
            .all(|r| cust_ids.contains(&r.cust_id) && camp_ids.contains(&r.camp_id)));
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let data = dataset();
        for t in data.transactions.iter().take(50) {
            let cents = t.amount * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6, "amount {}", t.amount);
        }
    }

    #[test]
    fn nine_tables_in_load_order() {
        let data = dataset();
        let names: Vec<_> = data.tables().iter().map(|(n, _, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "dim_branches",
                "dim_products",
                "dim_customers",
                "dim_accounts",
                "dim_merchants",
                "dim_campaigns",
                "fct_transactions",
                "fct_disputes",
                "fct_responses",
            ]
        );
    }
}
