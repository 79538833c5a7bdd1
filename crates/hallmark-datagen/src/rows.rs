use hallmark_core::providers::warehouse::ColumnDef;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub branch_id: String,
    pub state: String,
    pub manager: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub prod_code: String,
    pub name: String,
    pub fee: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub cust_id: String,
    pub branch_id: String,
    pub name: String,
    pub risk_score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub acct_id: String,
    pub cust_id: String,
    pub prod_code: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Merchant {
    pub merch_id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub camp_id: String,
    pub name: String,
    pub channel: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub txn_id: String,
    pub acct_id: String,
    pub merch_id: String,
    pub amount: f64,
    pub currency: String,
    pub txn_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dispute {
    pub dispute_id: String,
    pub txn_id: String,
    pub reason: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignResponse {
    pub resp_id: String,
    pub cust_id: String,
    pub camp_id: String,
    pub responded_at: String,
}

use hallmark_core::providers::warehouse::ColumnType::{Date, Float64, Int64, String as Str};

pub const BRANCH_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("branch_id", Str),
    ColumnDef::new("state", Str),
    ColumnDef::new("manager", Str),
];

pub const PRODUCT_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("prod_code", Str),
    ColumnDef::new("name", Str),
    ColumnDef::new("fee", Int64),
];

pub const CUSTOMER_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("cust_id", Str),
    ColumnDef::new("branch_id", Str),
    ColumnDef::new("name", Str),
    ColumnDef::new("risk_score", Int64),
];

pub const ACCOUNT_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("acct_id", Str),
    ColumnDef::new("cust_id", Str),
    ColumnDef::new("prod_code", Str),
    ColumnDef::new("status", Str),
];

pub const MERCHANT_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("merch_id", Str),
    ColumnDef::new("name", Str),
    ColumnDef::new("category", Str),
];

pub const CAMPAIGN_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("camp_id", Str),
    ColumnDef::new("name", Str),
    ColumnDef::new("channel", Str),
];

pub const TRANSACTION_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("txn_id", Str),
    ColumnDef::new("acct_id", Str),
    ColumnDef::new("merch_id", Str),
    ColumnDef::new("amount", Float64),
    ColumnDef::new("currency", Str),
    ColumnDef::new("txn_date", Date),
];

pub const DISPUTE_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("dispute_id", Str),
    ColumnDef::new("txn_id", Str),
    ColumnDef::new("reason", Str),
    ColumnDef::new("status", Str),
];

pub const RESPONSE_SCHEMA: &[ColumnDef] = &[
    ColumnDef::new("resp_id", Str),
    ColumnDef::new("cust_id", Str),
    ColumnDef::new("camp_id", Str),
    ColumnDef::new("responded_at", Date),
];
