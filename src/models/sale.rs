use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SaleInfo {
    pub seller: String,
    pub buyer_name: String,
    pub price: Decimal,
    pub contact: String,
    pub sold_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ReturnInfo {
    pub reason: String,
    pub returned_at: DateTime<Utc>,
}

#[derive(
    Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("contacted")]
    Contacted,
    #[display("satisfied")]
    Satisfied,
    #[display("issue")]
    Issue,
}

/// Post-sale customer contact record.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FollowUp {
    pub id: i64,
    pub bird_id: i64,
    pub status: FollowUpStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewFollowUp {
    pub status: FollowUpStatus,
    pub note: String,
}
