use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::consts;

#[derive(
    Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum IncubationStatus {
    #[default]
    #[display("incubating")]
    Incubating,
    #[display("hatched")]
    Hatched,
    #[display("failed")]
    Failed,
}

/// Egg-laying and hatching cycle of a couple.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct IncubationRecord {
    pub id: i64,
    /// `None` when the father is unknown
    pub father_id: Option<i64>,
    /// `None` when the mother is unknown
    pub mother_id: Option<i64>,
    pub start_date: NaiveDate,
    pub expected_hatch_date: NaiveDate,
    pub actual_hatch_date: Option<NaiveDate>,
    pub eggs_count: u32,
    pub hatched_count: u32,
    pub status: IncubationStatus,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl IncubationRecord {
    /// Days left until the expected hatch date, negative once overdue.
    pub fn days_until_hatch(&self, today: NaiveDate) -> i64 {
        self.expected_hatch_date
            .signed_duration_since(today)
            .num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == IncubationStatus::Incubating && self.days_until_hatch(today) < 0
    }

    pub fn is_finished(&self) -> bool {
        self.status != IncubationStatus::Incubating
    }
}

/// Expected hatch date for eggs laid on `start_date`.
pub fn expected_hatch_date(start_date: NaiveDate) -> NaiveDate {
    start_date + TimeDelta::days(consts::INCUBATION_PERIOD_DAYS)
}

/// Payload used to create or edit an incubation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewIncubation {
    pub father_id: Option<i64>,
    pub mother_id: Option<i64>,
    pub start_date: NaiveDate,
    pub expected_hatch_date: NaiveDate,
    pub eggs_count: u32,
    pub hatched_count: u32,
    pub notes: String,
}

/// Closes an incubation cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncubationOutcome {
    pub status: IncubationStatus,
    pub actual_hatch_date: Option<NaiveDate>,
    pub hatched_count: u32,
}
