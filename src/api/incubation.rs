use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    front::{
        self,
        errors::{UserError, ensure_valid},
    },
    metric,
    models::incubation::{IncubationOutcome, IncubationRecord, IncubationStatus},
    repo,
};

/// Incubation record with its countdown, as shown in the incubation list.
#[derive(Debug, Serialize)]
pub struct IncubationSchema {
    pub id: i64,
    pub father_id: Option<i64>,
    pub mother_id: Option<i64>,
    pub start_date: NaiveDate,
    pub expected_hatch_date: NaiveDate,
    pub actual_hatch_date: Option<NaiveDate>,
    pub eggs_count: u32,
    pub hatched_count: u32,
    pub status: IncubationStatus,
    pub status_label: String,
    /// `None` once the record is closed
    pub days_until_hatch: Option<i64>,
    pub is_overdue: bool,
    pub notes: String,
}

impl IncubationSchema {
    pub fn from_record(val: IncubationRecord, today: NaiveDate) -> Self {
        IncubationSchema {
            days_until_hatch: (!val.is_finished()).then(|| val.days_until_hatch(today)),
            is_overdue: val.is_overdue(today),
            status_label: front::utils::incubation_status_label(val.status).to_string(),
            id: val.id,
            father_id: val.father_id,
            mother_id: val.mother_id,
            start_date: val.start_date,
            expected_hatch_date: val.expected_hatch_date,
            actual_hatch_date: val.actual_hatch_date,
            eggs_count: val.eggs_count,
            hatched_count: val.hatched_count,
            status: val.status,
            notes: val.notes,
        }
    }
}

/// Incubation records, optionally filtered by status, closest hatch first.
pub async fn list_incubations(
    status: Option<IncubationStatus>,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<IncubationSchema>> {
    let mut records = repo.list_incubations(status).await?;
    records.sort_by_key(|record| record.expected_hatch_date);

    Ok(records
        .into_iter()
        .map(|record| IncubationSchema::from_record(record, today))
        .collect())
}

/// Records an incubation directly, without going through the couple.
///
/// The expected hatch date is computed from the start date.
pub async fn create_incubation(
    incubation_info: front::forms::incubation::IncubationForm,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<IncubationRecord> {
    let new_incubation = incubation_info.into_new_incubation(today)?;
    repo.create_incubation(&new_incubation).await
}

pub async fn update_incubation(
    incubation_id: i64,
    incubation_info: front::forms::incubation::IncubationForm,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<IncubationRecord> {
    let new_incubation = incubation_info.into_new_incubation(today)?;
    repo.update_incubation(incubation_id, &new_incubation).await
}

async fn get_open_incubation(
    incubation_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<IncubationRecord> {
    let record = repo.get_incubation(incubation_id).await?;
    if record.is_finished() {
        return Err(UserError::IncubationClosed.into());
    }
    Ok(record)
}

/// Closes an incubation as hatched.
///
/// # Errors
/// - [`UserError::IncubationClosed`] when the record is already hatched or failed
/// - [`UserError::FormInputValueError`] when more chicks than eggs are reported
pub async fn record_hatch(
    incubation_id: i64,
    hatch_info: front::forms::incubation::HatchForm,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<IncubationRecord> {
    let record = get_open_incubation(incubation_id, repo).await?;
    ensure_valid(hatch_info.validate(&record))?;

    let record = repo
        .complete_incubation(incubation_id, &hatch_info.into())
        .await?;
    metric::incr_bird_action_statds("hatch");

    Ok(record)
}

/// Closes an incubation as failed, no chick hatched.
pub async fn mark_failed(
    incubation_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<IncubationRecord> {
    get_open_incubation(incubation_id, repo).await?;

    let outcome = IncubationOutcome {
        status: IncubationStatus::Failed,
        actual_hatch_date: None,
        hatched_count: 0,
    };
    repo.complete_incubation(incubation_id, &outcome).await
}
