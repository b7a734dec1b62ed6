use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    front::errors::{FieldError, UserError, ensure_valid},
    models::incubation::{self, IncubationOutcome, IncubationRecord, IncubationStatus, NewIncubation},
};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct IncubationForm {
    /// `None` when the father is unknown
    pub father_id: Option<i64>,
    /// `None` when the mother is unknown
    pub mother_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub eggs_count: u32,
    pub hatched_count: u32,
    pub notes: String,
}

impl IncubationForm {
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = vec![];

        match self.start_date {
            None => errors.push(FieldError::new("start_date", "start date is required")),
            Some(start_date) if start_date > today => errors.push(FieldError::new(
                "start_date",
                "start date cannot be in the future",
            )),
            Some(_) => {}
        }

        if self.eggs_count == 0 {
            errors.push(FieldError::new("eggs_count", "at least one egg is required"));
        }

        if self.hatched_count > self.eggs_count {
            errors.push(FieldError::new(
                "hatched_count",
                "hatched count cannot exceed eggs count",
            ));
        }

        if self.father_id.is_some() && self.father_id == self.mother_id {
            errors.push(FieldError::new(
                "mother_id",
                "father and mother must be different birds",
            ));
        }

        errors
    }

    /// Validated payload, the expected hatch date is always start + 21 days.
    pub fn into_new_incubation(self, today: NaiveDate) -> Result<NewIncubation, UserError> {
        ensure_valid(self.validate(today))?;

        let start_date = self.start_date.unwrap_or(today);
        Ok(NewIncubation {
            father_id: self.father_id,
            mother_id: self.mother_id,
            start_date,
            expected_hatch_date: incubation::expected_hatch_date(start_date),
            eggs_count: self.eggs_count,
            hatched_count: self.hatched_count,
            notes: self.notes.trim().to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HatchForm {
    pub actual_hatch_date: NaiveDate,
    pub hatched_count: u32,
}

impl HatchForm {
    pub fn validate(&self, record: &IncubationRecord) -> Vec<FieldError> {
        let mut errors = vec![];

        if self.actual_hatch_date < record.start_date {
            errors.push(FieldError::new(
                "actual_hatch_date",
                "hatch date is before the incubation start",
            ));
        }

        if self.hatched_count == 0 {
            errors.push(FieldError::new(
                "hatched_count",
                "a hatch needs at least one chick, mark the record as failed instead",
            ));
        }

        if self.hatched_count > record.eggs_count {
            errors.push(FieldError::new(
                "hatched_count",
                "hatched count cannot exceed eggs count",
            ));
        }

        errors
    }
}

impl From<HatchForm> for IncubationOutcome {
    fn from(val: HatchForm) -> Self {
        IncubationOutcome {
            status: IncubationStatus::Hatched,
            actual_hatch_date: Some(val.actual_hatch_date),
            hatched_count: val.hatched_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_form() -> IncubationForm {
        IncubationForm {
            father_id: Some(1),
            mother_id: Some(2),
            start_date: Some(date(2024, 5, 20)),
            eggs_count: 4,
            hatched_count: 0,
            notes: "".into(),
        }
    }

    #[test]
    fn test_hatched_count_cannot_exceed_eggs() {
        let form = IncubationForm {
            eggs_count: 3,
            hatched_count: 4,
            ..valid_form()
        };

        let err = form.into_new_incubation(date(2024, 6, 1)).unwrap_err();
        match err {
            UserError::FormInputValueError(errors) => assert!(errors.has_field("hatched_count")),
            _ => panic!("unexpected error {err:?}"),
        }
    }

    #[test]
    fn test_expected_hatch_date_is_derived() {
        let new_incubation = valid_form().into_new_incubation(date(2024, 6, 1)).unwrap();

        assert_eq!(new_incubation.start_date, date(2024, 5, 20));
        assert_eq!(new_incubation.expected_hatch_date, date(2024, 6, 10));
    }

    #[test]
    fn test_unknown_parents_are_allowed() {
        let form = IncubationForm {
            father_id: None,
            mother_id: None,
            ..valid_form()
        };
        assert!(form.validate(date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_same_parent_twice_is_rejected() {
        let form = IncubationForm {
            mother_id: Some(1),
            ..valid_form()
        };
        assert!(form.validate(date(2024, 6, 1)).iter().any(|e| e.field == "mother_id"));
    }

    #[test]
    fn test_missing_start_date_and_eggs() {
        let errors = IncubationForm::default().validate(date(2024, 6, 1));
        let fields = errors.iter().map(|e| e.field).collect::<Vec<&str>>();

        assert_eq!(fields, vec!["start_date", "eggs_count"]);
    }

    #[test]
    fn test_hatch_form_rules() {
        let record = IncubationRecord {
            start_date: date(2024, 5, 1),
            expected_hatch_date: date(2024, 5, 22),
            eggs_count: 3,
            ..IncubationRecord::default()
        };

        let form = HatchForm {
            actual_hatch_date: date(2024, 5, 23),
            hatched_count: 2,
        };
        assert!(form.validate(&record).is_empty());

        let form = HatchForm {
            actual_hatch_date: date(2024, 4, 30),
            hatched_count: 5,
        };
        let errors = form.validate(&record);
        assert!(errors.iter().any(|e| e.field == "actual_hatch_date"));
        assert!(errors.iter().any(|e| e.field == "hatched_count"));
    }
}
