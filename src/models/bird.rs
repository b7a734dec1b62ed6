use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[display("male")]
    Male,
    #[display("female")]
    Female,
    /// Sex not yet confirmed (DNA test pending)
    #[default]
    #[display("unverified")]
    Unverified,
}

impl Gender {
    pub fn is_verified(&self) -> bool {
        !matches!(self, Gender::Unverified)
    }

    /// Gender a mate must have, `None` while unverified.
    pub fn opposite(&self) -> Option<Gender> {
        match self {
            Gender::Male => Some(Gender::Female),
            Gender::Female => Some(Gender::Male),
            Gender::Unverified => None,
        }
    }
}

#[derive(
    Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum BirdStatus {
    #[default]
    #[display("available")]
    Available,
    #[display("sold")]
    Sold,
    #[display("returned")]
    Returned,
    #[display("breeding")]
    Breeding,
    // Older backend versions store it; see Bird::display_status
    #[display("paired")]
    Paired,
    #[display("incubating")]
    Incubating,
}

impl BirdStatus {
    /// Whether a status-change request from `self` to `next` may be sent.
    ///
    /// Breeding branch: available -> breeding -> incubating -> available.
    /// Commerce branch: available -> sold -> returned -> available.
    pub fn can_transition_to(&self, next: &BirdStatus) -> bool {
        use BirdStatus::*;

        matches!(
            (self, next),
            (Available, Breeding)
                | (Available, Sold)
                | (Sold, Returned)
                | (Returned, Available)
                | (Breeding, Available)
                | (Breeding, Incubating)
                | (Paired, Incubating)
                | (Incubating, Available)
        )
    }

    /// Statuses a bird can be in while it takes part in breeding.
    pub fn is_breeding_branch(&self) -> bool {
        matches!(
            self,
            BirdStatus::Breeding | BirdStatus::Paired | BirdStatus::Incubating
        )
    }
}

/// Asking price, either fixed or a negotiable range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Price {
    Fixed { amount: Decimal },
    Range { min: Decimal, max: Decimal },
}

impl Price {
    pub fn is_valid(&self) -> bool {
        match self {
            Price::Fixed { amount } => !amount.is_sign_negative(),
            Price::Range { min, max } => !min.is_sign_negative() && min <= max,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Bird {
    pub id: i64,
    pub breed: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    /// Leg band label, unique across the shop (enforced by the backend)
    pub ring_number: Option<String>,
    pub price: Option<Price>,
    #[serde(default)]
    pub health_notes: String,
    pub status: BirdStatus,
    pub mate_id: Option<i64>,
    pub paired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bird {
    pub fn is_mated(&self) -> bool {
        self.mate_id.is_some()
    }

    /// Status shown to the user.
    ///
    /// `paired` is derived from `mate_id`: a breeding bird with a mate is
    /// paired, and a stored `paired` without a mate is shown as breeding.
    pub fn display_status(&self) -> BirdStatus {
        match (self.status, self.mate_id) {
            (BirdStatus::Breeding, Some(_)) => BirdStatus::Paired,
            (BirdStatus::Paired, None) => BirdStatus::Breeding,
            (status, _) => status,
        }
    }

    pub fn age_in_days(&self, today: NaiveDate) -> Option<i64> {
        self.birth_date
            .map(|birth_date| today.signed_duration_since(birth_date).num_days())
    }

    /// Age eligibility for breeding, a bird with unknown birth date is eligible.
    pub fn is_old_enough(&self, today: NaiveDate, min_age_days: i64) -> bool {
        self.age_in_days(today)
            .map(|days| days >= min_age_days)
            .unwrap_or(true)
    }

    /// Shown as breeding (so unmated), the only birds offered as mates.
    pub fn is_open_for_pairing(&self) -> bool {
        self.display_status() == BirdStatus::Breeding
    }
}

/// Payload for creating or updating a bird record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewBird {
    pub breed: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub ring_number: Option<String>,
    pub price: Option<Price>,
    pub health_notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: BirdStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairRequest {
    pub male_id: i64,
    pub female_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        assert!(BirdStatus::Available.can_transition_to(&BirdStatus::Breeding));
        assert!(BirdStatus::Available.can_transition_to(&BirdStatus::Sold));
        assert!(BirdStatus::Sold.can_transition_to(&BirdStatus::Returned));
        assert!(BirdStatus::Returned.can_transition_to(&BirdStatus::Available));
        assert!(BirdStatus::Breeding.can_transition_to(&BirdStatus::Incubating));
        assert!(BirdStatus::Incubating.can_transition_to(&BirdStatus::Available));

        assert!(!BirdStatus::Sold.can_transition_to(&BirdStatus::Breeding));
        assert!(!BirdStatus::Available.can_transition_to(&BirdStatus::Returned));
        assert!(!BirdStatus::Breeding.can_transition_to(&BirdStatus::Sold));
        assert!(!BirdStatus::Returned.can_transition_to(&BirdStatus::Sold));
        assert!(!BirdStatus::Breeding.can_transition_to(&BirdStatus::Paired));
        assert!(!BirdStatus::Paired.can_transition_to(&BirdStatus::Breeding));
        assert!(!BirdStatus::Paired.can_transition_to(&BirdStatus::Available));
    }

    #[test]
    fn test_display_status_derives_paired_from_mate() {
        let mut bird = Bird {
            status: BirdStatus::Breeding,
            ..Bird::default()
        };
        assert_eq!(bird.display_status(), BirdStatus::Breeding);

        bird.mate_id = Some(7);
        assert_eq!(bird.display_status(), BirdStatus::Paired);

        bird.status = BirdStatus::Paired;
        bird.mate_id = None;
        assert_eq!(bird.display_status(), BirdStatus::Breeding);

        bird.status = BirdStatus::Incubating;
        bird.mate_id = Some(7);
        assert_eq!(bird.display_status(), BirdStatus::Incubating);
    }

    #[test]
    fn test_is_old_enough() {
        let today = date(2024, 6, 1);
        let mut bird = Bird {
            birth_date: Some(date(2024, 2, 1)),
            ..Bird::default()
        };

        assert_eq!(bird.age_in_days(today), Some(121));
        assert!(bird.is_old_enough(today, 120));
        assert!(!bird.is_old_enough(today, 150));

        bird.birth_date = None;
        assert!(bird.is_old_enough(today, 365));
    }

    #[test]
    fn test_stored_paired_without_mate_is_open_for_pairing() {
        let mut bird = Bird {
            status: BirdStatus::Paired,
            mate_id: None,
            ..Bird::default()
        };
        assert!(bird.is_open_for_pairing());

        bird.status = BirdStatus::Breeding;
        bird.mate_id = Some(4);
        assert!(!bird.is_open_for_pairing());

        bird.status = BirdStatus::Incubating;
        bird.mate_id = None;
        assert!(!bird.is_open_for_pairing());
    }

    #[test]
    fn test_breeding_branch() {
        assert!(BirdStatus::Breeding.is_breeding_branch());
        assert!(BirdStatus::Paired.is_breeding_branch());
        assert!(BirdStatus::Incubating.is_breeding_branch());
        assert!(!BirdStatus::Available.is_breeding_branch());
        assert!(!BirdStatus::Returned.is_breeding_branch());
    }

    #[test]
    fn test_gender_opposite() {
        assert_eq!(Gender::Male.opposite(), Some(Gender::Female));
        assert_eq!(Gender::Female.opposite(), Some(Gender::Male));
        assert_eq!(Gender::Unverified.opposite(), None);
    }

    #[test]
    fn test_price_validity() {
        assert!(Price::Fixed { amount: dec!(0) }.is_valid());
        assert!(!Price::Fixed { amount: dec!(-1) }.is_valid());
        assert!(
            Price::Range {
                min: dec!(800),
                max: dec!(1200)
            }
            .is_valid()
        );
        assert!(
            !Price::Range {
                min: dec!(1200),
                max: dec!(800)
            }
            .is_valid()
        );
    }

    #[test]
    fn test_bird_deserializes_backend_json() {
        let bird: Bird = serde_json::from_str(
            r#"{
                "id": 3,
                "breed": "Cockatiel",
                "gender": "female",
                "birth_date": "2023-05-01",
                "ring_number": "CN-2023-0042",
                "price": {"kind": "range", "min": "800", "max": "1200"},
                "status": "breeding",
                "mate_id": null,
                "paired_at": null,
                "created_at": "2023-06-01T08:00:00Z",
                "updated_at": "2023-06-01T08:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(bird.gender, Gender::Female);
        assert_eq!(bird.status, BirdStatus::Breeding);
        assert!(bird.health_notes.is_empty());
        assert!(bird.is_open_for_pairing());
    }
}
