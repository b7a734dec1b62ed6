use crate::{
    consts,
    front::errors::FieldError,
    models::{
        self,
        bird::{BirdStatus, Gender, Price},
    },
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Create/edit form of a bird record.
///
/// `price_max` turns the price into a range starting at `price`.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct BirdForm {
    pub breed: String,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub ring_number: Option<String>,
    pub price: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub health_notes: String,
}

impl BirdForm {
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = vec![];

        if self.breed.trim().is_empty() {
            errors.push(FieldError::new("breed", "breed is required"));
        }

        if self.birth_date.is_some_and(|birth_date| birth_date > today) {
            errors.push(FieldError::new(
                "birth_date",
                "birth date cannot be in the future",
            ));
        }

        if let Some(ring_number) = self.ring_number() {
            if ring_number.chars().count() > consts::RING_NUMBER_MAX_LEN {
                errors.push(FieldError::new(
                    "ring_number",
                    format!(
                        "ring number is longer than {} chars",
                        consts::RING_NUMBER_MAX_LEN
                    ),
                ));
            }
            if !ring_number
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-')
            {
                errors.push(FieldError::new(
                    "ring_number",
                    "ring number only accepts letters, digits and '-'",
                ));
            }
        }

        match (self.price, self.price_max) {
            (None, Some(_)) => errors.push(FieldError::new(
                "price",
                "a minimum price is required for a price range",
            )),
            (Some(min), max) => {
                if min.is_sign_negative() || max.is_some_and(|max| max.is_sign_negative()) {
                    errors.push(FieldError::new("price", "price cannot be negative"));
                }
                if min > consts::MAX_SALE_PRICE
                    || max.is_some_and(|max| max > consts::MAX_SALE_PRICE)
                {
                    errors.push(FieldError::new("price", "price is too high"));
                }
                if max.is_some_and(|max| max < min) {
                    errors.push(FieldError::new(
                        "price_max",
                        "maximum price is lower than the minimum",
                    ));
                }
            }
            (None, None) => {}
        }

        errors
    }

    /// Trimmed, upper-cased ring number, `None` when blank.
    pub fn ring_number(&self) -> Option<String> {
        self.ring_number
            .as_deref()
            .map(|ring| ring.trim().to_uppercase())
            .filter(|ring| !ring.is_empty())
    }

    pub fn price(&self) -> Option<Price> {
        match (self.price, self.price_max) {
            (Some(min), Some(max)) if min != max => Some(Price::Range { min, max }),
            (Some(amount), _) => Some(Price::Fixed { amount }),
            (None, _) => None,
        }
    }
}

impl From<BirdForm> for models::bird::NewBird {
    fn from(val: BirdForm) -> Self {
        models::bird::NewBird {
            ring_number: val.ring_number(),
            price: val.price(),
            breed: val.breed.trim().to_string(),
            gender: val.gender,
            birth_date: val.birth_date,
            health_notes: val.health_notes.trim().to_string(),
        }
    }
}

impl From<&models::bird::Bird> for BirdForm {
    fn from(bird: &models::bird::Bird) -> Self {
        let (price, price_max) = match &bird.price {
            Some(Price::Fixed { amount }) => (Some(*amount), None),
            Some(Price::Range { min, max }) => (Some(*min), Some(*max)),
            None => (None, None),
        };

        BirdForm {
            breed: bird.breed.clone(),
            gender: bird.gender,
            birth_date: bird.birth_date,
            ring_number: bird.ring_number.clone(),
            price,
            price_max,
            health_notes: bird.health_notes.clone(),
        }
    }
}

/// Query of the bird list view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BirdFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BirdStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for BirdFilter {
    fn default() -> Self {
        Self {
            status: None,
            gender: None,
            breed: None,
            keyword: None,
            page: 1,
            page_size: consts::DEFAULT_PAGE_SIZE,
        }
    }
}

impl BirdFilter {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];

        if self.page == 0 {
            errors.push(FieldError::new("page", "pages start at 1"));
        }

        if self.page_size == 0 || self.page_size > consts::MAX_PAGE_SIZE {
            errors.push(FieldError::new(
                "page_size",
                format!("page size must be between 1 and {}", consts::MAX_PAGE_SIZE),
            ));
        }

        errors
    }
}
