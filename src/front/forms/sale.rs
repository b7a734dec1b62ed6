use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    consts,
    front::errors::FieldError,
    models::sale::{FollowUpStatus, NewFollowUp, ReturnInfo, SaleInfo},
};

fn require_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{field} is required")));
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct SellForm {
    pub seller: String,
    pub buyer_name: String,
    pub price: Option<Decimal>,
    pub contact: String,
    pub notes: String,
}

impl SellForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];

        require_text(&mut errors, "seller", &self.seller);
        require_text(&mut errors, "buyer_name", &self.buyer_name);
        require_text(&mut errors, "contact", &self.contact);

        match self.price {
            None => errors.push(FieldError::new("price", "price is required")),
            Some(price) if price <= Decimal::ZERO => {
                errors.push(FieldError::new("price", "price must be greater than 0"))
            }
            Some(price) if price > consts::MAX_SALE_PRICE => {
                errors.push(FieldError::new("price", "price is too high"))
            }
            Some(_) => {}
        }

        errors
    }

    pub fn into_sale_info(self, sold_at: DateTime<Utc>) -> SaleInfo {
        SaleInfo {
            seller: self.seller.trim().to_string(),
            buyer_name: self.buyer_name.trim().to_string(),
            price: self.price.unwrap_or_default(),
            contact: self.contact.trim().to_string(),
            sold_at,
            notes: self.notes.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct ReturnForm {
    pub reason: String,
}

impl ReturnForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];
        require_text(&mut errors, "reason", &self.reason);
        errors
    }

    pub fn into_return_info(self, returned_at: DateTime<Utc>) -> ReturnInfo {
        ReturnInfo {
            reason: self.reason.trim().to_string(),
            returned_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct FollowUpForm {
    pub status: FollowUpStatus,
    pub note: String,
}

impl FollowUpForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];
        require_text(&mut errors, "note", &self.note);
        errors
    }
}

impl From<FollowUpForm> for NewFollowUp {
    fn from(val: FollowUpForm) -> Self {
        NewFollowUp {
            status: val.status,
            note: val.note.trim().to_string(),
        }
    }
}
