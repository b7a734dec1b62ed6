use serde::{Deserialize, Serialize};

use crate::{consts, front::errors::FieldError, models::share::NewShareLink};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShareLinkForm {
    pub valid_days: u32,
}

impl ShareLinkForm {
    pub fn validate(&self) -> Vec<FieldError> {
        if self.valid_days == 0 || self.valid_days > consts::MAX_SHARE_LINK_DAYS {
            return vec![FieldError::new(
                "valid_days",
                format!(
                    "a share link lasts between 1 and {} days",
                    consts::MAX_SHARE_LINK_DAYS
                ),
            )];
        }
        vec![]
    }
}

impl From<ShareLinkForm> for NewShareLink {
    fn from(val: ShareLinkForm) -> Self {
        NewShareLink {
            valid_days: val.valid_days,
        }
    }
}
