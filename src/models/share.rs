use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::consts;

/// Time-limited public token giving read-only access to one bird's listing.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ShareLink {
    pub id: i64,
    pub bird_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whole days left, rounded up. Zero once expired.
    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        if self.is_expired(now) {
            return 0;
        }

        let remaining = self.expires_at - now;
        let days = remaining.num_days();
        if remaining > TimeDelta::days(days) {
            days + 1
        } else {
            days
        }
    }

    pub fn public_path(&self) -> String {
        format!("{}/{}", consts::SHARE_PUBLIC_PATH, self.token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewShareLink {
    pub valid_days: u32,
}
