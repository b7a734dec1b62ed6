use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    #[display("image")]
    Image,
    #[display("video")]
    Video,
}

/// Media attached to a bird record. Adding or removing photos never touches
/// the bird itself.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub bird_id: i64,
    pub url: String,
    pub kind: MediaKind,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

/// Sorts photos in display order, oldest first on equal positions.
pub fn sort_photos(photos: &mut [Photo]) {
    photos.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
