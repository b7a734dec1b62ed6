use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    front::{self, errors::ensure_valid},
    models, repo,
};

#[derive(Debug, Serialize)]
pub struct ShareLinkSchema {
    pub id: i64,
    pub bird_id: i64,
    /// Path of the public page, to be joined to the shop's public host
    pub public_path: String,
    pub expires_at: DateTime<Utc>,
    pub remaining_days: i64,
    pub remaining_label: String,
    pub is_expired: bool,
}

impl ShareLinkSchema {
    pub fn from_link(val: models::share::ShareLink, now: DateTime<Utc>) -> Self {
        let remaining_days = val.remaining_days(now);

        ShareLinkSchema {
            id: val.id,
            bird_id: val.bird_id,
            public_path: val.public_path(),
            expires_at: val.expires_at,
            remaining_days,
            remaining_label: front::utils::remaining_days_label(remaining_days),
            is_expired: val.is_expired(now),
        }
    }
}

pub async fn create_share_link(
    bird_id: i64,
    link_info: front::forms::share::ShareLinkForm,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<ShareLinkSchema> {
    ensure_valid(link_info.validate())?;

    let link = repo.create_share_link(bird_id, &link_info.into()).await?;
    Ok(ShareLinkSchema::from_link(link, now))
}

/// Links of a bird, soonest to expire first.
pub async fn list_share_links(
    bird_id: i64,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<ShareLinkSchema>> {
    let mut links = repo.list_share_links(bird_id).await?;
    links.sort_by_key(|link| link.expires_at);

    Ok(links
        .into_iter()
        .map(|link| ShareLinkSchema::from_link(link, now))
        .collect())
}

/// Replaces every link of the bird with a fresh one.
///
/// The backend revokes the old tokens and issues the new one in the same
/// call, a bird is never left without a link halfway through.
pub async fn regenerate_share_link(
    bird_id: i64,
    link_info: front::forms::share::ShareLinkForm,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<ShareLinkSchema> {
    ensure_valid(link_info.validate())?;

    let link = repo
        .regenerate_share_link(bird_id, &link_info.into())
        .await?;
    Ok(ShareLinkSchema::from_link(link, now))
}

pub async fn delete_share_link(link_id: i64, repo: &repo::ImplAppRepo) -> anyhow::Result<()> {
    repo.delete_share_link(link_id).await
}
