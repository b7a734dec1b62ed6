use crate::{
    front::{self, errors::ensure_valid},
    models::{self, photo::Photo},
    repo,
};

/// Gallery of a bird in display order.
pub async fn list_photos(bird_id: i64, repo: &repo::ImplAppRepo) -> anyhow::Result<Vec<Photo>> {
    let mut photos = repo.list_photos(bird_id).await?;
    models::photo::sort_photos(&mut photos);
    Ok(photos)
}

/// Uploads a photo or video, the type and size are checked first.
pub async fn add_photo(
    bird_id: i64,
    upload: front::forms::photo::PhotoUpload,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Photo> {
    ensure_valid(upload.validate())?;

    let _span = logfire::span!("add_photo").entered();
    repo.add_photo(bird_id, &upload).await
}

pub async fn delete_photo(
    bird_id: i64,
    photo_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<()> {
    repo.delete_photo(bird_id, photo_id).await
}
