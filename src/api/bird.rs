//! # Bird API Module
//!
//! Bird record management: list and detail views, create/update/delete and
//! the status changes that do not involve a second bird (breeding promotion,
//! release from breeding and relisting). Selling lives in [`super::sale`],
//! pairing in [`super::breeding`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    api::{check_transition, share},
    front::{
        self,
        errors::{UserError, ensure_valid},
        utils::{AgeVariant, Locale},
    },
    metric,
    models::{
        self,
        bird::{BirdStatus, Gender},
    },
    repo,
};

/// Schema for displaying birds in a list format.
///
/// Contains the essentials for list views, with the age, status and price
/// already formatted by the shared display helpers.
#[derive(Debug, Serialize)]
pub struct BirdListSchema {
    /// Backend bird ID
    pub id: i64,
    pub breed: String,
    pub gender: Gender,
    pub gender_label: String,
    pub ring_number: Option<String>,
    /// Status as shown to the user, `paired` derived from the mate
    pub status: BirdStatus,
    pub status_label: String,
    /// Human-readable age
    pub fmt_age: String,
    pub price_text: Option<String>,
    pub mate_id: Option<i64>,
}

impl BirdListSchema {
    /// Converts a bird model for display, ages are computed against `today`.
    pub fn from_bird(val: models::bird::Bird, today: NaiveDate) -> Self {
        let status = val.display_status();

        BirdListSchema {
            id: val.id,
            gender_label: front::utils::gender_label(val.gender).to_string(),
            status_label: front::utils::status_label(status).to_string(),
            fmt_age: front::utils::fmt_age(
                val.birth_date,
                today,
                AgeVariant::Coarse,
                Locale::Zh,
            ),
            price_text: val.price.as_ref().map(front::utils::fmt_price),
            breed: val.breed,
            gender: val.gender,
            ring_number: val.ring_number,
            status,
            mate_id: val.mate_id,
        }
    }
}

/// Retrieves one page of birds in list format.
///
/// # Arguments
/// * `filter` - Status/gender/breed/keyword filter and paging
/// * `today` - Shop date used to format ages
/// * `repo` - Backend repository
///
/// # Errors
/// Returns [`UserError::FormInputValueError`] for an invalid page or page
/// size, before any request is sent.
pub async fn list_birds(
    filter: &front::forms::bird::BirdFilter,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::Page<BirdListSchema>> {
    ensure_valid(filter.validate())?;

    Ok(repo
        .list_birds(filter)
        .await?
        .map(|bird| BirdListSchema::from_bird(bird, today)))
}

/// Complete bird information for the detail view.
#[derive(Debug, Serialize)]
pub struct BirdDetail {
    pub bird: models::bird::Bird,
    /// Status as shown to the user, `paired` derived from the mate
    pub display_status: BirdStatus,
    pub status_label: String,
    pub fmt_age: String,
    pub price_text: Option<String>,
    pub mate: Option<models::bird::Bird>,
    /// Gallery in display order
    pub photos: Vec<models::photo::Photo>,
    pub share_links: Vec<share::ShareLinkSchema>,
}

/// Retrieves a bird with its photos, mate and share links.
///
/// The bird is read first; photos, mate and share links are then fetched
/// concurrently since they do not depend on each other.
///
/// # Arguments
/// * `bird_id` - ID of the bird
/// * `today` - Shop date used to format the age
/// * `now` - Instant used to compute share link remaining days
/// * `repo` - Backend repository
pub async fn get_bird_detail(
    bird_id: i64,
    today: NaiveDate,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<BirdDetail> {
    let _span = logfire::span!("get_bird_detail").entered();

    let bird = repo.get_bird(bird_id).await?;

    let mate = async {
        match bird.mate_id {
            Some(mate_id) => repo.get_bird(mate_id).await.map(Some),
            None => Ok(None),
        }
    };

    let (mut photos, mate, share_links) = futures::try_join!(
        repo.list_photos(bird_id),
        mate,
        repo.list_share_links(bird_id)
    )?;
    models::photo::sort_photos(&mut photos);

    let display_status = bird.display_status();
    Ok(BirdDetail {
        display_status,
        status_label: front::utils::status_label(display_status).to_string(),
        fmt_age: front::utils::fmt_age(bird.birth_date, today, AgeVariant::Exact, Locale::Zh),
        price_text: bird.price.as_ref().map(front::utils::fmt_price),
        mate,
        photos,
        share_links: share_links
            .into_iter()
            .map(|link| share::ShareLinkSchema::from_link(link, now))
            .collect(),
        bird,
    })
}

/// Creates a new bird record.
///
/// # Arguments
/// * `bird_info` - Bird form data
/// * `today` - Shop date, a birth date after it is rejected
/// * `repo` - Backend repository
///
/// # Returns
/// * `anyhow::Result<models::bird::Bird>` - The record as stored by the backend
///
/// # Errors
/// Returns an error if:
/// - The form does not validate (nothing is sent)
/// - The backend rejects the record (e.g. duplicated ring number)
pub async fn create_bird(
    bird_info: front::forms::bird::BirdForm,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    ensure_valid(bird_info.validate(today))?;

    let bird = repo.create_bird(&bird_info.into()).await?;
    metric::incr_bird_action_statds("create");

    Ok(bird)
}

/// Updates an existing bird's information.
///
/// Status and mate are not part of the form, they only change through
/// their dedicated operations.
pub async fn update_bird(
    bird_id: i64,
    bird_info: front::forms::bird::BirdForm,
    today: NaiveDate,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    ensure_valid(bird_info.validate(today))?;

    repo.update_bird(bird_id, &bird_info.into()).await
}

/// Retrieves bird data formatted for the edit form.
pub async fn get_bird_to_edit(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<front::forms::bird::BirdForm> {
    let bird = repo.get_bird(bird_id).await?;
    Ok((&bird).into())
}

/// Deletes a bird record on the backend.
///
/// This operation is irreversible.
pub async fn delete_bird(bird_id: i64, repo: &repo::ImplAppRepo) -> anyhow::Result<()> {
    repo.delete_bird(bird_id).await?;
    metric::incr_bird_action_statds("delete");
    Ok(())
}

/// Promotes an available bird to breeding stock.
///
/// # Errors
/// Returns an error if:
/// - The bird is not available ([`UserError::InvalidTransition`])
/// - The bird's gender is unverified ([`UserError::GenderUnverified`])
/// - The status update fails on the backend
pub async fn set_breeding(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    let bird = repo.get_bird(bird_id).await?;

    check_transition(&bird, BirdStatus::Breeding)?;
    if !bird.gender.is_verified() {
        return Err(UserError::GenderUnverified.into());
    }

    let bird = repo.update_status(bird_id, BirdStatus::Breeding).await?;
    metric::incr_bird_action_statds("set_breeding");

    Ok(bird)
}

/// Puts a returned bird back on sale.
pub async fn relist_bird(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    let bird = repo.get_bird(bird_id).await?;
    check_transition(&bird, BirdStatus::Available)?;

    if bird.status != BirdStatus::Returned {
        return Err(UserError::InvalidTransition {
            from: bird.status,
            to: BirdStatus::Available,
        }
        .into());
    }

    repo.update_status(bird_id, BirdStatus::Available).await
}

/// Takes a bird out of the breeding stock and puts it back on sale.
///
/// Accepts an unmated breeding bird and a parent in incubation. A mated
/// breeding bird (shown as paired) has to be unpaired first.
///
/// # Errors
/// Returns [`UserError::InvalidTransition`] for a bird outside the breeding
/// branch or still paired, nothing is sent in that case.
pub async fn release_from_breeding(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    let bird = repo.get_bird(bird_id).await?;

    let from = bird.display_status();
    if !from.is_breeding_branch() || !from.can_transition_to(&BirdStatus::Available) {
        return Err(UserError::InvalidTransition {
            from,
            to: BirdStatus::Available,
        }
        .into());
    }

    let bird = repo.update_status(bird_id, BirdStatus::Available).await?;
    metric::incr_bird_action_statds("release");

    Ok(bird)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::test_utils::{boxed, create_test_bird, today},
        repo::MockAppRepo,
    };
    use chrono::TimeZone;
    use mockall::predicate::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_set_breeding_from_available() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Male, BirdStatus::Available)));
        mock_repo
            .expect_update_status()
            .with(eq(1), eq(BirdStatus::Breeding))
            .times(1)
            .returning(|id, status| Ok(create_test_bird(id, Gender::Male, status)));
        let mock_repo = boxed(mock_repo);

        let result = set_breeding(1, &mock_repo).await;

        assert!(result.is_ok_and(|bird| bird.status == BirdStatus::Breeding));
    }

    #[tokio::test]
    async fn test_set_breeding_rejects_unverified_gender() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Unverified, BirdStatus::Available)));
        mock_repo.expect_update_status().never();
        let mock_repo = boxed(mock_repo);

        let err = set_breeding(1, &mock_repo).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<UserError>(),
            Some(&UserError::GenderUnverified)
        );
    }

    #[tokio::test]
    async fn test_set_breeding_only_from_available() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Sold)));
        mock_repo.expect_update_status().never();
        let mock_repo = boxed(mock_repo);

        let err = set_breeding(1, &mock_repo).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<UserError>(),
            Some(&UserError::InvalidTransition {
                from: BirdStatus::Sold,
                to: BirdStatus::Breeding
            })
        );
    }

    #[tokio::test]
    async fn test_relist_only_returned_birds() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .with(eq(4))
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Breeding)));
        mock_repo.expect_update_status().never();
        let mock_repo = boxed(mock_repo);

        assert!(relist_bird(4, &mock_repo).await.is_err());

        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Returned)));
        mock_repo
            .expect_update_status()
            .with(eq(4), eq(BirdStatus::Available))
            .times(1)
            .returning(|id, status| Ok(create_test_bird(id, Gender::Female, status)));
        let mock_repo = boxed(mock_repo);

        assert!(relist_bird(4, &mock_repo).await.is_ok());
    }

    #[tokio::test]
    async fn test_release_from_breeding_and_incubation() {
        for status in [BirdStatus::Breeding, BirdStatus::Incubating] {
            let mut mock_repo = MockAppRepo::new();
            mock_repo
                .expect_get_bird()
                .with(eq(6))
                .times(1)
                .returning(move |id| Ok(create_test_bird(id, Gender::Female, status)));
            mock_repo
                .expect_update_status()
                .with(eq(6), eq(BirdStatus::Available))
                .times(1)
                .returning(|id, status| Ok(create_test_bird(id, Gender::Female, status)));
            let mock_repo = boxed(mock_repo);

            let bird = release_from_breeding(6, &mock_repo).await.unwrap();
            assert_eq!(bird.status, BirdStatus::Available);
        }
    }

    #[tokio::test]
    async fn test_release_from_breeding_rejects_paired_and_commerce_birds() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_get_bird().times(1).returning(|id| {
            let mut bird = create_test_bird(id, Gender::Male, BirdStatus::Breeding);
            bird.mate_id = Some(2);
            Ok(bird)
        });
        mock_repo.expect_update_status().never();
        let mock_repo = boxed(mock_repo);

        let err = release_from_breeding(1, &mock_repo).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<UserError>(),
            Some(&UserError::InvalidTransition {
                from: BirdStatus::Paired,
                to: BirdStatus::Available
            })
        );

        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Male, BirdStatus::Returned)));
        mock_repo.expect_update_status().never();
        let mock_repo = boxed(mock_repo);

        assert!(release_from_breeding(1, &mock_repo).await.is_err());
    }

    #[tokio::test]
    async fn test_get_bird_to_edit_keeps_range_price() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .with(eq(7))
            .times(1)
            .returning(|id| {
                let mut bird = create_test_bird(id, Gender::Male, BirdStatus::Available);
                bird.price = Some(models::bird::Price::Range {
                    min: dec!(800),
                    max: dec!(1200),
                });
                bird.health_notes = "vaccinated".into();
                Ok(bird)
            });
        let mock_repo = boxed(mock_repo);

        let form = get_bird_to_edit(7, &mock_repo).await.unwrap();

        assert_eq!(form.price, Some(dec!(800)));
        assert_eq!(form.price_max, Some(dec!(1200)));
        assert!(form.validate(today()).is_empty());

        let new_bird: models::bird::NewBird = form.into();
        assert_eq!(
            new_bird.price,
            Some(models::bird::Price::Range {
                min: dec!(800),
                max: dec!(1200)
            })
        );
        assert_eq!(new_bird.ring_number.as_deref(), Some("CN-0007"));
        assert_eq!(new_bird.health_notes, "vaccinated");
    }

    #[tokio::test]
    async fn test_update_bird_invalid_form_sends_nothing() {
        let mock_repo = boxed(MockAppRepo::new());
        let form = front::forms::bird::BirdForm {
            breed: "Cockatiel".into(),
            birth_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            ..Default::default()
        };

        let err = update_bird(7, form, today(), &mock_repo).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UserError>(),
            Some(UserError::FormInputValueError(errors)) if errors.has_field("birth_date")
        ));
    }

    #[tokio::test]
    async fn test_create_bird_invalid_form_sends_nothing() {
        let mock_repo = boxed(MockAppRepo::new());
        let form = front::forms::bird::BirdForm {
            breed: "".into(),
            ..Default::default()
        };

        let err = create_bird(form, today(), &mock_repo).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UserError>(),
            Some(UserError::FormInputValueError(errors)) if errors.has_field("breed")
        ));
    }

    #[tokio::test]
    async fn test_create_bird_sends_normalized_payload() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_create_bird()
            .withf(|new_bird| {
                new_bird.breed == "African Grey"
                    && new_bird.ring_number.as_deref() == Some("AG-7")
                    && new_bird.price
                        == Some(models::bird::Price::Fixed {
                            amount: dec!(15000),
                        })
            })
            .times(1)
            .returning(|_| Ok(create_test_bird(10, Gender::Unverified, BirdStatus::Available)));
        let mock_repo = boxed(mock_repo);

        let form = front::forms::bird::BirdForm {
            breed: " African Grey ".into(),
            ring_number: Some("ag-7".into()),
            price: Some(dec!(15000)),
            ..Default::default()
        };

        assert!(create_bird(form, today(), &mock_repo).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_birds_formats_rows() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_list_birds().times(1).returning(|_| {
            let mut paired = create_test_bird(1, Gender::Male, BirdStatus::Breeding);
            paired.mate_id = Some(2);
            paired.price = Some(models::bird::Price::Fixed { amount: dec!(1200) });

            Ok(models::Page {
                items: vec![
                    paired,
                    create_test_bird(3, Gender::Unverified, BirdStatus::Available),
                ],
                total: 2,
                page: 1,
                page_size: 20,
            })
        });
        let mock_repo = boxed(mock_repo);

        let page = list_birds(
            &front::forms::bird::BirdFilter::default(),
            today(),
            &mock_repo,
        )
        .await
        .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].status, BirdStatus::Paired);
        assert_eq!(page.items[0].status_label, "已配对");
        assert_eq!(page.items[0].price_text.as_deref(), Some("¥1,200.00"));
        assert_eq!(page.items[0].fmt_age, "1岁4月");
        assert_eq!(page.items[1].gender_label, "未鉴定");
    }

    #[tokio::test]
    async fn test_get_bird_detail_fetches_related_data() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_get_bird().times(2).returning(|id| {
            let mut bird = create_test_bird(id, Gender::Female, BirdStatus::Breeding);
            bird.mate_id = Some(if id == 1 { 2 } else { 1 });
            Ok(bird)
        });
        mock_repo
            .expect_list_photos()
            .with(eq(1))
            .times(1)
            .returning(|bird_id| {
                Ok(vec![
                    models::photo::Photo {
                        id: 8,
                        bird_id,
                        position: 2,
                        ..Default::default()
                    },
                    models::photo::Photo {
                        id: 9,
                        bird_id,
                        position: 1,
                        ..Default::default()
                    },
                ])
            });
        mock_repo
            .expect_list_share_links()
            .with(eq(1))
            .times(1)
            .returning(move |bird_id| {
                Ok(vec![models::share::ShareLink {
                    id: 5,
                    bird_id,
                    token: "tok".into(),
                    expires_at: now + chrono::TimeDelta::days(2),
                    created_at: now,
                }])
            });
        let mock_repo = boxed(mock_repo);

        let detail = get_bird_detail(1, today(), now, &mock_repo).await.unwrap();

        assert_eq!(detail.display_status, BirdStatus::Paired);
        assert_eq!(detail.mate.map(|mate| mate.id), Some(2));
        assert_eq!(
            detail.photos.iter().map(|p| p.id).collect::<Vec<i64>>(),
            vec![9, 8]
        );
        assert_eq!(detail.share_links[0].remaining_days, 2);
    }
}
