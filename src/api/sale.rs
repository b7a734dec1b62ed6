use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    api::check_transition,
    front::{
        self,
        errors::{UserError, ensure_valid},
    },
    metric,
    models::{self, bird::BirdStatus},
    repo,
};

/// Sells a bird.
///
/// The form is validated before anything is sent, so a sale without a
/// contact never reaches the backend. One backend call stores the sale
/// info and moves the bird to sold.
///
/// # Errors
/// - [`UserError::FormInputValueError`] for missing seller/buyer/contact/price
/// - [`UserError::InvalidTransition`] when the bird is not available
pub async fn sell_bird(
    bird_id: i64,
    sale_info: front::forms::sale::SellForm,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    ensure_valid(sale_info.validate())?;

    let bird = repo.get_bird(bird_id).await?;
    check_transition(&bird, BirdStatus::Sold)?;

    let bird = repo
        .sell_bird(bird_id, &sale_info.into_sale_info(now))
        .await?;
    metric::incr_bird_action_statds("sell");

    Ok(bird)
}

/// Records a return, only a sold bird can come back.
pub async fn return_bird(
    bird_id: i64,
    return_info: front::forms::sale::ReturnForm,
    now: DateTime<Utc>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<models::bird::Bird> {
    ensure_valid(return_info.validate())?;

    let bird = repo.get_bird(bird_id).await?;
    check_transition(&bird, BirdStatus::Returned)?;

    let bird = repo
        .return_bird(bird_id, &return_info.into_return_info(now))
        .await?;
    metric::incr_bird_action_statds("return");

    Ok(bird)
}

#[derive(Debug, Serialize)]
pub struct FollowUpSchema {
    pub id: i64,
    pub status: models::sale::FollowUpStatus,
    pub status_label: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl From<models::sale::FollowUp> for FollowUpSchema {
    fn from(val: models::sale::FollowUp) -> Self {
        FollowUpSchema {
            id: val.id,
            status: val.status,
            status_label: front::utils::follow_up_status_label(val.status).to_string(),
            note: val.note,
            created_at: val.created_at,
        }
    }
}

async fn ensure_sold(bird_id: i64, repo: &repo::ImplAppRepo) -> anyhow::Result<()> {
    let bird = repo.get_bird(bird_id).await?;
    if !matches!(bird.status, BirdStatus::Sold | BirdStatus::Returned) {
        return Err(UserError::NotSold.into());
    }
    Ok(())
}

/// Post-sale contacts of a sold (or returned) bird, newest first.
pub async fn list_follow_ups(
    bird_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<FollowUpSchema>> {
    ensure_sold(bird_id, repo).await?;

    let mut follow_ups = repo.list_follow_ups(bird_id).await?;
    follow_ups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(follow_ups.into_iter().map(FollowUpSchema::from).collect())
}

pub async fn add_follow_up(
    bird_id: i64,
    follow_up_info: front::forms::sale::FollowUpForm,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<FollowUpSchema> {
    ensure_valid(follow_up_info.validate())?;
    ensure_sold(bird_id, repo).await?;

    let follow_up = repo
        .add_follow_up(bird_id, &follow_up_info.into())
        .await?;

    Ok(follow_up.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::test_utils::{boxed, create_test_bird},
        models::bird::Gender,
        repo::MockAppRepo,
    };
    use chrono::TimeZone;
    use mockall::predicate::*;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn sell_form() -> front::forms::sale::SellForm {
        front::forms::sale::SellForm {
            seller: "Lin".into(),
            buyer_name: "Zhang Wei".into(),
            price: Some(dec!(2800)),
            contact: "138 0000 0000".into(),
            notes: "".into(),
        }
    }

    #[tokio::test]
    async fn test_sell_without_contact_sends_nothing() {
        // any repo call would panic
        let mock_repo = boxed(MockAppRepo::new());

        let form = front::forms::sale::SellForm {
            contact: "  ".into(),
            ..sell_form()
        };

        let err = sell_bird(1, form, now(), &mock_repo).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UserError>(),
            Some(UserError::FormInputValueError(errors)) if errors.has_field("contact")
        ));
    }

    #[tokio::test]
    async fn test_sell_available_bird() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(create_test_bird(id, Gender::Male, BirdStatus::Available)));
        mock_repo
            .expect_sell_bird()
            .withf(|bird_id, sale| {
                *bird_id == 1 && sale.price == dec!(2800) && sale.sold_at == now()
            })
            .times(1)
            .returning(|id, _| Ok(create_test_bird(id, Gender::Male, BirdStatus::Sold)));
        let mock_repo = boxed(mock_repo);

        let bird = sell_bird(1, sell_form(), now(), &mock_repo).await.unwrap();

        assert_eq!(bird.status, BirdStatus::Sold);
    }

    #[tokio::test]
    async fn test_sell_breeding_bird_rejected() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .returning(|id| Ok(create_test_bird(id, Gender::Male, BirdStatus::Breeding)));
        mock_repo.expect_sell_bird().never();
        let mock_repo = boxed(mock_repo);

        let err = sell_bird(1, sell_form(), now(), &mock_repo)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UserError>(),
            Some(UserError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_return_requires_sold_bird() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Available)));
        mock_repo.expect_return_bird().never();
        let mock_repo = boxed(mock_repo);

        let form = front::forms::sale::ReturnForm {
            reason: "feather plucking".into(),
        };

        assert!(return_bird(2, form, now(), &mock_repo).await.is_err());
    }

    #[tokio::test]
    async fn test_follow_ups_only_for_sold_birds() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Available)));
        mock_repo.expect_list_follow_ups().never();
        let mock_repo = boxed(mock_repo);

        let err = list_follow_ups(2, &mock_repo).await.unwrap_err();

        assert_eq!(err.downcast_ref::<UserError>(), Some(&UserError::NotSold));
    }

    #[tokio::test]
    async fn test_list_follow_ups_newest_first() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_bird()
            .returning(|id| Ok(create_test_bird(id, Gender::Female, BirdStatus::Sold)));
        mock_repo
            .expect_list_follow_ups()
            .with(eq(2))
            .times(1)
            .returning(|bird_id| {
                Ok(vec![
                    models::sale::FollowUp {
                        id: 1,
                        bird_id,
                        created_at: now() - chrono::TimeDelta::days(3),
                        ..Default::default()
                    },
                    models::sale::FollowUp {
                        id: 2,
                        bird_id,
                        status: models::sale::FollowUpStatus::Satisfied,
                        created_at: now(),
                        ..Default::default()
                    },
                ])
            });
        let mock_repo = boxed(mock_repo);

        let follow_ups = list_follow_ups(2, &mock_repo).await.unwrap();

        assert_eq!(follow_ups[0].id, 2);
        assert_eq!(follow_ups[0].status_label, "满意");
        assert_eq!(follow_ups[1].status_label, "待回访");
    }
}
