pub mod rest;
pub mod rest_endpoints;

use crate::{front::forms, models};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Every call the shop backend exposes.
///
/// The backend owns persistence, uniqueness (ring numbers) and cross-record
/// consistency such as the symmetric `mate_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo: Send + Sync {
    async fn list_birds(
        &self,
        filter: &forms::bird::BirdFilter,
    ) -> anyhow::Result<models::Page<models::bird::Bird>>;

    async fn get_bird(&self, bird_id: i64) -> anyhow::Result<models::bird::Bird>;

    async fn create_bird(&self, bird: &models::bird::NewBird)
    -> anyhow::Result<models::bird::Bird>;

    async fn update_bird(
        &self,
        bird_id: i64,
        bird: &models::bird::NewBird,
    ) -> anyhow::Result<models::bird::Bird>;

    async fn delete_bird(&self, bird_id: i64) -> anyhow::Result<()>;

    async fn update_status(
        &self,
        bird_id: i64,
        status: models::bird::BirdStatus,
    ) -> anyhow::Result<models::bird::Bird>;

    /// Opposite-gender candidates the backend considers free for pairing.
    async fn list_eligible_mates(
        &self,
        gender: models::bird::Gender,
    ) -> anyhow::Result<Vec<models::bird::Bird>>;

    async fn pair_birds(&self, request: &models::bird::PairRequest) -> anyhow::Result<()>;

    /// Clears the mate reference on both birds.
    async fn unpair_bird(&self, bird_id: i64) -> anyhow::Result<()>;

    /// Sets both parents to incubating and creates the record in one call.
    async fn start_incubation(
        &self,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord>;

    async fn list_incubations(
        &self,
        status: Option<models::incubation::IncubationStatus>,
    ) -> anyhow::Result<Vec<models::incubation::IncubationRecord>>;

    async fn get_incubation(
        &self,
        incubation_id: i64,
    ) -> anyhow::Result<models::incubation::IncubationRecord>;

    async fn create_incubation(
        &self,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord>;

    async fn update_incubation(
        &self,
        incubation_id: i64,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord>;

    async fn complete_incubation(
        &self,
        incubation_id: i64,
        outcome: &models::incubation::IncubationOutcome,
    ) -> anyhow::Result<models::incubation::IncubationRecord>;

    async fn list_photos(&self, bird_id: i64) -> anyhow::Result<Vec<models::photo::Photo>>;

    async fn add_photo(
        &self,
        bird_id: i64,
        upload: &forms::photo::PhotoUpload,
    ) -> anyhow::Result<models::photo::Photo>;

    async fn delete_photo(&self, bird_id: i64, photo_id: i64) -> anyhow::Result<()>;

    async fn create_share_link(
        &self,
        bird_id: i64,
        link: &models::share::NewShareLink,
    ) -> anyhow::Result<models::share::ShareLink>;

    async fn list_share_links(&self, bird_id: i64)
    -> anyhow::Result<Vec<models::share::ShareLink>>;

    /// Replaces every link of the bird by a new one in one call.
    async fn regenerate_share_link(
        &self,
        bird_id: i64,
        link: &models::share::NewShareLink,
    ) -> anyhow::Result<models::share::ShareLink>;

    async fn delete_share_link(&self, link_id: i64) -> anyhow::Result<()>;

    /// Stores the sale info and moves the bird to sold.
    async fn sell_bird(
        &self,
        bird_id: i64,
        sale: &models::sale::SaleInfo,
    ) -> anyhow::Result<models::bird::Bird>;

    /// Stores the return reason and moves the bird to returned.
    async fn return_bird(
        &self,
        bird_id: i64,
        info: &models::sale::ReturnInfo,
    ) -> anyhow::Result<models::bird::Bird>;

    async fn list_follow_ups(&self, bird_id: i64) -> anyhow::Result<Vec<models::sale::FollowUp>>;

    async fn add_follow_up(
        &self,
        bird_id: i64,
        follow_up: &models::sale::NewFollowUp,
    ) -> anyhow::Result<models::sale::FollowUp>;

    async fn get_sales_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<models::stats::SalesStats>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
