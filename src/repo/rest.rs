//! # Shop backend client
//!
//! [`AppRepo`] implementation talking JSON over HTTP to the shop backend.
//! Non-success responses are turned into [`ServerError`] by status bucket,
//! transport failures into [`ServerError::Network`]. Nothing is retried.

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{AppRepo, rest_endpoints};
use crate::{
    config::AppConfig,
    consts,
    front::{errors::ServerError, forms, loading::LoadingIndicator},
    models,
};

#[derive(Clone)]
pub struct RestAppRepo {
    client: reqwest::Client,
    config: AppConfig,
    loading: LoadingIndicator,
}

impl RestAppRepo {
    pub fn new(config: &AppConfig, loading: LoadingIndicator) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            config: config.clone(),
            loading,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        tracing::debug!(%method, path, %request_id, "backend request");

        let builder = self
            .client
            .request(method, self.config.endpoint(path))
            .header(consts::REQUEST_ID_HEADER, request_id.to_string());

        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> anyhow::Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| ServerError::from_reqwest(&err))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(ServerError::from_status(status, &body).into());
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> anyhow::Result<T> {
        let _loading = self.loading.start();
        let response = self.send(builder).await?;

        Ok(response
            .json::<T>()
            .await
            .map_err(|err| ServerError::from_reqwest(&err))?)
    }

    async fn fetch_empty(&self, builder: RequestBuilder) -> anyhow::Result<()> {
        let _loading = self.loading.start();
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl AppRepo for RestAppRepo {
    async fn list_birds(
        &self,
        filter: &forms::bird::BirdFilter,
    ) -> anyhow::Result<models::Page<models::bird::Bird>> {
        self.fetch_json(
            self.request(Method::GET, rest_endpoints::PATH_BIRDS)
                .query(filter),
        )
        .await
    }

    async fn get_bird(&self, bird_id: i64) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(self.request(Method::GET, &rest_endpoints::bird(bird_id)))
            .await
    }

    async fn create_bird(
        &self,
        bird: &models::bird::NewBird,
    ) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(
            self.request(Method::POST, rest_endpoints::PATH_BIRDS)
                .json(bird),
        )
        .await
    }

    async fn update_bird(
        &self,
        bird_id: i64,
        bird: &models::bird::NewBird,
    ) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(
            self.request(Method::PUT, &rest_endpoints::bird(bird_id))
                .json(bird),
        )
        .await
    }

    async fn delete_bird(&self, bird_id: i64) -> anyhow::Result<()> {
        self.fetch_empty(self.request(Method::DELETE, &rest_endpoints::bird(bird_id)))
            .await
    }

    async fn update_status(
        &self,
        bird_id: i64,
        status: models::bird::BirdStatus,
    ) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(
            self.request(Method::PATCH, &rest_endpoints::bird_status(bird_id))
                .json(&models::bird::StatusUpdate { status }),
        )
        .await
    }

    async fn list_eligible_mates(
        &self,
        gender: models::bird::Gender,
    ) -> anyhow::Result<Vec<models::bird::Bird>> {
        self.fetch_json(
            self.request(Method::GET, rest_endpoints::PATH_ELIGIBLE_MATES)
                .query(&[("gender", gender.to_string())]),
        )
        .await
    }

    async fn pair_birds(&self, request: &models::bird::PairRequest) -> anyhow::Result<()> {
        self.fetch_empty(
            self.request(Method::POST, rest_endpoints::PATH_PAIRINGS)
                .json(request),
        )
        .await
    }

    async fn unpair_bird(&self, bird_id: i64) -> anyhow::Result<()> {
        self.fetch_empty(self.request(Method::DELETE, &rest_endpoints::bird_mate(bird_id)))
            .await
    }

    async fn start_incubation(
        &self,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord> {
        self.fetch_json(
            self.request(Method::POST, rest_endpoints::PATH_START_INCUBATION)
                .json(incubation),
        )
        .await
    }

    async fn list_incubations(
        &self,
        status: Option<models::incubation::IncubationStatus>,
    ) -> anyhow::Result<Vec<models::incubation::IncubationRecord>> {
        let mut builder = self.request(Method::GET, rest_endpoints::PATH_INCUBATIONS);
        if let Some(status) = status {
            builder = builder.query(&[("status", status.to_string())]);
        }

        self.fetch_json(builder).await
    }

    async fn get_incubation(
        &self,
        incubation_id: i64,
    ) -> anyhow::Result<models::incubation::IncubationRecord> {
        self.fetch_json(self.request(Method::GET, &rest_endpoints::incubation(incubation_id)))
            .await
    }

    async fn create_incubation(
        &self,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord> {
        self.fetch_json(
            self.request(Method::POST, rest_endpoints::PATH_INCUBATIONS)
                .json(incubation),
        )
        .await
    }

    async fn update_incubation(
        &self,
        incubation_id: i64,
        incubation: &models::incubation::NewIncubation,
    ) -> anyhow::Result<models::incubation::IncubationRecord> {
        self.fetch_json(
            self.request(Method::PUT, &rest_endpoints::incubation(incubation_id))
                .json(incubation),
        )
        .await
    }

    async fn complete_incubation(
        &self,
        incubation_id: i64,
        outcome: &models::incubation::IncubationOutcome,
    ) -> anyhow::Result<models::incubation::IncubationRecord> {
        self.fetch_json(
            self.request(
                Method::POST,
                &rest_endpoints::incubation_complete(incubation_id),
            )
            .json(outcome),
        )
        .await
    }

    async fn list_photos(&self, bird_id: i64) -> anyhow::Result<Vec<models::photo::Photo>> {
        self.fetch_json(self.request(Method::GET, &rest_endpoints::bird_photos(bird_id)))
            .await
    }

    async fn add_photo(
        &self,
        bird_id: i64,
        upload: &forms::photo::PhotoUpload,
    ) -> anyhow::Result<models::photo::Photo> {
        let file_part = reqwest::multipart::Part::bytes(upload.body.clone())
            .file_name(upload.filename.clone())
            .mime_str(upload.mime_type())?;

        let form = reqwest::multipart::Form::new()
            .text("kind", upload.kind().unwrap_or_default().to_string())
            .part("file", file_part);

        self.fetch_json(
            self.request(Method::POST, &rest_endpoints::bird_photos(bird_id))
                .multipart(form),
        )
        .await
    }

    async fn delete_photo(&self, bird_id: i64, photo_id: i64) -> anyhow::Result<()> {
        self.fetch_empty(self.request(
            Method::DELETE,
            &rest_endpoints::bird_photo(bird_id, photo_id),
        ))
        .await
    }

    async fn create_share_link(
        &self,
        bird_id: i64,
        link: &models::share::NewShareLink,
    ) -> anyhow::Result<models::share::ShareLink> {
        self.fetch_json(
            self.request(Method::POST, &rest_endpoints::bird_share_links(bird_id))
                .json(link),
        )
        .await
    }

    async fn list_share_links(
        &self,
        bird_id: i64,
    ) -> anyhow::Result<Vec<models::share::ShareLink>> {
        self.fetch_json(self.request(Method::GET, &rest_endpoints::bird_share_links(bird_id)))
            .await
    }

    async fn regenerate_share_link(
        &self,
        bird_id: i64,
        link: &models::share::NewShareLink,
    ) -> anyhow::Result<models::share::ShareLink> {
        self.fetch_json(
            self.request(
                Method::POST,
                &rest_endpoints::bird_share_links_regenerate(bird_id),
            )
            .json(link),
        )
        .await
    }

    async fn delete_share_link(&self, link_id: i64) -> anyhow::Result<()> {
        self.fetch_empty(self.request(Method::DELETE, &rest_endpoints::share_link(link_id)))
            .await
    }

    async fn sell_bird(
        &self,
        bird_id: i64,
        sale: &models::sale::SaleInfo,
    ) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(
            self.request(Method::POST, &rest_endpoints::bird_sale(bird_id))
                .json(sale),
        )
        .await
    }

    async fn return_bird(
        &self,
        bird_id: i64,
        info: &models::sale::ReturnInfo,
    ) -> anyhow::Result<models::bird::Bird> {
        self.fetch_json(
            self.request(Method::POST, &rest_endpoints::bird_return(bird_id))
                .json(info),
        )
        .await
    }

    async fn list_follow_ups(&self, bird_id: i64) -> anyhow::Result<Vec<models::sale::FollowUp>> {
        self.fetch_json(self.request(Method::GET, &rest_endpoints::bird_follow_ups(bird_id)))
            .await
    }

    async fn add_follow_up(
        &self,
        bird_id: i64,
        follow_up: &models::sale::NewFollowUp,
    ) -> anyhow::Result<models::sale::FollowUp> {
        self.fetch_json(
            self.request(Method::POST, &rest_endpoints::bird_follow_ups(bird_id))
                .json(follow_up),
        )
        .await
    }

    async fn get_sales_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<models::stats::SalesStats> {
        self.fetch_json(
            self.request(Method::GET, rest_endpoints::PATH_SALES_STATS)
                .query(&[("from", from.to_string()), ("to", to.to_string())]),
        )
        .await
    }
}
