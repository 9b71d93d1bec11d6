use std::time::Duration;

use async_trait::async_trait;
use common::types::ErrorBody;
use configs::BackendConfig;
use models::{Paginated, PostFeed, Service, ServicePayload, ServiceUpdate};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{BlogApi, BlogFilters, ServicesApi};
use crate::errors::ServiceError;
use crate::metrics::{BACKEND_ERRORS_TOTAL, BACKEND_REQUESTS_TOTAL};
use crate::pagination::ServiceFilters;

/// Single records come wrapped in `{data: ...}` from most endpoints, bare
/// from a few.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

/// reqwest-backed client of the REST backend.
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(cfg: &BackendConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            token: cfg.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let rb = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    /// Send, map non-2xx to `Api`/`NotFound`, return the raw body.
    async fn execute(&self, rb: RequestBuilder, op: &'static str) -> Result<Vec<u8>, ServiceError> {
        BACKEND_REQUESTS_TOTAL.with_label_values(&[op]).inc();
        let resp = rb.send().await.map_err(|e| {
            BACKEND_ERRORS_TOTAL.with_label_values(&[op]).inc();
            warn!(event = "backend_network_error", op, error = %e);
            ServiceError::Network(e.to_string())
        })?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            BACKEND_ERRORS_TOTAL.with_label_values(&[op]).inc();
            ServiceError::Network(e.to_string())
        })?;
        debug!(event = "backend_response", op, status = status.as_u16(), bytes = body.len());
        if status.is_success() {
            return Ok(body.to_vec());
        }

        BACKEND_ERRORS_TOTAL.with_label_values(&[op]).inc();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.text().map(str::to_string))
            .unwrap_or_default();
        warn!(event = "backend_error_status", op, status = status.as_u16(), message = %message);
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(message));
        }
        Err(ServiceError::Api { status: status.as_u16(), message })
    }

    async fn json<T: DeserializeOwned>(&self, rb: RequestBuilder, op: &'static str) -> Result<T, ServiceError> {
        let body = self.execute(rb, op).await?;
        serde_json::from_slice::<T>(&body).map_err(|e| {
            BACKEND_ERRORS_TOTAL.with_label_values(&[op]).inc();
            warn!(event = "backend_parse_error", op, error = %e);
            ServiceError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ServicesApi for HttpApiClient {
    #[instrument(skip(self), fields(page = filters.page, status = %filters.status))]
    async fn list_services(&self, filters: &ServiceFilters) -> Result<Paginated<Service>, ServiceError> {
        let rb = self.request(Method::GET, "/services").query(&filters.query_pairs());
        let page: Paginated<Service> = self.json(rb, "list_services").await?;
        Ok(page.normalized(u64::from(filters.page), u64::from(filters.limit)))
    }

    #[instrument(skip(self))]
    async fn get_service(&self, id: i64) -> Result<Service, ServiceError> {
        let rb = self.request(Method::GET, &format!("/services/{id}"));
        let env: Envelope<Service> = self.json(rb, "get_service").await?;
        Ok(env.into_inner())
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    async fn create_service(&self, payload: &ServicePayload) -> Result<Service, ServiceError> {
        let rb = self.request(Method::POST, "/services").json(payload);
        let env: Envelope<Service> = self.json(rb, "create_service").await?;
        Ok(env.into_inner())
    }

    #[instrument(skip(self, update))]
    async fn update_service(&self, id: i64, update: &ServiceUpdate) -> Result<Service, ServiceError> {
        let rb = self.request(Method::PUT, &format!("/services/{id}")).json(update);
        let env: Envelope<Service> = self.json(rb, "update_service").await?;
        Ok(env.into_inner())
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, id: i64) -> Result<(), ServiceError> {
        let rb = self.request(Method::DELETE, &format!("/services/{id}"));
        self.execute(rb, "delete_service").await?;
        Ok(())
    }
}

#[async_trait]
impl BlogApi for HttpApiClient {
    #[instrument(skip(self), fields(status = %filters.status))]
    async fn list_posts(&self, filters: &BlogFilters) -> Result<PostFeed, ServiceError> {
        let rb = self.request(Method::GET, "/blog").query(&[("status", filters.status.as_str())]);
        self.json(rb, "list_posts").await
    }
}
