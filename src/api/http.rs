use super::{require_id, validate_entity, validate_input, EntityStore, Resource};
use crate::config::AppConfig;
use crate::errors::{ErrorResponse, FieldErrors, ServiceError};
use crate::models::Vehicle;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// REST client for the shop backend.
///
/// Every call is a single attempt. Failures come back as [`ServiceError`]
/// so the caller can offer a manual retry.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ServiceError::Config(format!("HTTP client: {}", e)))?;
        Self::with_client(client, config.api_base_url())
    }

    /// Uses an already configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::Config(format!("invalid API base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "API base URL {} cannot hold paths",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /vehicules/client/{clientId}`
    #[instrument(skip(self))]
    pub async fn vehicles_for_client(&self, client_id: &str) -> Result<Vec<Vehicle>, ServiceError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url(&[Vehicle::PATH, "client", client_id]))
            .send()
            .await?;
        let response = check_status(response, Vehicle::NAME, None).await?;
        let vehicles: Vec<Vehicle> = response.json().await?;
        info!(
            count = vehicles.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded vehicles of client"
        );
        Ok(vehicles)
    }
}

/// Turns a non-success answer into the matching error. `id` is set for
/// calls addressing a single record, where 404 means the record is gone.
async fn check_status(
    response: Response,
    name: &str,
    id: Option<&str>,
) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    warn!(status = status.as_u16(), resource = name, "Backend rejected request");

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(ServiceError::NotFound(format!("{} {}", name, id)));
        }
    }

    if status == StatusCode::BAD_REQUEST {
        if let Some(details) = parsed.as_ref().and_then(|p| p.details.as_ref()) {
            if !details.is_empty() {
                let mut fields = FieldErrors::new();
                for (field, message) in details {
                    fields.insert(field.as_str(), message.as_str());
                }
                return Err(ServiceError::ValidationError(fields));
            }
        }
    }

    let message = match parsed {
        Some(error) => error.message,
        None if !body.trim().is_empty() => body,
        None => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string(),
    };
    Err(ServiceError::ExternalApiError {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ServiceError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}

#[async_trait]
impl<R: Resource> EntityStore<R> for ApiClient {
    #[instrument(skip(self), fields(resource = R::PATH))]
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let started = Instant::now();
        let response = self.client.get(self.url(&[R::PATH])).send().await?;
        let response = check_status(response, R::NAME, None).await?;
        let records: Vec<R> = response.json().await?;
        info!(
            count = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched collection"
        );
        Ok(records)
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    async fn get(&self, id: &str) -> Result<Option<R>, ServiceError> {
        let response = self.client.get(self.url(&[R::PATH, id])).send().await?;
        match check_status(response, R::NAME, Some(id)).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ServiceError::NotFound(_)) => {
                debug!(id, "Record not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, input), fields(resource = R::PATH))]
    async fn create(&self, input: &R::Create) -> Result<R, ServiceError> {
        validate_input::<R>(input)?;
        let response = self
            .client
            .post(self.url(&[R::PATH]))
            .json(input)
            .send()
            .await?;
        let response = check_status(response, R::NAME, None).await?;
        let created: R = read_json(response).await?.ok_or_else(|| {
            ServiceError::SerializationError(format!("empty response creating {}", R::NAME))
        })?;
        info!(id = created.id().unwrap_or_default(), "Created record");
        Ok(created)
    }

    #[instrument(skip(self, entity), fields(resource = R::PATH, id = entity.id().unwrap_or_default()))]
    async fn update(&self, entity: &R) -> Result<R, ServiceError> {
        let id = require_id(entity)?;
        validate_entity(entity)?;
        let response = self
            .client
            .put(self.url(&[R::PATH, id]))
            .json(entity)
            .send()
            .await?;
        let response = check_status(response, R::NAME, Some(id)).await?;
        // Some endpoints answer 204 or an empty body; the submitted record stands.
        let updated = read_json(response).await?.unwrap_or_else(|| entity.clone());
        info!("Updated record");
        Ok(updated)
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let response = self.client.delete(self.url(&[R::PATH, id])).send().await?;
        check_status(response, R::NAME, Some(id)).await?;
        info!(id, "Deleted record");
        Ok(())
    }
}
