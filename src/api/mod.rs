//! Backends the repositories talk to.
//!
//! [`Resource`] describes one entity type: where it lives on the REST
//! backend and how a create request becomes a stored record.
//! [`EntityStore`] is the CRUD surface a repository needs; it is
//! implemented over HTTP by [`ApiClient`] and in process by
//! [`InMemoryStore`].

pub mod http;
pub mod memory;

pub use http::ApiClient;
pub use memory::InMemoryStore;

use crate::errors::ServiceError;
use crate::models::FormInput;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Fields the user fills in; server-owned fields are left out.
    type Create: FormInput + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Collection path below the API base URL.
    const PATH: &'static str;
    /// Singular name for logs and not-found messages.
    const NAME: &'static str;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Builds the stored record for a freshly assigned id.
    fn from_create(id: String, input: Self::Create, now: DateTime<Utc>) -> Self;

    /// The editable part of a stored record, used to validate updates.
    fn to_input(&self) -> Self::Create;

    /// Restores server-owned fields from `previous` and recomputes derived
    /// ones after an update.
    fn refresh(&mut self, _previous: &Self, _now: DateTime<Utc>) {}
}

#[async_trait]
pub trait EntityStore<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, ServiceError>;

    /// `Ok(None)` when no record has this id.
    async fn get(&self, id: &str) -> Result<Option<R>, ServiceError>;

    async fn create(&self, input: &R::Create) -> Result<R, ServiceError>;

    async fn update(&self, entity: &R) -> Result<R, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// Id of a record that is about to be updated or deleted.
pub(crate) fn require_id<R: Resource>(entity: &R) -> Result<&str, ServiceError> {
    entity
        .id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServiceError::NotFound(format!("{} without an id", R::NAME)))
}

/// Validates a create request before anything leaves the process.
pub(crate) fn validate_input<R: Resource>(input: &R::Create) -> Result<(), ServiceError> {
    input.validate_form().map_err(ServiceError::ValidationError)
}

/// Validates an edited record the same way its create form would be.
pub(crate) fn validate_entity<R: Resource>(entity: &R) -> Result<(), ServiceError> {
    validate_input::<R>(&entity.to_input())
}
