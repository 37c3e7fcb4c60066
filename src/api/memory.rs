use super::{require_id, validate_entity, validate_input, EntityStore, Resource};
use crate::errors::ServiceError;
use crate::models::Vehicle;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Process-local store with the same contract as the REST backend.
///
/// Serves the collections that have no live endpoint yet and backs the
/// seed server. Ids are assigned as UUIDs; insertion order is kept.
#[derive(Debug)]
pub struct InMemoryStore<R> {
    records: Mutex<Vec<R>>,
}

impl<R: Resource> InMemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn seeded(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<R>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.lock().clone()
    }

    fn find(&self, id: &str) -> Option<R> {
        self.lock().iter().find(|r| r.id() == Some(id)).cloned()
    }

    /// Stores `entity` under `id`, replacing the record currently there.
    pub fn replace(&self, id: &str, mut entity: R) -> Result<R, ServiceError> {
        validate_entity(&entity)?;
        let mut records = self.lock();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| ServiceError::NotFound(format!("{} {}", R::NAME, id)))?;
        entity.set_id(id.to_string());
        entity.refresh(slot, Utc::now());
        *slot = entity.clone();
        debug!(resource = R::PATH, id, "Replaced record");
        Ok(entity)
    }

    /// Removes the record with `id`; `false` when there was none.
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.id() != Some(id));
        records.len() != before
    }
}

impl<R: Resource> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore<Vehicle> {
    /// Vehicles owned by a client, in stored order.
    pub fn vehicles_for_client(&self, client_id: &str) -> Vec<Vehicle> {
        self.lock()
            .iter()
            .filter(|v| v.client_id == client_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<R: Resource> EntityStore<R> for InMemoryStore<R> {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.snapshot())
    }

    async fn get(&self, id: &str) -> Result<Option<R>, ServiceError> {
        Ok(self.find(id))
    }

    async fn create(&self, input: &R::Create) -> Result<R, ServiceError> {
        validate_input::<R>(input)?;
        let id = Uuid::new_v4().to_string();
        let record = R::from_create(id.clone(), input.clone(), Utc::now());
        self.lock().push(record.clone());
        info!(resource = R::PATH, id = %id, "Stored new record");
        Ok(record)
    }

    async fn update(&self, entity: &R) -> Result<R, ServiceError> {
        let id = require_id(entity)?.to_string();
        self.replace(&id, entity.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.remove(id) {
            info!(resource = R::PATH, id, "Removed record");
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!("{} {}", R::NAME, id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateSupplierRequest, Currency, Supplier};
    use crate::seed;
    use assert_matches::assert_matches;

    fn supplier_request(name: &str) -> CreateSupplierRequest {
        CreateSupplierRequest {
            company_name: name.into(),
            ice: "111122223333444".into(),
            address: "7 Rue de Fes".into(),
            city: "Tanger".into(),
            contact_person: "Karim".into(),
            phone: "0539000000".into(),
            email: "karim@example.ma".into(),
            ..CreateSupplierRequest::blank(Currency::Mad)
        }
    }

    #[tokio::test]
    async fn create_assigns_uuid_and_appends() {
        let store = InMemoryStore::<Supplier>::seeded(seed::suppliers());
        let before = store.len();
        let created = store.create(&supplier_request("Tanger Pieces")).await.unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), before + 1);
        assert_eq!(all.last().map(|s| s.id.as_str()), Some(created.id.as_str()));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_collection() {
        let store = InMemoryStore::<Supplier>::new();
        let mut request = supplier_request("Bad ICE");
        request.ice = "123".into();
        let err = store.create(&request).await.unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(ref fields) if fields.contains("ice"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let store = InMemoryStore::<Supplier>::new();
        let ghost = Supplier::from_create("ghost".into(), supplier_request("Ghost"), Utc::now());
        assert_matches!(store.update(&ghost).await, Err(ServiceError::NotFound(_)));
        assert_matches!(store.delete("ghost").await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let store = InMemoryStore::<Supplier>::seeded(seed::suppliers());
        let mut second = store.snapshot()[1].clone();
        second.rating = 5.0;
        let updated = store.update(&second).await.unwrap();
        assert_eq!(updated.rating, 5.0);
        assert_eq!(store.snapshot()[1].rating, 5.0);
        assert!(updated.updated_at > updated.created_at);
    }
}
