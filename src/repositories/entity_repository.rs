use super::{CancellationFlag, LoadState};
use crate::api::{validate_entity, validate_input, EntityStore, Resource};
use crate::errors::ServiceError;
use crate::models::{Client, InventoryItem, Supplier, Vehicle};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub type ClientRepository<S> = Repository<Client, S>;
pub type VehicleRepository<S> = Repository<Vehicle, S>;
pub type SupplierRepository<S> = Repository<Supplier, S>;
pub type InventoryRepository<S> = Repository<InventoryItem, S>;

/// Repository for one entity collection.
pub struct Repository<R, S: ?Sized> {
    store: Arc<S>,
    state: Arc<Mutex<LoadState<R>>>,
    cancel: CancellationFlag,
    _marker: PhantomData<fn() -> R>,
}

impl<R, S: ?Sized> Clone for Repository<R, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R, S> Repository<R, S>
where
    R: Resource,
    S: EntityStore<R> + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(LoadState::Loading)),
            cancel: CancellationFlag::new(),
            _marker: PhantomData,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoadState<R>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> LoadState<R> {
        self.lock().clone()
    }

    /// Current records; empty until the first load succeeds.
    pub fn records(&self) -> Vec<R> {
        self.lock().records().to_vec()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Called when the owning screen goes away. Requests already in flight
    /// still complete but their results are discarded.
    pub fn teardown(&self) {
        debug!(resource = R::PATH, "Repository torn down");
        self.cancel.cancel();
    }

    fn ensure_active(&self, operation: &str) -> Result<(), ServiceError> {
        if self.cancel.is_cancelled() {
            debug!(resource = R::PATH, operation, "Dropping result for torn down repository");
            return Err(ServiceError::Cancelled);
        }
        Ok(())
    }

    /// Applies `change` to the collection when it is loaded.
    fn apply(&self, change: impl FnOnce(&mut Vec<R>)) {
        match &mut *self.lock() {
            LoadState::Loaded(records) => change(records),
            _ => debug!(resource = R::PATH, "Collection not loaded; change not applied"),
        }
    }

    /// Fetches the whole collection.
    ///
    /// A failed first load leaves the repository in [`LoadState::Error`]
    /// for the retry screen. A failed reload keeps the records already
    /// shown and only returns the error.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn load_all(&self) -> Result<Vec<R>, ServiceError> {
        self.ensure_active("load")?;
        {
            let mut state = self.lock();
            if state.error().is_some() {
                *state = LoadState::Loading;
            }
        }

        let started = Instant::now();
        let result = self.store.list().await;
        self.ensure_active("load")?;

        match result {
            Ok(records) => {
                info!(
                    count = records.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Collection loaded"
                );
                *self.lock() = LoadState::Loaded(records.clone());
                Ok(records)
            }
            Err(err) => {
                let mut state = self.lock();
                if state.is_loaded() {
                    warn!(error = %err, "Reload failed; keeping current records");
                } else {
                    warn!(error = %err, "Initial load failed");
                    *state = LoadState::Error(err.user_message());
                }
                Err(err)
            }
        }
    }

    /// Single record straight from the backend; the collection is not touched.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn find(&self, id: &str) -> Result<Option<R>, ServiceError> {
        let found = self.store.get(id).await;
        self.ensure_active("find")?;
        found
    }

    #[instrument(skip(self, input), fields(resource = R::PATH))]
    pub async fn create(&self, input: &R::Create) -> Result<R, ServiceError> {
        self.ensure_active("create")?;
        validate_input::<R>(input)?;

        let created = self.store.create(input).await;
        self.ensure_active("create")?;
        let created = created?;

        self.apply(|records| records.push(created.clone()));
        info!(id = created.id().unwrap_or_default(), "Record created");
        Ok(created)
    }

    #[instrument(skip(self, entity), fields(resource = R::PATH, id = entity.id().unwrap_or_default()))]
    pub async fn update(&self, entity: &R) -> Result<R, ServiceError> {
        self.ensure_active("update")?;
        validate_entity(entity)?;

        let updated = self.store.update(entity).await;
        self.ensure_active("update")?;
        let updated = updated?;

        let id = updated.id().or_else(|| entity.id()).map(str::to_owned);
        self.apply(|records| {
            if let Some(slot) = records.iter_mut().find(|r| r.id() == id.as_deref()) {
                *slot = updated.clone();
            }
        });
        info!("Record updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        self.ensure_active("remove")?;

        let removed = self.store.delete(id).await;
        self.ensure_active("remove")?;
        removed?;

        self.apply(|records| records.retain(|r| r.id() != Some(id)));
        info!("Record removed");
        Ok(())
    }
}
