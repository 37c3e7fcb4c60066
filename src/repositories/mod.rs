//! Per-screen collections kept in sync with a backend.
//!
//! A [`Repository`] owns one collection for the lifetime of the screen that
//! created it. The collection changes only after the backend confirmed a
//! mutation, so a failed call leaves it untouched.

pub mod entity_repository;

pub use entity_repository::{
    ClientRepository, InventoryRepository, Repository, SupplierRepository, VehicleRepository,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a screen shows for a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<R> {
    Loading,
    Error(String),
    Loaded(Vec<R>),
}

impl<R> LoadState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The loaded records; empty while loading or after a failed first load.
    pub fn records(&self) -> &[R] {
        match self {
            Self::Loaded(records) => records,
            _ => &[],
        }
    }
}

impl<R> Default for LoadState<R> {
    fn default() -> Self {
        Self::Loading
    }
}

/// Shared flag set when the owning screen goes away. Results that arrive
/// after it is set are dropped.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_empty_unless_loaded() {
        let loading: LoadState<u8> = LoadState::default();
        assert!(loading.is_loading());
        assert!(loading.records().is_empty());

        let failed: LoadState<u8> = LoadState::Error("offline".into());
        assert_eq!(failed.error(), Some("offline"));
        assert!(failed.records().is_empty());

        let loaded = LoadState::Loaded(vec![1u8, 2]);
        assert_eq!(loaded.records(), &[1, 2]);
        assert_eq!(loaded.error(), None);
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        assert!(!handle.is_cancelled());
        flag.cancel();
        assert!(handle.is_cancelled());
    }
}
