// Joins between collections
pub mod relationships;

// List screen derivations
pub mod filtering;
pub mod stats;

// Combined client and vehicle screen
pub mod unified;

// Multi-step flows
pub mod onboarding;

pub use filtering::{filter, ListQuery, Searchable};
pub use relationships::Lookup;
pub use unified::{load_collections, Selection, UnifiedView};
