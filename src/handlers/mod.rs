//! In-memory REST backend serving the same endpoints the admin client
//! consumes. Meant for local development and integration tests.

pub mod common;
pub mod resources;

use crate::api::InMemoryStore;
use crate::config::AppConfig;
use crate::models::{Client, InventoryItem, Supplier, Vehicle};
use crate::seed;
use axum::{
    extract::{FromRef, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Collections served by the backend.
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<InMemoryStore<Client>>,
    pub vehicles: Arc<InMemoryStore<Vehicle>>,
    pub suppliers: Arc<InMemoryStore<Supplier>>,
    pub inventory: Arc<InMemoryStore<InventoryItem>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Empty client and vehicle collections; suppliers and inventory start
    /// from the fixtures when `config.seed_fixtures` is set.
    pub fn new(config: AppConfig) -> Self {
        let (suppliers, inventory) = if config.seed_fixtures {
            (seed::suppliers(), seed::inventory())
        } else {
            (Vec::new(), Vec::new())
        };
        info!(
            suppliers = suppliers.len(),
            inventory = inventory.len(),
            "Seed backend state initialised"
        );

        Self {
            clients: Arc::new(InMemoryStore::new()),
            vehicles: Arc::new(InMemoryStore::new()),
            suppliers: Arc::new(InMemoryStore::seeded(suppliers)),
            inventory: Arc::new(InMemoryStore::seeded(inventory)),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<InMemoryStore<Client>> {
    fn from_ref(state: &AppState) -> Self {
        state.clients.clone()
    }
}

impl FromRef<AppState> for Arc<InMemoryStore<Vehicle>> {
    fn from_ref(state: &AppState) -> Self {
        state.vehicles.clone()
    }
}

impl FromRef<AppState> for Arc<InMemoryStore<Supplier>> {
    fn from_ref(state: &AppState) -> Self {
        state.suppliers.clone()
    }
}

impl FromRef<AppState> for Arc<InMemoryStore<InventoryItem>> {
    fn from_ref(state: &AppState) -> Self {
        state.inventory.clone()
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "clients": state.clients.len(),
        "vehicles": state.vehicles.len(),
        "suppliers": state.suppliers.len(),
        "inventory": state.inventory.len(),
    }))
}

/// Every endpoint below the API base path.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", resources::client_routes())
        .nest("/vehicules", resources::vehicle_routes())
        .nest("/suppliers", resources::resource_routes::<Supplier>())
        .nest("/inventory", resources::resource_routes::<InventoryItem>())
}

/// Full application: `/health` plus the API under `/api`, with tracing,
/// request logging, CORS and the configured request timeout.
pub fn router(state: AppState) -> Router {
    let cors = if state.config.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };
    let timeout = TimeoutLayer::new(state.config.request_timeout());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(timeout)
        .layer(cors)
        .layer(middleware::from_fn(common::log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
