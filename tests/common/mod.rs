#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use repairshop_admin::{
    api::{InMemoryStore, Resource},
    config::AppConfig,
    handlers::{self, AppState},
    models::{CreateClientRequest, CreateVehicleRequest},
    seed,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Seed backend router plus direct access to its stores.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Backend with the fixture suppliers and inventory loaded.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn empty() -> Self {
        let mut cfg = AppConfig::default();
        cfg.seed_fixtures = false;
        Self::with_config(cfg)
    }

    /// Fixture backend that also holds the fixture clients and vehicles.
    pub fn with_clients_and_vehicles() -> Self {
        let mut state = AppState::new(AppConfig::default());
        state.clients = Arc::new(InMemoryStore::seeded(seed::clients()));
        state.vehicles = Arc::new(InMemoryStore::seeded(seed::vehicles()));
        Self::with_state(state)
    }

    fn with_config(cfg: AppConfig) -> Self {
        Self::with_state(AppState::new(cfg))
    }

    fn with_state(state: AppState) -> Self {
        Self {
            router: handlers::router(state.clone()),
            state,
        }
    }

    /// Sends one request and returns the status with the decoded JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

/// A valid client form, distinct from the fixtures by email.
pub fn client_request(first_name: &str, city: &str) -> CreateClientRequest {
    let mut input = seed::clients().remove(0).to_input();
    input.first_name = first_name.to_string();
    input.city = city.to_string();
    input.email = format!("{}@garage.example.ma", first_name.to_lowercase());
    input
}

/// A valid vehicle form owned by `client_id`.
pub fn vehicle_request(client_id: &str) -> CreateVehicleRequest {
    let mut input = seed::vehicles().remove(1).to_input();
    input.client_id = client_id.to_string();
    input
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("serializable test payload")
}
