//! CRUD endpoints shared by every collection of the seed backend.

use super::common::{created_response, json_body, no_content_response, success_response};
use super::AppState;
use crate::api::{EntityStore, InMemoryStore, Resource};
use crate::errors::ServiceError;
use crate::models::{Client, Vehicle};
use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

type Store<R> = State<Arc<InMemoryStore<R>>>;

async fn list_records<R: Resource>(State(store): Store<R>) -> Result<Response, ServiceError> {
    let records = store.list().await?;
    Ok(success_response(records))
}

async fn get_record<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let record = store
        .get(&id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("{} {}", R::NAME, id)))?;
    Ok(success_response(record))
}

async fn create_record<R: Resource>(
    State(store): Store<R>,
    payload: Result<Json<R::Create>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let input = json_body(payload)?;
    let created = store.create(&input).await?;
    Ok(created_response(created))
}

async fn update_record<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let entity = json_body(payload)?;
    let updated = store.replace(&id, entity)?;
    Ok(success_response(updated))
}

async fn delete_record<R: Resource>(
    State(store): Store<R>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    store.delete(&id).await?;
    Ok(no_content_response())
}

/// `GET /`, `POST /`, `GET /:id`, `PUT /:id` and `DELETE /:id` for `R`.
pub fn resource_routes<R>() -> Router<AppState>
where
    R: Resource,
    Arc<InMemoryStore<R>>: FromRef<AppState>,
{
    Router::new()
        .route("/", get(list_records::<R>).post(create_record::<R>))
        .route(
            "/:id",
            get(get_record::<R>)
                .put(update_record::<R>)
                .delete(delete_record::<R>),
        )
}

async fn vehicles_of_client(
    State(store): Store<Vehicle>,
    Path(client_id): Path<String>,
) -> Result<Response, ServiceError> {
    Ok(success_response(store.vehicles_for_client(&client_id)))
}

pub fn vehicle_routes() -> Router<AppState> {
    resource_routes::<Vehicle>().route("/client/:client_id", get(vehicles_of_client))
}

/// `vehicleCount` as served: the number of stored vehicles owned by the client.
fn with_vehicle_count(mut client: Client, vehicles: &InMemoryStore<Vehicle>) -> Client {
    client.vehicle_count = vehicles.vehicles_for_client(&client.id).len() as u32;
    client
}

async fn list_clients(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let clients: Vec<Client> = state
        .clients
        .list()
        .await?
        .into_iter()
        .map(|client| with_vehicle_count(client, &state.vehicles))
        .collect();
    Ok(success_response(clients))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let client = state
        .clients
        .get(&id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("{} {}", Client::NAME, id)))?;
    Ok(success_response(with_vehicle_count(client, &state.vehicles)))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Client>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let entity = json_body(payload)?;
    let updated = state.clients.replace(&id, entity)?;
    Ok(success_response(with_vehicle_count(updated, &state.vehicles)))
}

/// Client CRUD with `vehicleCount` derived from the vehicle collection.
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_record::<Client>))
        .route(
            "/:id",
            get(get_client)
                .put(update_client)
                .delete(delete_record::<Client>),
        )
}
