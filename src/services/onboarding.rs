//! Registering a new client, optionally together with a first vehicle.
//!
//! The vehicle references the client through the id the backend assigns,
//! so the two records are created one after the other. Both forms are
//! checked before the first request goes out.

use crate::api::EntityStore;
use crate::errors::{FieldErrors, ServiceError};
use crate::models::{Client, CreateClientRequest, CreateVehicleRequest, FormInput, Vehicle};
use crate::repositories::Repository;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Stands in for the owner id while the vehicle form is checked ahead of
/// the client step.
const PENDING_CLIENT_ID: &str = "pending";

#[derive(Debug, Clone)]
pub enum OnboardingRequest {
    ClientOnly(CreateClientRequest),
    ClientAndVehicle {
        client: CreateClientRequest,
        vehicle: CreateVehicleRequest,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Onboarded {
    pub client: Client,
    pub vehicle: Option<Vehicle>,
}

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("Client form is invalid: {0}")]
    InvalidClient(FieldErrors),
    #[error("Vehicle form is invalid: {0}")]
    InvalidVehicle(FieldErrors),
    #[error("Client could not be created: {0}")]
    ClientStep(#[source] ServiceError),
    /// The client exists; only the vehicle needs to be retried.
    #[error("Client {} was created but the vehicle was not: {source}", .client.id)]
    VehicleStep {
        client: Client,
        #[source]
        source: ServiceError,
    },
}

impl OnboardingError {
    /// The client already stored when the vehicle step failed.
    pub fn created_client(&self) -> Option<&Client> {
        match self {
            Self::VehicleStep { client, .. } => Some(client),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidClient(_) | Self::InvalidVehicle(_) => {
                "Please correct the highlighted fields.".to_string()
            }
            Self::ClientStep(err) => err.user_message(),
            Self::VehicleStep { source, .. } => source.user_message(),
        }
    }
}

fn check_forms(request: &OnboardingRequest) -> Result<(), OnboardingError> {
    let (client, vehicle) = match request {
        OnboardingRequest::ClientOnly(client) => (client, None),
        OnboardingRequest::ClientAndVehicle { client, vehicle } => (client, Some(vehicle)),
    };

    client
        .validate_form()
        .map_err(OnboardingError::InvalidClient)?;

    if let Some(vehicle) = vehicle {
        let mut probe = vehicle.clone();
        probe.client_id = PENDING_CLIENT_ID.to_string();
        probe
            .validate_form()
            .map_err(OnboardingError::InvalidVehicle)?;
    }
    Ok(())
}

/// Creates the client, then the vehicle owned by it.
#[instrument(skip_all)]
pub async fn onboard<CS, VS>(
    clients: &Repository<Client, CS>,
    vehicles: &Repository<Vehicle, VS>,
    request: OnboardingRequest,
) -> Result<Onboarded, OnboardingError>
where
    CS: EntityStore<Client> + ?Sized,
    VS: EntityStore<Vehicle> + ?Sized,
{
    check_forms(&request)?;

    let (client_input, vehicle_input) = match request {
        OnboardingRequest::ClientOnly(client) => (client, None),
        OnboardingRequest::ClientAndVehicle { client, vehicle } => (client, Some(vehicle)),
    };

    let client = clients
        .create(&client_input)
        .await
        .map_err(OnboardingError::ClientStep)?;
    info!(client_id = %client.id, "Client registered");

    let vehicle = match vehicle_input {
        Some(input) => Some(retry_vehicle(vehicles, &client, input).await?),
        None => None,
    };

    Ok(Onboarded { client, vehicle })
}

/// Creates `input` for an already stored `client`. Used for the second
/// step and to retry it after [`OnboardingError::VehicleStep`].
#[instrument(skip_all, fields(client_id = %client.id))]
pub async fn retry_vehicle<VS>(
    vehicles: &Repository<Vehicle, VS>,
    client: &Client,
    mut input: CreateVehicleRequest,
) -> Result<Vehicle, OnboardingError>
where
    VS: EntityStore<Vehicle> + ?Sized,
{
    input.client_id = client.id.clone();
    match vehicles.create(&input).await {
        Ok(vehicle) => {
            info!("Vehicle registered");
            Ok(vehicle)
        }
        Err(ServiceError::ValidationError(fields)) => Err(OnboardingError::InvalidVehicle(fields)),
        Err(source) => {
            warn!(error = %source, "Vehicle step failed after the client was created");
            Err(OnboardingError::VehicleStep {
                client: client.clone(),
                source,
            })
        }
    }
}
