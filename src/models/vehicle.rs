use super::{serde_helpers, FormInput};
use crate::api::Resource;
use crate::errors::FieldErrors;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

pub const VIN_LENGTH: usize = 17;
pub const OLDEST_MODEL_YEAR: i32 = 1900;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransmissionType {
    Manual,
    Automatic,
}

/// A vehicle brought in by a client. `id` is absent until the backend
/// has stored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_id"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub horse_power: i32,
    #[serde(default)]
    pub kilometrage: i64,
    pub fuel_type: FuelType,
    pub transmission_type: TransmissionType,
    #[serde(default, deserialize_with = "serde_helpers::id")]
    pub client_id: String,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub next_service_due: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl Vehicle {
    /// Service is due once the next-service date is today or earlier.
    /// Vehicles without a scheduled date are never due.
    pub fn is_maintenance_due(&self, today: NaiveDate) -> bool {
        self.next_service_due.map_or(false, |due| due <= today)
    }

    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// Fields submitted when registering a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    pub year: i32,
    #[serde(default)]
    #[validate(custom = "validate_vin")]
    pub vin: String,
    #[serde(default)]
    pub license_plate: String,
    #[validate(range(min = 1, message = "Horse power must be greater than 0"))]
    pub horse_power: i32,
    #[validate(range(min = 0, message = "Kilometrage cannot be negative"))]
    pub kilometrage: i64,
    pub fuel_type: FuelType,
    pub transmission_type: TransmissionType,
    #[serde(default, deserialize_with = "serde_helpers::id")]
    pub client_id: String,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub next_service_due: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl CreateVehicleRequest {
    /// An empty form for the given owner, preset the way the create form
    /// opens: current model year, gasoline, manual gearbox.
    pub fn for_client(client_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: today.year(),
            vin: String::new(),
            license_plate: String::new(),
            horse_power: 0,
            kilometrage: 0,
            fuel_type: FuelType::Gasoline,
            transmission_type: TransmissionType::Manual,
            client_id: client_id.into(),
            last_service_date: None,
            next_service_due: None,
            notes: String::new(),
        }
    }
}

fn validate_vin(vin: &str) -> Result<(), validator::ValidationError> {
    if vin.chars().count() == VIN_LENGTH {
        Ok(())
    } else {
        Err(super::rule("vin_length", "VIN must be 17 characters"))
    }
}

impl FormInput for CreateVehicleRequest {
    fn required_text(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("make", self.make.as_str(), "Make is required"),
            ("model", self.model.as_str(), "Model is required"),
            ("license_plate", self.license_plate.as_str(), "License plate is required"),
            ("vin", self.vin.as_str(), "VIN is required"),
            ("client_id", self.client_id.as_str(), "Please select a client"),
        ]
    }

    fn extra_checks(&self, errors: &mut FieldErrors) {
        let newest = Utc::now().year() + 1;
        if self.year < OLDEST_MODEL_YEAR || self.year > newest {
            errors.insert("year", "Please enter a valid year");
        }
        if self.last_service_date.is_none() {
            errors.insert("last_service_date", "Last service date is required");
        }
        if self.next_service_due.is_none() {
            errors.insert("next_service_due", "Next service due date is required");
        }
    }
}

impl Resource for Vehicle {
    type Create = CreateVehicleRequest;

    const PATH: &'static str = "vehicules";
    const NAME: &'static str = "Vehicle";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn from_create(id: String, input: CreateVehicleRequest, _now: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            make: input.make,
            model: input.model,
            year: input.year,
            vin: input.vin,
            license_plate: input.license_plate,
            horse_power: input.horse_power,
            kilometrage: input.kilometrage,
            fuel_type: input.fuel_type,
            transmission_type: input.transmission_type,
            client_id: input.client_id,
            last_service_date: input.last_service_date,
            next_service_due: input.next_service_due,
            notes: input.notes,
        }
    }

    fn to_input(&self) -> CreateVehicleRequest {
        CreateVehicleRequest {
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            vin: self.vin.clone(),
            license_plate: self.license_plate.clone(),
            horse_power: self.horse_power,
            kilometrage: self.kilometrage,
            fuel_type: self.fuel_type,
            transmission_type: self.transmission_type,
            client_id: self.client_id.clone(),
            last_service_date: self.last_service_date,
            next_service_due: self.next_service_due,
            notes: self.notes.clone(),
        }
    }
}
