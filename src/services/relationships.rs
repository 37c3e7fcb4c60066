//! Foreign-key joins between the loaded collections.
//!
//! Vehicles point at clients through `client_id` and inventory items at
//! suppliers through `supplier_id`. Neither side is enforced, so every join
//! can come up empty; that is reported as [`Lookup::NotFound`], never as an
//! error. Joins are recomputed on each call.

use crate::api::EntityStore;
use crate::errors::ServiceError;
use crate::models::{Client, InventoryItem, Supplier, Vehicle};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Outcome of a foreign-key lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "record", rename_all = "camelCase")]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn by_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::NotFound => Lookup::NotFound,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Supplier fields embedded in inventory views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSummary {
    pub id: String,
    pub company_name: String,
    #[serde(rename = "ICE")]
    pub ice: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
}

impl From<&Supplier> for SupplierSummary {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: supplier.id.clone(),
            company_name: supplier.company_name.clone(),
            ice: supplier.ice.clone(),
            contact_person: supplier.contact_person.clone(),
            phone: supplier.phone.clone(),
            email: supplier.email.clone(),
        }
    }
}

/// Vehicles whose `client_id` is `client_id`, in collection order.
pub fn vehicles_of_client<'a>(client_id: &str, vehicles: &'a [Vehicle]) -> Vec<&'a Vehicle> {
    vehicles.iter().filter(|v| v.client_id == client_id).collect()
}

pub fn client_of_vehicle<'a>(vehicle: &Vehicle, clients: &'a [Client]) -> Lookup<&'a Client> {
    clients.iter().find(|c| c.id == vehicle.client_id).into()
}

pub fn supplier_of<'a>(item: &InventoryItem, suppliers: &'a [Supplier]) -> Lookup<&'a Supplier> {
    suppliers.iter().find(|s| s.id == item.supplier_id).into()
}

pub fn supplier_summary_of(item: &InventoryItem, suppliers: &[Supplier]) -> Lookup<SupplierSummary> {
    supplier_of(item, suppliers).map(SupplierSummary::from)
}

/// Items supplied by `supplier_id`, in collection order.
pub fn items_of_supplier<'a>(supplier_id: &str, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
    items.iter().filter(|i| i.supplier_id == supplier_id).collect()
}

/// Loads the owner of `vehicle` from the backend (`GET /clients/{id}`).
/// A vehicle without an owner id resolves to not found without a request.
#[instrument(skip(store, vehicle), fields(client_id = %vehicle.client_id))]
pub async fn fetch_owner<S>(store: &S, vehicle: &Vehicle) -> Result<Lookup<Client>, ServiceError>
where
    S: EntityStore<Client> + ?Sized,
{
    if vehicle.client_id.trim().is_empty() {
        debug!("Vehicle has no owner id");
        return Ok(Lookup::NotFound);
    }
    Ok(store.get(&vehicle.client_id).await?.into())
}

/// A client with the vehicles that reference it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientWithVehicles<'a> {
    pub client: &'a Client,
    pub vehicles: Vec<&'a Vehicle>,
}

impl<'a> ClientWithVehicles<'a> {
    pub fn total_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn has_vehicles(&self) -> bool {
        !self.vehicles.is_empty()
    }

    pub fn maintenance_due(&self, today: NaiveDate) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.is_maintenance_due(today))
            .count()
    }

    pub fn total_spent(&self) -> Decimal {
        self.client.total_spent
    }
}

/// Joins every client to its vehicles, keeping client order.
pub fn clients_with_vehicles<'a>(
    clients: &'a [Client],
    vehicles: &'a [Vehicle],
) -> Vec<ClientWithVehicles<'a>> {
    clients
        .iter()
        .map(|client| ClientWithVehicles {
            client,
            vehicles: vehicles_of_client(&client.id, vehicles),
        })
        .collect()
}

/// An inventory item with its supplier summary.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryWithSupplier<'a> {
    pub item: &'a InventoryItem,
    pub supplier: Lookup<SupplierSummary>,
}

pub fn inventory_with_suppliers<'a>(
    items: &'a [InventoryItem],
    suppliers: &[Supplier],
) -> Vec<InventoryWithSupplier<'a>> {
    items
        .iter()
        .map(|item| InventoryWithSupplier {
            item,
            supplier: supplier_summary_of(item, suppliers),
        })
        .collect()
}

/// Vehicles whose owner is missing from `clients`, e.g. after the owner
/// was deleted.
pub fn orphaned_vehicles<'a>(vehicles: &'a [Vehicle], clients: &[Client]) -> Vec<&'a Vehicle> {
    let known: HashSet<&str> = clients.iter().map(|c| c.id.as_str()).collect();
    vehicles
        .iter()
        .filter(|v| !known.contains(v.client_id.as_str()))
        .collect()
}

/// Items whose supplier is missing from `suppliers`.
pub fn orphaned_items<'a>(items: &'a [InventoryItem], suppliers: &[Supplier]) -> Vec<&'a InventoryItem> {
    let known: HashSet<&str> = suppliers.iter().map(|s| s.id.as_str()).collect();
    items
        .iter()
        .filter(|i| !known.contains(i.supplier_id.as_str()))
        .collect()
}
