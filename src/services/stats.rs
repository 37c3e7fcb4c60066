//! Dashboard figures for each screen.
//!
//! Everything here is recomputed from the collection it is given; nothing
//! is cached between calls. Averages over an empty collection are zero.

use super::relationships::{items_of_supplier, ClientWithVehicles};
use crate::models::{
    Client, FuelType, InventoryItem, InventoryStatus, Supplier, TransmissionType, Vehicle,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total: usize,
    pub total_revenue: Decimal,
    pub average_spend: Decimal,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStats {
    pub total: usize,
    pub by_fuel: BTreeMap<FuelType, usize>,
    pub by_transmission: BTreeMap<TransmissionType, usize>,
    pub maintenance_due: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub average_rating: f64,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub active: usize,
    pub out_of_stock: usize,
    pub discontinued: usize,
    pub low_stock: usize,
    pub total_stock_value: Decimal,
    pub categories: Vec<String>,
}

/// Header figures of the combined client and vehicle screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedStats {
    pub total_clients: usize,
    pub total_vehicles: usize,
    pub clients_with_vehicles: usize,
    pub maintenance_due: usize,
    pub average_vehicles_per_client: f64,
    pub total_revenue: Decimal,
}

/// What one supplier provides, for the supplier detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInventorySummary {
    pub item_count: usize,
    pub low_stock: usize,
    pub stock_value: Decimal,
}

/// Sorted distinct non-empty values of `key`, for filter dropdowns.
pub fn distinct_values<T, F>(records: &[T], key: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    records
        .iter()
        .map(key)
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub fn low_stock_items(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|item| item.is_low_stock()).collect()
}

/// Sum that clamps to the `Decimal` bounds instead of overflowing.
fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).unwrap_or(if value.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    })
}

fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        (sum / Decimal::from(count)).round_dp(2)
    }
}

pub fn client_stats(clients: &[Client]) -> ClientStats {
    let total_revenue = saturating_sum(clients.iter().map(|c| c.total_spent));
    ClientStats {
        total: clients.len(),
        total_revenue,
        average_spend: average(total_revenue, clients.len()),
        cities: distinct_values(clients, |c| c.city.as_str()),
    }
}

pub fn vehicle_stats(vehicles: &[Vehicle], today: NaiveDate) -> VehicleStats {
    let mut by_fuel: BTreeMap<FuelType, usize> = FuelType::iter().map(|f| (f, 0)).collect();
    let mut by_transmission: BTreeMap<TransmissionType, usize> =
        TransmissionType::iter().map(|t| (t, 0)).collect();

    for vehicle in vehicles {
        *by_fuel.entry(vehicle.fuel_type).or_default() += 1;
        *by_transmission.entry(vehicle.transmission_type).or_default() += 1;
    }

    VehicleStats {
        total: vehicles.len(),
        by_fuel,
        by_transmission,
        maintenance_due: vehicles
            .iter()
            .filter(|v| v.is_maintenance_due(today))
            .count(),
    }
}

pub fn supplier_stats(suppliers: &[Supplier]) -> SupplierStats {
    let active = suppliers.iter().filter(|s| s.is_active).count();
    let average_rating = if suppliers.is_empty() {
        0.0
    } else {
        suppliers.iter().map(|s| s.rating).sum::<f64>() / suppliers.len() as f64
    };

    SupplierStats {
        total: suppliers.len(),
        active,
        inactive: suppliers.len() - active,
        average_rating,
        cities: distinct_values(suppliers, |s| s.city.as_str()),
    }
}

pub fn inventory_stats(items: &[InventoryItem]) -> InventoryStats {
    let with_status = |status: InventoryStatus| items.iter().filter(|i| i.status == status).count();

    InventoryStats {
        total: items.len(),
        active: with_status(InventoryStatus::Active),
        out_of_stock: with_status(InventoryStatus::OutOfStock),
        discontinued: with_status(InventoryStatus::Discontinued),
        low_stock: low_stock_items(items).len(),
        total_stock_value: saturating_sum(items.iter().map(InventoryItem::stock_value)),
        categories: distinct_values(items, |i| i.category.as_str()),
    }
}

/// Figures over the joined rows. Revenue sums the clients' recorded spend.
pub fn unified_stats(rows: &[ClientWithVehicles<'_>], today: NaiveDate) -> UnifiedStats {
    let total_clients = rows.len();
    let total_vehicles: usize = rows.iter().map(ClientWithVehicles::total_vehicles).sum();
    let average_vehicles_per_client = if total_clients == 0 {
        0.0
    } else {
        total_vehicles as f64 / total_clients as f64
    };

    UnifiedStats {
        total_clients,
        total_vehicles,
        clients_with_vehicles: rows.iter().filter(|r| r.has_vehicles()).count(),
        maintenance_due: rows.iter().map(|r| r.maintenance_due(today)).sum(),
        average_vehicles_per_client,
        total_revenue: saturating_sum(rows.iter().map(ClientWithVehicles::total_spent)),
    }
}

pub fn supplier_inventory_summary(
    supplier_id: &str,
    items: &[InventoryItem],
) -> SupplierInventorySummary {
    let supplied = items_of_supplier(supplier_id, items);
    SupplierInventorySummary {
        item_count: supplied.len(),
        low_stock: supplied.iter().filter(|i| i.is_low_stock()).count(),
        stock_value: saturating_sum(supplied.iter().map(|i| i.stock_value())),
    }
}
