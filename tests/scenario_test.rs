mod common;

use chrono::NaiveDate;
use common::{client_request, vehicle_request};
use repairshop_admin::{
    api::InMemoryStore,
    models::{Client, InventoryStatus, Vehicle},
    repositories::Repository,
    seed,
    services::{
        filtering::{filter, ClientFilters, ListQuery},
        onboarding::{onboard, OnboardingRequest},
        relationships::{client_of_vehicle, orphaned_vehicles, Lookup},
        Selection, UnifiedView,
    },
};
use std::sync::Arc;

fn client_repository(clients: Vec<Client>) -> Repository<Client, InMemoryStore<Client>> {
    Repository::new(Arc::new(InMemoryStore::seeded(clients)))
}

fn vehicle_repository(vehicles: Vec<Vehicle>) -> Repository<Vehicle, InMemoryStore<Vehicle>> {
    Repository::new(Arc::new(InMemoryStore::seeded(vehicles)))
}

#[test]
fn city_filter_keeps_original_relative_order() {
    let clients = seed::clients();
    let cities: Vec<&str> = clients.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(cities, vec!["Casablanca", "Rabat", "Casablanca"]);

    let query = ListQuery::with_filters(ClientFilters {
        city: Some("Casablanca".into()),
    });
    let names: Vec<&str> = filter(&clients, &query)
        .into_iter()
        .map(|c| c.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["Youssef", "Hamza"]);
}

#[test]
fn low_stock_depends_on_status() {
    let mut item = seed::inventory().remove(0);
    item.quantity_in_stock = 5;
    item.min_stock_level = 15;
    item.status = InventoryStatus::Active;
    assert!(item.is_low_stock());

    item.status = InventoryStatus::Discontinued;
    assert!(!item.is_low_stock());
}

#[tokio::test]
async fn deleting_a_client_leaves_its_vehicles_in_place() {
    let clients = client_repository(seed::clients());
    let vehicles = vehicle_repository(seed::vehicles());
    clients.load_all().await.unwrap();
    vehicles.load_all().await.unwrap();

    clients.remove("1").await.unwrap();

    let remaining_clients = clients.records();
    let remaining_vehicles = vehicles.records();
    assert_eq!(remaining_vehicles.len(), 3);
    assert_eq!(client_of_vehicle(&remaining_vehicles[0], &remaining_clients), Lookup::NotFound);

    let orphans: Vec<Option<&str>> = orphaned_vehicles(&remaining_vehicles, &remaining_clients)
        .into_iter()
        .map(|v| v.id.as_deref())
        .collect();
    assert_eq!(orphans, vec![Some("1"), Some("3")]);
}

#[tokio::test]
async fn created_record_shows_up_after_reload() {
    let clients = client_repository(Vec::new());
    clients.load_all().await.unwrap();

    let created = clients.create(&client_request("Ines", "Oujda")).await.unwrap();
    assert!(!created.id.is_empty());

    let reloaded = clients.load_all().await.unwrap();
    assert_eq!(reloaded, vec![created.clone()]);
    assert_eq!(clients.records(), reloaded);
}

#[tokio::test]
async fn onboarded_client_appears_expanded_in_the_unified_view() {
    let clients = client_repository(seed::clients());
    let vehicles = vehicle_repository(seed::vehicles());
    clients.load_all().await.unwrap();
    vehicles.load_all().await.unwrap();

    let done = onboard(
        &clients,
        &vehicles,
        OnboardingRequest::ClientAndVehicle {
            client: client_request("Ines", "Oujda"),
            vehicle: vehicle_request(""),
        },
    )
    .await
    .unwrap();

    let mut view = UnifiedView::new();
    view.set_search_term("ines");
    view.toggle_expand(&done.client.id);
    view.select(Selection::Client(done.client.id.clone()));

    let all_clients = clients.records();
    let all_vehicles = vehicles.records();
    let rows = view.rows(&all_clients, &all_vehicles);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].expanded);
    assert!(rows[0].selected);
    assert_eq!(rows[0].entry.total_vehicles(), 1);

    let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let stats = view.stats(&all_clients, &all_vehicles, today);
    assert_eq!(stats.total_clients, 4);
    assert_eq!(stats.total_vehicles, 4);
    assert_eq!(stats.clients_with_vehicles, 3);
}
