mod common;

use axum::http::StatusCode;
use common::{client_request, to_json, vehicle_request, TestApp};
use repairshop_admin::{api::Resource, models::InventoryItem, seed};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn health_reports_collection_sizes() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["suppliers"], 3);
    assert_eq!(body["inventory"], 4);
    assert_eq!(body["clients"], 0);

    let (_, body) = TestApp::empty().get("/health").await;
    assert_eq!(body["suppliers"], 0);
}

#[tokio::test]
async fn client_lifecycle() {
    let app = TestApp::new();

    let (status, created) = app
        .post("/api/clients", to_json(&client_request("Nadia", "Tanger")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(created["registrationDate"].is_string());

    let (status, fetched) = app.get(&format!("/api/clients/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["city"], "Tanger");

    let mut edited = fetched.clone();
    edited["city"] = json!("Agadir");
    let (status, updated) = app.put(&format!("/api/clients/{}", id), edited).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Agadir");

    let (status, body) = app.delete(&format!("/api/clients/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, listed) = app.get("/api/clients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn invalid_bodies_answer_400_with_field_messages() {
    let app = TestApp::new();
    let mut request = client_request("Nadia", "Tanger");
    request.email = "nadia-at-example".into();
    request.city = " ".into();

    let (status, body) = app.post("/api/clients", to_json(&request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["email"], "Please enter a valid email");
    assert_eq!(body["details"]["city"], "City is required");
    assert_eq!(app.state.clients.len(), 0);

    let (status, body) = app.post("/api/suppliers", json!({"companyName": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_ids_answer_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/suppliers/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    let (status, _) = app.delete("/api/inventory/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let item = to_json(&seed::inventory()[0]);
    let (status, _) = app.put("/api/inventory/missing", item).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vehicles_are_listed_per_client() {
    let app = TestApp::new();
    let (_, owner) = app
        .post("/api/clients", to_json(&client_request("Karim", "Fes")))
        .await;
    let owner_id = owner["id"].as_str().unwrap();

    for _ in 0..2 {
        let (status, _) = app
            .post("/api/vehicules", to_json(&vehicle_request(owner_id)))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = app
        .post("/api/vehicules", to_json(&vehicle_request("someone-else")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, owned) = app
        .get(&format!("/api/vehicules/client/{}", owner_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().map(Vec::len), Some(2));
    assert!(owned
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v["clientId"] == owner_id));

    let (_, all) = app.get("/api/vehicules").await;
    assert_eq!(all.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn inventory_margin_is_recomputed_on_update() {
    let app = TestApp::new();
    let (status, items) = app.get("/api/inventory").await;
    assert_eq!(status, StatusCode::OK);

    let mut oil_filter: InventoryItem = serde_json::from_value(items[1].clone()).unwrap();
    oil_filter.sale_price = dec!(140);
    oil_filter.margin = dec!(0);

    let (status, body) = app
        .put(&format!("/api/inventory/{}", oil_filter.id), to_json(&oil_filter))
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated: InventoryItem = serde_json::from_value(body).unwrap();
    assert_eq!(updated.margin, dec!(55));
    assert!(updated.updated_at >= updated.created_at);

    let mut input = seed::inventory()[3].to_input();
    input.part_number = "SPARK-PLUG-005".into();
    input.sale_price = dec!(300);
    let (status, body) = app.post("/api/inventory", to_json(&input)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: InventoryItem = serde_json::from_value(body).unwrap();
    assert_eq!(created.margin, dec!(120));
    assert_eq!(app.state.inventory.len(), 5);
}

#[tokio::test]
async fn supplier_update_keeps_creation_time() {
    let app = TestApp::new();
    let original = seed::suppliers().remove(0);
    let mut edited = original.clone();
    edited.rating = 5.0;
    edited.created_at = chrono::Utc::now();

    let (status, body) = app.put("/api/suppliers/1", to_json(&edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5.0);
    let stored = app.state.suppliers.snapshot().remove(0);
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.ice, "123456789012345");
}

#[tokio::test]
async fn client_edit_form_keeps_backend_summaries() {
    let app = TestApp::with_clients_and_vehicles();
    let mut form = to_json(&seed::clients()[0].to_input());
    form["id"] = json!("1");
    form["city"] = json!("Agadir");
    assert!(form.get("totalSpent").is_none());

    let (status, updated) = app.put("/api/clients/1", form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Agadir");
    assert_eq!(updated["totalSpent"], 3200.0);
    assert_eq!(updated["vehicleCount"], 2);

    let stored = app.state.clients.snapshot().remove(0);
    assert_eq!(stored.total_spent, dec!(3200.00));
    assert_eq!(stored.city, "Agadir");
}

#[tokio::test]
async fn vehicle_count_follows_the_vehicle_collection() {
    let app = TestApp::with_clients_and_vehicles();

    let (status, clients) = app.get("/api/clients").await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<u64> = clients
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["vehicleCount"].as_u64().unwrap())
        .collect();
    assert_eq!(counts, vec![2, 1, 0]);

    let (status, _) = app.post("/api/vehicules", to_json(&vehicle_request("3"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, hamza) = app.get("/api/clients/3").await;
    assert_eq!(hamza["vehicleCount"], 1);

    let (status, _) = app.delete("/api/vehicules/2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, salma) = app.get("/api/clients/2").await;
    assert_eq!(salma["vehicleCount"], 0);
}

#[tokio::test]
async fn inventory_edit_without_derived_fields_recomputes_them() {
    let app = TestApp::new();
    let (_, items) = app.get("/api/inventory").await;
    let original = items[1].clone();

    let mut form = original.clone();
    let fields = form.as_object_mut().unwrap();
    fields.remove("margin");
    fields.remove("createdAt");
    fields.remove("updatedAt");
    fields.insert("salePrice".into(), json!(140));

    let (status, updated) = app.put("/api/inventory/2", form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["createdAt"], original["createdAt"]);
    let updated: InventoryItem = serde_json::from_value(updated).unwrap();
    assert_eq!(updated.margin, dec!(55));
}
