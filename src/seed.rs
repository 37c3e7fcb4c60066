//! Fixture records used by the seed backend and by tests.

use crate::models::{
    Client, Currency, FuelType, InventoryItem, InventoryStatus, Supplier, TransmissionType,
    UnitOfMeasure, Vehicle,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: "1".into(),
            company_name: "AutoParts Maroc SARL".into(),
            ice: "123456789012345".into(),
            fiscal_id: Some("IF123456789".into()),
            trade_register: Some("RC12345".into()),
            address: "123 Avenue Mohammed V".into(),
            city: "Casablanca".into(),
            country: "Morocco".into(),
            contact_person: "Ahmed Benali".into(),
            phone: "+212 5 22 12 34 56".into(),
            email: "contact@autoparts-maroc.ma".into(),
            website: Some("https://autoparts-maroc.ma".into()),
            payment_terms: "Net 30".into(),
            currency: Currency::Mad,
            rating: 4.5,
            notes: "Reliable supplier for engine parts".into(),
            created_at: at(2024, 1, 15, 10, 0),
            updated_at: at(2024, 1, 15, 10, 0),
            is_active: true,
        },
        Supplier {
            id: "2".into(),
            company_name: "Mecanique Rabat".into(),
            ice: "987654321098765".into(),
            fiscal_id: None,
            trade_register: None,
            address: "456 Rue Hassan II".into(),
            city: "Rabat".into(),
            country: "Morocco".into(),
            contact_person: "Fatima Zahra".into(),
            phone: "+212 5 37 98 76 54".into(),
            email: "info@mecanique-rabat.ma".into(),
            website: None,
            payment_terms: "Advance".into(),
            currency: Currency::Mad,
            rating: 4.2,
            notes: "Specialized in suspension systems".into(),
            created_at: at(2024, 1, 20, 14, 30),
            updated_at: at(2024, 1, 20, 14, 30),
            is_active: true,
        },
        Supplier {
            id: "3".into(),
            company_name: "ElectroAuto Fes".into(),
            ice: "555555555555555".into(),
            fiscal_id: None,
            trade_register: Some("RC67890".into()),
            address: "789 Boulevard Zerktouni".into(),
            city: "Fes".into(),
            country: "Morocco".into(),
            contact_person: "Omar Tazi".into(),
            phone: "+212 5 35 55 44 33".into(),
            email: "omar@electroauto-fes.ma".into(),
            website: None,
            payment_terms: "Net 15".into(),
            currency: Currency::Mad,
            rating: 3.8,
            notes: "Electrical components specialist".into(),
            created_at: at(2024, 2, 1, 9, 15),
            updated_at: at(2024, 2, 1, 9, 15),
            is_active: false,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn part(
    id: &str,
    part_number: &str,
    part_name: &str,
    category: &str,
    brand: &str,
    description: &str,
    supplier_id: &str,
    unit_of_measure: UnitOfMeasure,
    (quantity_in_stock, min_stock_level): (i64, i64),
    (purchase_price, sale_price): (Decimal, Decimal),
    location: &str,
    status: InventoryStatus,
    stamp: DateTime<Utc>,
) -> InventoryItem {
    InventoryItem {
        id: id.into(),
        part_number: part_number.into(),
        part_name: part_name.into(),
        category: category.into(),
        brand: brand.into(),
        description: description.into(),
        supplier_id: supplier_id.into(),
        supplier_link: None,
        barcode: None,
        unit_of_measure,
        quantity_in_stock,
        min_stock_level,
        purchase_price,
        sale_price,
        tax_rate: dec!(0.20),
        margin: sale_price - purchase_price,
        location: location.into(),
        status,
        image_url: None,
        created_at: stamp,
        updated_at: stamp,
    }
}

pub fn inventory() -> Vec<InventoryItem> {
    let mut brake_pads = part(
        "1",
        "BP-FRONT-001",
        "Brake Pad Front",
        "Brakes",
        "Brembo",
        "High-performance front brake pads for passenger vehicles",
        "1",
        UnitOfMeasure::Set,
        (25, 10),
        (dec!(450.00), dec!(650.00)),
        "A-1-B",
        InventoryStatus::Active,
        at(2024, 1, 15, 10, 0),
    );
    brake_pads.supplier_link = Some("https://autoparts-maroc.ma/brake-pads".into());
    brake_pads.barcode = Some("123456789012".into());

    vec![
        brake_pads,
        part(
            "2",
            "FIL-OIL-002",
            "Oil Filter",
            "Engine",
            "Mann-Filter",
            "Standard oil filter for 1.6L engines",
            "1",
            UnitOfMeasure::Piece,
            (50, 20),
            (dec!(85.00), dec!(120.00)),
            "B-2-A",
            InventoryStatus::Active,
            at(2024, 1, 20, 14, 30),
        ),
        part(
            "3",
            "SHOCK-REAR-003",
            "Rear Shock Absorber",
            "Suspension",
            "Bilstein",
            "Heavy-duty rear shock absorber for SUVs",
            "2",
            UnitOfMeasure::Piece,
            (0, 5),
            (dec!(1200.00), dec!(1800.00)),
            "C-3-B",
            InventoryStatus::OutOfStock,
            at(2024, 2, 1, 9, 15),
        ),
        part(
            "4",
            "SPARK-PLUG-004",
            "Spark Plug Set",
            "Engine",
            "NGK",
            "Iridium spark plugs for high-performance engines",
            "1",
            UnitOfMeasure::Set,
            (15, 8),
            (dec!(180.00), dec!(250.00)),
            "A-2-C",
            InventoryStatus::Active,
            at(2024, 2, 5, 11, 20),
        ),
    ]
}

fn client(id: &str, first: &str, last: &str, city: &str, spent: Decimal) -> Client {
    Client {
        id: id.into(),
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@example.ma", first.to_lowercase(), last.to_lowercase()),
        phone_number: format!("+212 6 00 00 00 0{}", id),
        street_address: format!("{} Rue Ibn Batouta", id),
        city: city.into(),
        postal_code: "20000".into(),
        country: "Morocco".into(),
        registration_date: day(2024, 1, 1),
        notes: String::new(),
        vehicle_count: 0,
        total_spent: spent,
        last_visit: None,
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        client("1", "Youssef", "Alaoui", "Casablanca", dec!(3200.00)),
        client("2", "Salma", "Idrissi", "Rabat", dec!(850.50)),
        client("3", "Hamza", "Berrada", "Casablanca", Decimal::ZERO),
    ]
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    client_id: &str,
    make: &str,
    model: &str,
    year: i32,
    vin: &str,
    plate: &str,
    fuel_type: FuelType,
    next_service_due: Option<NaiveDate>,
) -> Vehicle {
    Vehicle {
        id: Some(id.into()),
        make: make.into(),
        model: model.into(),
        year,
        vin: vin.into(),
        license_plate: plate.into(),
        horse_power: 90,
        kilometrage: 60_000,
        fuel_type,
        transmission_type: TransmissionType::Manual,
        client_id: client_id.into(),
        last_service_date: day(2024, 1, 10),
        next_service_due,
        notes: String::new(),
    }
}

pub fn vehicles() -> Vec<Vehicle> {
    vec![
        vehicle(
            "1",
            "1",
            "Dacia",
            "Logan",
            2019,
            "UU1LSDAAH12345678",
            "12345-A-6",
            FuelType::Diesel,
            day(2024, 7, 10),
        ),
        vehicle(
            "2",
            "2",
            "Renault",
            "Clio",
            2021,
            "VF1RJA00A65432109",
            "54321-B-1",
            FuelType::Gasoline,
            day(2025, 1, 15),
        ),
        vehicle(
            "3",
            "1",
            "Toyota",
            "Prius",
            2020,
            "JTDKN3DU0A1234567",
            "67890-D-6",
            FuelType::Hybrid,
            day(2025, 3, 1),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::models::FormInput;

    #[test]
    fn fixtures_pass_their_own_form_rules() {
        for supplier in suppliers() {
            assert!(supplier.to_input().validate_form().is_ok(), "{}", supplier.company_name);
        }
        for item in inventory() {
            assert!(item.to_input().validate_form().is_ok(), "{}", item.part_name);
            assert_eq!(item.margin, item.computed_margin());
        }
        for client in clients() {
            assert!(client.to_input().validate_form().is_ok(), "{}", client.full_name());
        }
        for vehicle in vehicles() {
            assert!(vehicle.to_input().validate_form().is_ok(), "{}", vehicle.display_name());
        }
    }

    #[test]
    fn every_fixture_reference_resolves() {
        let supplier_ids: Vec<String> = suppliers().into_iter().map(|s| s.id).collect();
        assert!(inventory().iter().all(|i| supplier_ids.contains(&i.supplier_id)));

        let client_ids: Vec<String> = clients().into_iter().map(|c| c.id).collect();
        assert!(vehicles().iter().all(|v| client_ids.contains(&v.client_id)));
    }
}
