//! Free-text search and categorical filters shared by every list screen.
//!
//! A record matches when any of its searchable fields contains the search
//! term (case-insensitive) and every categorical filter accepts it. The
//! result keeps the input order and never contains anything that was not in
//! the input.

use super::relationships::{ClientWithVehicles, InventoryWithSupplier, Lookup};
use crate::models::{Client, FuelType, InventoryItem, InventoryStatus, Supplier, Vehicle};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fields the search box looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Categorical filter over records of type `T`.
pub trait Criteria<T: ?Sized> {
    fn matches(&self, record: &T) -> bool;
}

/// No categorical filtering.
impl<T: ?Sized> Criteria<T> for () {
    fn matches(&self, _record: &T) -> bool {
        true
    }
}

/// Search box and filter selections of one screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F = ()> {
    #[serde(default)]
    pub search_term: String,
    pub filters: F,
}

impl<F: Default> ListQuery<F> {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            filters: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    pub fn with_filters(filters: F) -> Self {
        Self {
            search_term: String::new(),
            filters,
        }
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }
}

/// Case-insensitive substring match of `term` against any of `fields`.
/// The empty term matches everything; the term is used as typed.
pub fn matches_term(fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching `query`, in their original order.
pub fn filter<'a, T, F>(records: &'a [T], query: &ListQuery<F>) -> Vec<&'a T>
where
    T: Searchable,
    F: Criteria<T>,
{
    records
        .iter()
        .filter(|record| {
            matches_term(&record.search_fields(), &query.search_term)
                && query.filters.matches(record)
        })
        .collect()
}

fn same(selected: &Option<String>, value: &str) -> bool {
    selected.as_deref().map_or(true, |wanted| wanted == value)
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone_number.as_str(),
        ]
    }
}

impl Searchable for Vehicle {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.make.as_str(),
            self.model.as_str(),
            self.license_plate.as_str(),
            self.vin.as_str(),
        ]
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.company_name.as_str(),
            self.contact_person.as_str(),
            self.city.as_str(),
            self.ice.as_str(),
        ]
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.part_name.as_str(),
            self.part_number.as_str(),
            self.brand.as_str(),
            self.category.as_str(),
        ]
    }
}

/// Item fields plus the supplier's company name.
impl Searchable for InventoryWithSupplier<'_> {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = self.item.search_fields();
        if let Lookup::Found(supplier) = &self.supplier {
            fields.push(&supplier.company_name);
        }
        fields
    }
}

/// Client fields plus the fields of every owned vehicle, so a client
/// matches when it or any of its vehicles does.
impl Searchable for ClientWithVehicles<'_> {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = self.client.search_fields();
        for vehicle in &self.vehicles {
            fields.extend(vehicle.search_fields());
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilters {
    pub city: Option<String>,
}

impl Criteria<Client> for ClientFilters {
    fn matches(&self, client: &Client) -> bool {
        same(&self.city, &client.city)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    pub fuel_type: Option<FuelType>,
    pub client_id: Option<String>,
}

impl Criteria<Vehicle> for VehicleFilters {
    fn matches(&self, vehicle: &Vehicle) -> bool {
        self.fuel_type.map_or(true, |fuel| vehicle.fuel_type == fuel)
            && same(&self.client_id, &vehicle.client_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFilters {
    pub status: Option<SupplierStatus>,
    pub city: Option<String>,
}

impl Criteria<Supplier> for SupplierFilters {
    fn matches(&self, supplier: &Supplier) -> bool {
        let status_ok = match self.status {
            None => true,
            Some(SupplierStatus::Active) => supplier.is_active,
            Some(SupplierStatus::Inactive) => !supplier.is_active,
        };
        status_ok && same(&self.city, &supplier.city)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilters {
    pub status: Option<InventoryStatus>,
    pub category: Option<String>,
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub low_stock_only: bool,
}

impl Criteria<InventoryItem> for InventoryFilters {
    fn matches(&self, item: &InventoryItem) -> bool {
        self.status.map_or(true, |status| item.status == status)
            && same(&self.category, &item.category)
            && same(&self.supplier_id, &item.supplier_id)
            && (!self.low_stock_only || item.is_low_stock())
    }
}

impl Criteria<InventoryWithSupplier<'_>> for InventoryFilters {
    fn matches(&self, joined: &InventoryWithSupplier<'_>) -> bool {
        Criteria::<InventoryItem>::matches(self, joined.item)
    }
}

/// Filter choices of the combined client and vehicle screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "city", rename_all = "camelCase")]
pub enum UnifiedFilter {
    #[default]
    All,
    /// Clients without any vehicle.
    NoVehicles,
    ByCity(String),
}

impl Criteria<ClientWithVehicles<'_>> for UnifiedFilter {
    fn matches(&self, entry: &ClientWithVehicles<'_>) -> bool {
        match self {
            Self::All => true,
            Self::NoVehicles => !entry.has_vehicles(),
            Self::ByCity(city) => entry.client.city == *city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::services::relationships::{clients_with_vehicles, inventory_with_suppliers};

    fn ids<T, F: Fn(&T) -> &str>(records: &[&T], id: F) -> Vec<String> {
        records.iter().map(|r| id(*r).to_string()).collect()
    }

    #[test]
    fn empty_term_keeps_everything_in_order() {
        let clients = seed::clients();
        let result = filter(&clients, &ListQuery::<()>::default());
        assert_eq!(ids(&result, |c: &Client| c.id.as_str()), vec!["1", "2", "3"]);
    }

    #[test]
    fn term_is_case_insensitive_substring() {
        let clients = seed::clients();
        let result = filter(&clients, &ListQuery::<()>::search("IDRIS"));
        assert_eq!(ids(&result, |c: &Client| c.id.as_str()), vec!["2"]);
    }

    #[test]
    fn term_is_not_trimmed() {
        let clients = seed::clients();
        assert!(filter(&clients, &ListQuery::<()>::search(" Salma")).is_empty());
    }

    #[test]
    fn city_filter_keeps_relative_order() {
        let clients = seed::clients();
        let query = ListQuery::with_filters(ClientFilters {
            city: Some("Casablanca".into()),
        });
        let result = filter(&clients, &query);
        assert_eq!(ids(&result, |c: &Client| c.id.as_str()), vec!["1", "3"]);
    }

    #[test]
    fn filters_and_term_are_anded() {
        let vehicles = seed::vehicles();
        let query = ListQuery::with_filters(VehicleFilters {
            fuel_type: Some(FuelType::Diesel),
            client_id: None,
        })
        .term("toyota");
        assert!(filter(&vehicles, &query).is_empty());

        let query = query.term("logan");
        assert_eq!(filter(&vehicles, &query).len(), 1);
    }

    #[test]
    fn supplier_status_and_ice_search() {
        let suppliers = seed::suppliers();
        let inactive = filter(
            &suppliers,
            &ListQuery::with_filters(SupplierFilters {
                status: Some(SupplierStatus::Inactive),
                city: None,
            }),
        );
        assert_eq!(ids(&inactive, |s: &Supplier| s.company_name.as_str()), vec!["ElectroAuto Fes"]);

        let by_ice = filter(&suppliers, &ListQuery::<()>::search("98765432"));
        assert_eq!(ids(&by_ice, |s: &Supplier| s.id.as_str()), vec!["2"]);
    }

    #[test]
    fn inventory_search_reaches_supplier_name() {
        let items = seed::inventory();
        let suppliers = seed::suppliers();
        let joined = inventory_with_suppliers(&items, &suppliers);

        let result = filter(&joined, &ListQuery::<InventoryFilters>::search("mecanique"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.part_name, "Rear Shock Absorber");

        let engine = filter(
            &joined,
            &ListQuery::with_filters(InventoryFilters {
                status: Some(InventoryStatus::Active),
                category: Some("Engine".into()),
                ..Default::default()
            }),
        );
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn unified_search_matches_through_vehicles() {
        let clients = seed::clients();
        let vehicles = seed::vehicles();
        let rows = clients_with_vehicles(&clients, &vehicles);

        let by_plate = filter(&rows, &ListQuery::<UnifiedFilter>::search("67890-d"));
        assert_eq!(by_plate.len(), 1);
        assert_eq!(by_plate[0].client.id, "1");

        let idle = filter(&rows, &ListQuery::with_filters(UnifiedFilter::NoVehicles));
        assert_eq!(idle.len(), 1);
        assert_eq!(idle[0].client.id, "3");

        let rabat = filter(
            &rows,
            &ListQuery::with_filters(UnifiedFilter::ByCity("Rabat".into())).term("clio"),
        );
        assert_eq!(rabat.len(), 1);
    }

    #[test]
    fn unicode_terms_fold_case() {
        let mut clients = seed::clients();
        clients[0].last_name = "Éloïse".into();
        let result = filter(&clients, &ListQuery::<()>::search("éLOÏ"));
        assert_eq!(result.len(), 1);
    }
}
