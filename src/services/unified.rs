//! State of the combined client and vehicle screen.
//!
//! The screen owns one [`UnifiedView`]: the search box and filter, which
//! rows are expanded, and which record is open in the detail panel. Rows
//! are derived on demand from the loaded collections.

use super::filtering::{filter, ListQuery, UnifiedFilter};
use super::relationships::{clients_with_vehicles, ClientWithVehicles};
use super::stats::{distinct_values, unified_stats, UnifiedStats};
use crate::api::EntityStore;
use crate::errors::ServiceError;
use crate::models::{Client, Vehicle};
use crate::repositories::Repository;
use chrono::NaiveDate;
use futures::future::try_join;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Record shown in the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Selection {
    Client(String),
    Vehicle(String),
}

/// One client row as rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow<'a> {
    pub entry: ClientWithVehicles<'a>,
    pub expanded: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedView {
    query: ListQuery<UnifiedFilter>,
    expanded: HashMap<String, bool>,
    selected: Option<Selection>,
}

impl UnifiedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &ListQuery<UnifiedFilter> {
        &self.query
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
    }

    pub fn set_filter(&mut self, filter: UnifiedFilter) {
        self.query.filters = filter;
    }

    /// Flips one row and returns its new state. Other rows are untouched.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        let flag = self.expanded.entry(id.to_owned()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Rows start collapsed.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Opens `selection` in the detail panel, replacing whatever was open.
    pub fn select(&mut self, selection: Selection) {
        self.selected = Some(selection);
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    fn is_selected(&self, client_id: &str) -> bool {
        matches!(&self.selected, Some(Selection::Client(id)) if id == client_id)
    }

    /// Clients matching the current query, with their vehicles, in
    /// collection order.
    pub fn rows<'a>(&self, clients: &'a [Client], vehicles: &'a [Vehicle]) -> Vec<UnifiedRow<'a>> {
        let joined = clients_with_vehicles(clients, vehicles);
        filter(&joined, &self.query)
            .into_iter()
            .map(|entry| UnifiedRow {
                expanded: self.is_expanded(&entry.client.id),
                selected: self.is_selected(&entry.client.id),
                entry: entry.clone(),
            })
            .collect()
    }

    /// Header figures over all clients, independent of the query.
    pub fn stats(&self, clients: &[Client], vehicles: &[Vehicle], today: NaiveDate) -> UnifiedStats {
        unified_stats(&clients_with_vehicles(clients, vehicles), today)
    }

    /// Choices for the city filter.
    pub fn cities(&self, clients: &[Client]) -> Vec<String> {
        distinct_values(clients, |c| c.city.as_str())
    }
}

/// Loads both collections the screen joins. Requests run concurrently and
/// the first failure is returned.
pub async fn load_collections<CS, VS>(
    clients: &Repository<Client, CS>,
    vehicles: &Repository<Vehicle, VS>,
) -> Result<(Vec<Client>, Vec<Vehicle>), ServiceError>
where
    CS: EntityStore<Client> + ?Sized,
    VS: EntityStore<Vehicle> + ?Sized,
{
    try_join(clients.load_all(), vehicles.load_all()).await
}
