//! Repair Shop Admin Library
//!
//! Headless core of the repair shop back office: typed clients, vehicles,
//! suppliers and parts inventory, the REST client that loads them, and the
//! filtering, relationship and statistics engines the screens are built on.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod api;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod services;

pub use api::{ApiClient, EntityStore, InMemoryStore, Resource};
pub use errors::{FieldErrors, ServiceError};
pub use repositories::{LoadState, Repository};
