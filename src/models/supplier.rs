use super::{serde_helpers, FormInput};
use crate::api::Resource;
use crate::errors::FieldErrors;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// Payment terms offered on the supplier form.
pub const PAYMENT_TERMS: [&str; 5] = ["Advance", "Net 15", "Net 30", "Net 45", "Net 60"];

/// Moroccan common company identifier: exactly fifteen digits.
static ICE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{15}$").expect("valid ICE regex"));

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    #[default]
    Mad,
    Usd,
    Eur,
    Gbp,
    Cad,
}

/// A parts supplier. `ice` is the company identifier; `fiscal_id` (IF) and
/// `trade_register` (RC) are optional registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(deserialize_with = "serde_helpers::id")]
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(rename = "ICE", default)]
    pub ice: String,
    #[serde(rename = "IF", default, skip_serializing_if = "Option::is_none")]
    pub fiscal_id: Option<String>,
    #[serde(rename = "RC", default, skip_serializing_if = "Option::is_none")]
    pub trade_register: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Fields submitted when registering a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[serde(default)]
    pub company_name: String,
    #[serde(rename = "ICE", default)]
    pub ice: String,
    #[serde(rename = "IF", default, skip_serializing_if = "Option::is_none")]
    pub fiscal_id: Option<String>,
    #[serde(rename = "RC", default, skip_serializing_if = "Option::is_none")]
    pub trade_register: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub currency: Currency,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CreateSupplierRequest {
    /// An empty form as it opens: Moroccan supplier, Net 30, the given
    /// currency preselected.
    pub fn blank(currency: Currency) -> Self {
        Self {
            company_name: String::new(),
            ice: String::new(),
            fiscal_id: None,
            trade_register: None,
            address: String::new(),
            city: String::new(),
            country: "Morocco".to_string(),
            contact_person: String::new(),
            phone: String::new(),
            email: String::new(),
            website: None,
            payment_terms: PAYMENT_TERMS[2].to_string(),
            currency,
            rating: 3.0,
            notes: String::new(),
            is_active: true,
        }
    }
}

impl FormInput for CreateSupplierRequest {
    fn required_text(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("company_name", self.company_name.as_str(), "Company name is required"),
            ("ice", self.ice.as_str(), "ICE is required"),
            ("address", self.address.as_str(), "Address is required"),
            ("city", self.city.as_str(), "City is required"),
            ("contact_person", self.contact_person.as_str(), "Contact person is required"),
            ("phone", self.phone.as_str(), "Phone is required"),
            ("email", self.email.as_str(), "Email is required"),
        ]
    }

    /// Keyed `ice`, never by the `ICE` wire name.
    fn extra_checks(&self, errors: &mut FieldErrors) {
        if !self.ice.trim().is_empty() && !ICE_PATTERN.is_match(&self.ice) {
            errors.insert("ice", "ICE must be 15 digits");
        }
    }
}

impl Resource for Supplier {
    type Create = CreateSupplierRequest;

    const PATH: &'static str = "suppliers";
    const NAME: &'static str = "Supplier";

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_create(id: String, input: CreateSupplierRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            company_name: input.company_name,
            ice: input.ice,
            fiscal_id: input.fiscal_id,
            trade_register: input.trade_register,
            address: input.address,
            city: input.city,
            country: input.country,
            contact_person: input.contact_person,
            phone: input.phone,
            email: input.email,
            website: input.website,
            payment_terms: input.payment_terms,
            currency: input.currency,
            rating: input.rating,
            notes: input.notes,
            created_at: now,
            updated_at: now,
            is_active: input.is_active,
        }
    }

    fn to_input(&self) -> CreateSupplierRequest {
        CreateSupplierRequest {
            company_name: self.company_name.clone(),
            ice: self.ice.clone(),
            fiscal_id: self.fiscal_id.clone(),
            trade_register: self.trade_register.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            contact_person: self.contact_person.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            payment_terms: self.payment_terms.clone(),
            currency: self.currency,
            rating: self.rating,
            notes: self.notes.clone(),
            is_active: self.is_active,
        }
    }

    fn refresh(&mut self, previous: &Self, now: DateTime<Utc>) {
        self.created_at = previous.created_at;
        self.updated_at = now;
    }
}
