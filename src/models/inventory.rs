use super::{ensure_positive, rule, serde_helpers, FormInput};
use crate::api::Resource;
use crate::errors::FieldErrors;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    #[default]
    Active,
    OutOfStock,
    Discontinued,
}

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnitOfMeasure {
    #[default]
    Piece,
    Liter,
    Set,
    Kg,
    Meter,
    Box,
    Pack,
}

/// A stocked part. `margin` is derived from the two prices and is
/// recomputed whenever the item is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(deserialize_with = "serde_helpers::id")]
    pub id: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "serde_helpers::id")]
    pub supplier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub unit_of_measure: UnitOfMeasure,
    #[serde(default)]
    pub quantity_in_stock: i64,
    #[serde(default)]
    pub min_stock_level: i64,
    #[serde(default)]
    pub purchase_price: Decimal,
    #[serde(default)]
    pub sale_price: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub margin: Decimal,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: InventoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Active items at or below their minimum level need reordering.
    /// Discontinued and out-of-stock items are never flagged.
    pub fn is_low_stock(&self) -> bool {
        self.status == InventoryStatus::Active && self.quantity_in_stock <= self.min_stock_level
    }

    /// Stock valued at purchase price, saturating at the `Decimal` bounds.
    pub fn stock_value(&self) -> Decimal {
        let quantity = Decimal::from(self.quantity_in_stock);
        quantity.checked_mul(self.purchase_price).unwrap_or_else(|| {
            if quantity.is_sign_negative() != self.purchase_price.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
    }

    pub fn computed_margin(&self) -> Decimal {
        self.sale_price - self.purchase_price
    }
}

/// Fields submitted when adding a part to inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "serde_helpers::id")]
    pub supplier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub unit_of_measure: UnitOfMeasure,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_in_stock: i64,
    #[validate(range(min = 0, message = "Minimum stock level cannot be negative"))]
    pub min_stock_level: i64,
    #[validate(custom = "validate_purchase_price")]
    pub purchase_price: Decimal,
    #[validate(custom = "validate_sale_price")]
    pub sale_price: Decimal,
    #[validate(custom = "validate_tax_rate")]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: InventoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn validate_purchase_price(value: &Decimal) -> Result<(), ValidationError> {
    ensure_positive(value, "purchase_price", "Purchase price must be greater than 0")
}

fn validate_sale_price(value: &Decimal) -> Result<(), ValidationError> {
    ensure_positive(value, "sale_price", "Sale price must be greater than 0")
}

fn validate_tax_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE {
        Ok(())
    } else {
        Err(rule("tax_rate", "Tax rate must be between 0 and 1"))
    }
}

impl FormInput for CreateInventoryRequest {
    fn required_text(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("part_number", self.part_number.as_str(), "Part number is required"),
            ("part_name", self.part_name.as_str(), "Part name is required"),
            ("category", self.category.as_str(), "Category is required"),
            ("brand", self.brand.as_str(), "Brand is required"),
            ("supplier_id", self.supplier_id.as_str(), "Supplier is required"),
            ("location", self.location.as_str(), "Location is required"),
        ]
    }

    fn extra_checks(&self, errors: &mut FieldErrors) {
        if self.sale_price <= self.purchase_price {
            errors.insert("sale_price", "Sale price must be greater than purchase price");
        }
    }
}

impl Resource for InventoryItem {
    type Create = CreateInventoryRequest;

    const PATH: &'static str = "inventory";
    const NAME: &'static str = "Inventory item";

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_create(id: String, input: CreateInventoryRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            margin: input.sale_price - input.purchase_price,
            part_number: input.part_number,
            part_name: input.part_name,
            category: input.category,
            brand: input.brand,
            description: input.description,
            supplier_id: input.supplier_id,
            supplier_link: input.supplier_link,
            barcode: input.barcode,
            unit_of_measure: input.unit_of_measure,
            quantity_in_stock: input.quantity_in_stock,
            min_stock_level: input.min_stock_level,
            purchase_price: input.purchase_price,
            sale_price: input.sale_price,
            tax_rate: input.tax_rate,
            location: input.location,
            status: input.status,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn to_input(&self) -> CreateInventoryRequest {
        CreateInventoryRequest {
            part_number: self.part_number.clone(),
            part_name: self.part_name.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            description: self.description.clone(),
            supplier_id: self.supplier_id.clone(),
            supplier_link: self.supplier_link.clone(),
            barcode: self.barcode.clone(),
            unit_of_measure: self.unit_of_measure,
            quantity_in_stock: self.quantity_in_stock,
            min_stock_level: self.min_stock_level,
            purchase_price: self.purchase_price,
            sale_price: self.sale_price,
            tax_rate: self.tax_rate,
            location: self.location.clone(),
            status: self.status,
            image_url: self.image_url.clone(),
        }
    }

    fn refresh(&mut self, previous: &Self, now: DateTime<Utc>) {
        self.margin = self.computed_margin();
        self.created_at = previous.created_at;
        self.updated_at = now;
    }
}
