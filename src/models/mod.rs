//! Entities exchanged with the REST backend, their create requests and the
//! form rules applied before anything is submitted.

pub mod client;
pub mod inventory;
pub mod supplier;
pub mod vehicle;

pub use client::{Client, CreateClientRequest};
pub use inventory::{CreateInventoryRequest, InventoryItem, InventoryStatus, UnitOfMeasure};
pub use supplier::{CreateSupplierRequest, Currency, Supplier, PAYMENT_TERMS};
pub use vehicle::{CreateVehicleRequest, FuelType, TransmissionType, Vehicle};

use crate::errors::FieldErrors;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Form-level validation shared by every create request.
///
/// Blank required text is reported first, then the derived `Validate`
/// rules, then the extra checks. A field keeps the
/// first message it collects.
pub trait FormInput: Validate {
    /// Text fields that must contain something other than whitespace,
    /// as `(field, value, message)`.
    fn required_text(&self) -> Vec<(&'static str, &str, &'static str)> {
        Vec::new()
    }

    /// Rules the field attributes cannot express, such as bounds that
    /// depend on the clock or on another field.
    fn extra_checks(&self, _errors: &mut FieldErrors) {}

    fn validate_form(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value, message) in self.required_text() {
            if value.trim().is_empty() {
                errors.insert(field, message);
            }
        }

        if let Err(derived) = self.validate() {
            for (field, message) in FieldErrors::from(derived).into_inner() {
                errors.insert(field, message);
            }
        }

        self.extra_checks(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub(crate) fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Serde helpers for the loosely typed JSON the backend returns.
pub mod serde_helpers {
    use super::*;
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    /// Ids arrive either as JSON strings or as numbers.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }

    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(deserialize_with = "id")] String);

        let value: Option<Wrapped> = Option::deserialize(deserializer)?;
        Ok(value.map(|Wrapped(id)| id).filter(|id| !id.is_empty()))
    }

    pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).date_naive())
            })
    }

    /// Calendar dates arrive as `YYYY-MM-DD` or as full RFC 3339 timestamps.
    pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    /// Like [`date`], with `null` and `""` read as absent.
    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_date(value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {}", value))),
        }
    }
}

pub(crate) fn ensure_positive(
    value: &Decimal,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(rule(code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::serde_helpers;
    use chrono::NaiveDate;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "serde_helpers::id")]
        id: String,
        #[serde(default, deserialize_with = "serde_helpers::opt_date")]
        due: Option<NaiveDate>,
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let numeric: Probe = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let text: Probe = serde_json::from_str(r#"{"id": "a-1"}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(text.id, "a-1");
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let plain: Probe = serde_json::from_str(r#"{"id": 1, "due": "2024-03-01"}"#).unwrap();
        let stamp: Probe =
            serde_json::from_str(r#"{"id": 1, "due": "2024-03-01T10:00:00Z"}"#).unwrap();
        let blank: Probe = serde_json::from_str(r#"{"id": 1, "due": ""}"#).unwrap();
        let missing: Probe = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(plain.due, expected);
        assert_eq!(stamp.due, expected);
        assert_eq!(blank.due, None);
        assert_eq!(missing.due, None);
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let result = serde_json::from_str::<Probe>(r#"{"id": 1, "due": "next tuesday"}"#);
        assert!(result.is_err());
    }
}
