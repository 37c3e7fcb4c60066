use super::{serde_helpers, FormInput};
use crate::api::Resource;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A customer of the shop.
///
/// `vehicle_count`, `total_spent` and `last_visit` are summary fields kept
/// by the backend; the client never derives them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(deserialize_with = "serde_helpers::id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub vehicle_count: u32,
    #[serde(default)]
    pub total_spent: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub last_visit: Option<NaiveDate>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields submitted when registering a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "serde_helpers::opt_date")]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl FormInput for CreateClientRequest {
    fn required_text(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("first_name", self.first_name.as_str(), "First name is required"),
            ("last_name", self.last_name.as_str(), "Last name is required"),
            ("email", self.email.as_str(), "Email is required"),
            ("phone_number", self.phone_number.as_str(), "Phone number is required"),
            ("street_address", self.street_address.as_str(), "Street address is required"),
            ("city", self.city.as_str(), "City is required"),
            ("postal_code", self.postal_code.as_str(), "Postal code is required"),
            ("country", self.country.as_str(), "Country is required"),
        ]
    }
}

impl Resource for Client {
    type Create = CreateClientRequest;

    const PATH: &'static str = "clients";
    const NAME: &'static str = "Client";

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_create(id: String, input: CreateClientRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone_number: input.phone_number,
            street_address: input.street_address,
            city: input.city,
            postal_code: input.postal_code,
            country: input.country,
            registration_date: input.registration_date.or_else(|| Some(now.date_naive())),
            notes: input.notes,
            vehicle_count: 0,
            total_spent: Decimal::ZERO,
            last_visit: None,
        }
    }

    fn to_input(&self) -> CreateClientRequest {
        CreateClientRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            street_address: self.street_address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            registration_date: self.registration_date,
            notes: self.notes.clone(),
        }
    }

    /// Summary fields belong to the backend and survive any edit.
    fn refresh(&mut self, previous: &Self, _now: DateTime<Utc>) {
        if self.registration_date.is_none() {
            self.registration_date = previous.registration_date;
        }
        self.vehicle_count = previous.vehicle_count;
        self.total_spent = previous.total_spent;
        self.last_visit = previous.last_visit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_request() -> CreateClientRequest {
        CreateClientRequest {
            first_name: "Youssef".into(),
            last_name: "Alaoui".into(),
            email: "youssef@example.ma".into(),
            phone_number: "+212 6 12 34 56 78".into(),
            street_address: "12 Rue Allal Ben Abdellah".into(),
            city: "Casablanca".into(),
            postal_code: "20000".into(),
            country: "Morocco".into(),
            registration_date: None,
            notes: String::new(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate_form().is_ok());
    }

    #[rstest]
    #[case("", "Email is required")]
    #[case("   ", "Email is required")]
    #[case("not-an-email", "Please enter a valid email")]
    fn email_messages(#[case] email: &str, #[case] expected: &str) {
        let mut request = valid_request();
        request.email = email.into();
        let errors = request.validate_form().unwrap_err();
        assert_eq!(errors.get("email"), Some(expected));
    }

    #[test]
    fn blank_fields_are_all_reported() {
        let errors = CreateClientRequest::default().validate_form().unwrap_err();
        assert_eq!(errors.get("first_name"), Some("First name is required"));
        assert_eq!(errors.get("country"), Some("Country is required"));
        assert_eq!(errors.len(), 8);
    }

    #[test]
    fn create_defaults_registration_date_to_today() {
        let now = Utc::now();
        let client = Client::from_create("c-1".into(), valid_request(), now);
        assert_eq!(client.registration_date, Some(now.date_naive()));
        assert_eq!(client.total_spent, Decimal::ZERO);
        assert_eq!(client.full_name(), "Youssef Alaoui");
    }

    #[test]
    fn refresh_keeps_backend_summaries() {
        let now = Utc::now();
        let mut previous = Client::from_create("c-1".into(), valid_request(), now);
        previous.total_spent = Decimal::new(320050, 2);
        previous.vehicle_count = 2;
        previous.last_visit = NaiveDate::from_ymd_opt(2024, 5, 2);

        let mut edited = Client::from_create("c-1".into(), valid_request(), now);
        edited.city = "Rabat".into();
        edited.registration_date = None;
        edited.refresh(&previous, now);

        assert_eq!(edited.city, "Rabat");
        assert_eq!(edited.total_spent, previous.total_spent);
        assert_eq!(edited.vehicle_count, 2);
        assert_eq!(edited.last_visit, previous.last_visit);
        assert_eq!(edited.registration_date, previous.registration_date);
    }

    #[test]
    fn decodes_backend_payload_with_numeric_id() {
        let json = r#"{
            "id": 7,
            "firstName": "Salma",
            "lastName": "Idrissi",
            "email": "salma@example.ma",
            "phoneNumber": "0600000000",
            "streetAddress": "3 Avenue des FAR",
            "city": "Rabat",
            "postalCode": "10000",
            "country": "Morocco",
            "registrationDate": "2024-01-10T09:00:00Z",
            "totalSpent": 1250.5
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id, "7");
        assert_eq!(client.registration_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(client.total_spent, Decimal::new(12505, 1));
        assert_eq!(client.last_visit, None);
    }
}
