//! Address domain types and request/response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use rolodex_core::{AddressId, ContactId};

use super::{empty_as_none, merge};

/// A postal address attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub contact_id: ContactId,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub(crate) fn apply(&mut self, update: UpdateAddress) {
        merge(&mut self.street, update.street);
        merge(&mut self.city, update.city);
        merge(&mut self.province, update.province);
        merge(&mut self.country, update.country);
        merge(&mut self.postal_code, update.postal_code);
    }
}

/// Body of `POST /api/contacts/{contactId}/addresses`.
///
/// Missing fields deserialize as empty strings and fail validation, which the
/// service runs only after the contact is resolved.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAddress {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub province: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub country: String,
    #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
    pub postal_code: String,
}

/// Body of `PATCH /api/contacts/{contactId}/addresses/{addressId}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAddress {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 10, message = "must be between 1 and 10 characters"))]
    pub postal_code: Option<String>,
}

/// An address as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            street: address.street,
            city: address.city,
            province: address.province,
            country: address.country,
            postal_code: address.postal_code,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_address_limits() {
        let valid = CreateAddress {
            street: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            province: "Ontario".to_owned(),
            country: "Canada".to_owned(),
            postal_code: "K1A0B1".to_owned(),
        };
        assert!(valid.validate().is_ok());

        let long_postal = CreateAddress {
            postal_code: "12345678901".to_owned(),
            ..valid.clone()
        };
        let errors = long_postal.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("postal_code"));

        let empty_city = CreateAddress {
            city: String::new(),
            ..valid
        };
        assert!(empty_city.validate().is_err());
    }

    #[test]
    fn test_create_address_missing_fields_fail_validation() {
        let request: CreateAddress = serde_json::from_str(r#"{"street":"1 Main St"}"#).unwrap();
        assert_eq!(request.city, "");

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(!fields.contains_key("street"));
        assert!(fields.contains_key("city"));
        assert!(fields.contains_key("postal_code"));
    }

    #[test]
    fn test_apply_partial_update() {
        let mut address = Address {
            id: AddressId::new(1),
            contact_id: ContactId::new(2),
            street: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            province: "Ontario".to_owned(),
            country: "Canada".to_owned(),
            postal_code: "K1A0B1".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let update: UpdateAddress =
            serde_json::from_str(r#"{"city":"Shelbyville","street":""}"#).unwrap();
        address.apply(update);

        assert_eq!(address.city, "Shelbyville");
        assert_eq!(address.street, "1 Main St");
        assert_eq!(address.postal_code, "K1A0B1");
    }
}
