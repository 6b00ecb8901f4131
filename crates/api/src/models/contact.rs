//! Contact domain types and request/response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use rolodex_core::{ContactId, DEFAULT_PAGE_SIZE, Email, PageRequest, Paging, PagingError, UserId};

use super::{empty_as_none, merge};

/// A contact owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Apply a partial update. The email must already have been parsed.
    pub(crate) fn apply(&mut self, update: UpdateContact, email: Option<Email>) {
        merge(&mut self.first_name, update.first_name);
        merge(&mut self.last_name, update.last_name);
        merge(&mut self.phone, update.phone);
        if let Some(email) = email {
            self.email = email;
        }
    }
}

/// Body of `POST /api/contacts`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        email(message = "must be a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub phone: String,
}

/// Body of `PATCH /api/contacts/{contactId}`. Empty or omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContact {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        email(message = "must be a valid email address")
    )]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub phone: Option<String>,
}

/// Query string of `GET /api/contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSearch {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ContactSearch {
    /// Split the query into its filters and a validated page request.
    ///
    /// # Errors
    ///
    /// Returns `PagingError` if `page` or `size` is out of range.
    pub fn into_parts(self) -> Result<(ContactFilter, PageRequest), PagingError> {
        let page = PageRequest::new(
            self.page.unwrap_or(1),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        let filter = ContactFilter {
            name: self.name,
            email: self.email,
            phone: self.phone,
        };
        Ok((filter, page))
    }
}

/// Optional substring filters for contact search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    /// Case-insensitive match on first OR last name.
    pub name: Option<String>,
    /// Case-insensitive match on email.
    pub email: Option<String>,
    /// Case-sensitive match on phone.
    pub phone: Option<String>,
}

/// A contact as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email.into_inner(),
            phone: contact.phone,
        }
    }
}

/// One page of contact search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSearchResult {
    pub contacts: Vec<ContactResponse>,
    pub paging: Paging,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            id: ContactId::new(3),
            user_id: UserId::new(1),
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: Email::parse("ann@example.com").unwrap(),
            phone: "0800".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_contact_validation() {
        let valid = CreateContact {
            first_name: "Ann".to_owned(),
            last_name: "Lee".to_owned(),
            email: "ann@example.com".to_owned(),
            phone: "0800".to_owned(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateContact {
            email: "not-an-email".to_owned(),
            ..valid.clone()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let long_phone = CreateContact {
            phone: "1".repeat(21),
            ..valid
        };
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn test_apply_merges_non_empty_fields() {
        let mut c = contact();
        let update: UpdateContact =
            serde_json::from_str(r#"{"first_name":"","last_name":"Park","phone":""}"#).unwrap();
        c.apply(update, None);

        assert_eq!(c.first_name, "Ann");
        assert_eq!(c.last_name, "Park");
        assert_eq!(c.phone, "0800");
        assert_eq!(c.email.as_str(), "ann@example.com");
    }

    #[test]
    fn test_apply_replaces_email() {
        let mut c = contact();
        c.apply(
            UpdateContact::default(),
            Some(Email::parse("ann.lee@example.com").unwrap()),
        );
        assert_eq!(c.email.as_str(), "ann.lee@example.com");
    }

    #[test]
    fn test_search_defaults() {
        let (filter, page) = ContactSearch::default().into_parts().unwrap();
        assert_eq!(filter, ContactFilter::default());
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_search_rejects_bad_paging() {
        let search = ContactSearch {
            page: Some(0),
            ..ContactSearch::default()
        };
        assert_eq!(search.into_parts().unwrap_err(), PagingError::InvalidPage(0));

        let search = ContactSearch {
            size: Some(101),
            ..ContactSearch::default()
        };
        assert_eq!(search.into_parts().unwrap_err(), PagingError::InvalidSize(101));
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(ContactResponse::from(contact())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "first_name": "Ann",
                "last_name": "Lee",
                "email": "ann@example.com",
                "phone": "0800"
            })
        );
    }
}
