//! Domain models and the JSON bodies exchanged with clients.
//!
//! Domain types (`User`, `Contact`, `Address`) are separate from the database
//! row types in `crate::db`; request types carry `validator` rules and
//! response types only expose public fields.

pub mod address;
pub mod contact;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use address::{Address, AddressResponse, CreateAddress, UpdateAddress};
pub use contact::{
    Contact, ContactFilter, ContactResponse, ContactSearch, ContactSearchResult, CreateContact,
    UpdateContact,
};
pub use user::{LoginUser, RegisterUser, TokenResponse, UpdateUser, User, UserResponse};

/// Deserialize an optional string, treating `""` the same as an absent field.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Overwrite `target` when a replacement value is present.
pub(crate) fn merge(target: &mut String, replacement: Option<String>) {
    if let Some(value) = replacement {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_overwrites_present_values() {
        let mut name = "Alice".to_owned();
        merge(&mut name, None);
        assert_eq!(name, "Alice");

        merge(&mut name, Some("Alicia".to_owned()));
        assert_eq!(name, "Alicia");
    }
}
