//! Address service.
//!
//! Every operation first resolves the parent contact against the caller, so a
//! foreign or missing contact yields "contact not found" before the request
//! body is looked at.

use sqlx::PgPool;
use validator::Validate;

use rolodex_core::{AddressId, ContactId};

use super::contacts::find_owned;
use crate::db::addresses::{self, NewAddress};
use crate::error::{AppError, Result};
use crate::models::{Address, AddressResponse, CreateAddress, UpdateAddress, User};

/// Message returned whenever an address is missing from its contact.
pub const ADDRESS_NOT_FOUND: &str = "address not found";

/// Address service.
pub struct AddressService<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add an address to one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact is not the user's, then
    /// `AppError::Validation` if a field is out of bounds.
    pub async fn create(
        &self,
        user: &User,
        contact_id: ContactId,
        request: CreateAddress,
    ) -> Result<AddressResponse> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, contact_id, user.id).await?;

        request.validate()?;

        let address = addresses::create(
            &mut *tx,
            contact.id,
            NewAddress {
                street: &request.street,
                city: &request.city,
                province: &request.province,
                country: &request.country,
                postal_code: &request.postal_code,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            contact_id = %contact.id,
            address_id = %address.id,
            "Address created"
        );
        Ok(address.into())
    }

    /// Fetch one address of one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact or the address is missing.
    pub async fn get(
        &self,
        user: &User,
        contact_id: ContactId,
        id: AddressId,
    ) -> Result<AddressResponse> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, contact_id, user.id).await?;
        let address = find_in_contact(&mut *tx, id, contact.id).await?;
        tx.commit().await?;

        Ok(address.into())
    }

    /// List every address of one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact is missing.
    pub async fn list(&self, user: &User, contact_id: ContactId) -> Result<Vec<AddressResponse>> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, contact_id, user.id).await?;
        let found = addresses::find_all(&mut *tx, contact.id).await?;
        tx.commit().await?;

        Ok(found.into_iter().map(AddressResponse::from).collect())
    }

    /// Apply a partial update to an address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact is missing, then
    /// `AppError::Validation` for bad fields, then `AppError::NotFound` if the
    /// address is missing.
    pub async fn update(
        &self,
        user: &User,
        contact_id: ContactId,
        id: AddressId,
        request: UpdateAddress,
    ) -> Result<AddressResponse> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, contact_id, user.id).await?;

        request.validate()?;

        let mut address = find_in_contact(&mut *tx, id, contact.id).await?;
        address.apply(request);
        let address = addresses::update(&mut *tx, &address).await?;
        tx.commit().await?;

        tracing::info!(
            contact_id = %contact.id,
            address_id = %address.id,
            "Address updated"
        );
        Ok(address.into())
    }

    /// Soft-delete an address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact or the address is missing.
    pub async fn delete(&self, user: &User, contact_id: ContactId, id: AddressId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, contact_id, user.id).await?;
        let address = find_in_contact(&mut *tx, id, contact.id).await?;
        addresses::soft_delete(&mut *tx, address.id, contact.id).await?;
        tx.commit().await?;

        tracing::info!(contact_id = %contact.id, address_id = %id, "Address deleted");
        Ok(())
    }
}

async fn find_in_contact(
    conn: &mut sqlx::PgConnection,
    id: AddressId,
    contact_id: ContactId,
) -> Result<Address> {
    addresses::find_by_id(conn, id, contact_id)
        .await?
        .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_owned()))
}
