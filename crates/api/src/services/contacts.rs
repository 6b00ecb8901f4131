//! Contact service: owner-scoped CRUD and paginated search.

use sqlx::PgPool;
use validator::Validate;

use rolodex_core::{ContactId, Email, UserId};

use crate::db::contacts::{self, NewContact};
use crate::error::{AppError, Result};
use crate::models::{
    Contact, ContactResponse, ContactSearch, ContactSearchResult, CreateContact, UpdateContact,
    User,
};

/// Message returned whenever a contact is missing or belongs to someone else.
pub const CONTACT_NOT_FOUND: &str = "contact not found";

/// Contact service.
pub struct ContactService<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a contact owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a field is out of bounds or the email is invalid.
    pub async fn create(&self, user: &User, request: CreateContact) -> Result<ContactResponse> {
        request.validate()?;
        let email = Email::parse(&request.email)?;

        let mut tx = self.pool.begin().await?;
        let contact = contacts::create(
            &mut *tx,
            user.id,
            NewContact {
                first_name: &request.first_name,
                last_name: &request.last_name,
                email: &email,
                phone: &request.phone,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, contact_id = %contact.id, "Contact created");
        Ok(contact.into())
    }

    /// Fetch one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact does not exist or is not owned by `user`.
    pub async fn get(&self, user: &User, id: ContactId) -> Result<ContactResponse> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, id, user.id).await?;
        tx.commit().await?;

        Ok(contact.into())
    }

    /// Search the user's contacts and return one page of results.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `page` or `size` is out of range.
    pub async fn search(&self, user: &User, search: ContactSearch) -> Result<ContactSearchResult> {
        let (filter, page) = search.into_parts()?;

        let mut tx = self.pool.begin().await?;
        let (found, total_item) = contacts::search(&mut *tx, user.id, &filter, page).await?;
        tx.commit().await?;

        Ok(ContactSearchResult {
            contacts: found.into_iter().map(ContactResponse::from).collect(),
            paging: page.paging(total_item),
        })
    }

    /// Apply a partial update to one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a present field is out of bounds.
    /// Returns `AppError::NotFound` if the contact does not exist or is not owned by `user`.
    pub async fn update(
        &self,
        user: &User,
        id: ContactId,
        request: UpdateContact,
    ) -> Result<ContactResponse> {
        request.validate()?;
        let email = request.email.as_deref().map(Email::parse).transpose()?;

        let mut tx = self.pool.begin().await?;
        let mut contact = find_owned(&mut *tx, id, user.id).await?;
        contact.apply(request, email);
        let contact = contacts::update(&mut *tx, &contact).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, contact_id = %contact.id, "Contact updated");
        Ok(contact.into())
    }

    /// Soft-delete one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the contact does not exist or is not owned by `user`.
    pub async fn delete(&self, user: &User, id: ContactId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let contact = find_owned(&mut *tx, id, user.id).await?;
        contacts::soft_delete(&mut *tx, contact.id, user.id).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, contact_id = %id, "Contact deleted");
        Ok(())
    }
}

/// Load a contact scoped to its owner, mapping absence to `NotFound`.
pub(crate) async fn find_owned(
    conn: &mut sqlx::PgConnection,
    id: ContactId,
    user_id: UserId,
) -> Result<Contact> {
    contacts::find_by_id(conn, id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(CONTACT_NOT_FOUND.to_owned()))
}
