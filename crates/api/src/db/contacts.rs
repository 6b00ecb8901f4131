//! Contact repository.
//!
//! Every query is scoped to the owning user, so a contact id belonging to
//! someone else behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use rolodex_core::{ContactId, Email, PageRequest, UserId};

use super::{RepositoryError, contains_pattern};
use crate::models::{Contact, ContactFilter};

/// Database row for `contacts`.
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: ContactId,
    user_id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Parameters for inserting a contact.
pub struct NewContact<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
    pub phone: &'a str,
}

/// Insert a contact owned by `user_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create(
    conn: &mut PgConnection,
    user_id: UserId,
    contact: NewContact<'_>,
) -> Result<Contact, RepositoryError> {
    let row = sqlx::query_as::<_, ContactRow>(
        r"
        INSERT INTO contacts (user_id, first_name, last_name, email, phone)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, first_name, last_name, email, phone, created_at, updated_at
        ",
    )
    .bind(user_id)
    .bind(contact.first_name)
    .bind(contact.last_name)
    .bind(contact.email)
    .bind(contact.phone)
    .fetch_one(&mut *conn)
    .await?;

    row.try_into()
}

/// Find a live contact by id, scoped to its owner.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut PgConnection,
    id: ContactId,
    user_id: UserId,
) -> Result<Option<Contact>, RepositoryError> {
    let row = sqlx::query_as::<_, ContactRow>(
        r"
        SELECT id, user_id, first_name, last_name, email, phone, created_at, updated_at
        FROM contacts
        WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
        ",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Contact::try_from).transpose()
}

/// Fetch one page of the owner's contacts matching `filter`, ordered by id,
/// together with the total number of matches.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if either query fails.
pub async fn search(
    conn: &mut PgConnection,
    user_id: UserId,
    filter: &ContactFilter,
    page: PageRequest,
) -> Result<(Vec<Contact>, i64), RepositoryError> {
    let name = filter.name.as_deref().map(contains_pattern);
    let email = filter.email.as_deref().map(contains_pattern);
    let phone = filter.phone.as_deref().map(contains_pattern);

    let (total,): (i64,) = sqlx::query_as(
        r"
        SELECT COUNT(*)
        FROM contacts
        WHERE user_id = $1
            AND deleted_at IS NULL
            AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2)
            AND ($3::text IS NULL OR email ILIKE $3)
            AND ($4::text IS NULL OR phone LIKE $4)
        ",
    )
    .bind(user_id)
    .bind(&name)
    .bind(&email)
    .bind(&phone)
    .fetch_one(&mut *conn)
    .await?;

    let rows = sqlx::query_as::<_, ContactRow>(
        r"
        SELECT id, user_id, first_name, last_name, email, phone, created_at, updated_at
        FROM contacts
        WHERE user_id = $1
            AND deleted_at IS NULL
            AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2)
            AND ($3::text IS NULL OR email ILIKE $3)
            AND ($4::text IS NULL OR phone LIKE $4)
        ORDER BY id
        LIMIT $5 OFFSET $6
        ",
    )
    .bind(user_id)
    .bind(&name)
    .bind(&email)
    .bind(&phone)
    .bind(page.size())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    let contacts = rows
        .into_iter()
        .map(Contact::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((contacts, total))
}

/// Persist a contact's editable fields.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the contact was deleted meanwhile.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(conn: &mut PgConnection, contact: &Contact) -> Result<Contact, RepositoryError> {
    let row = sqlx::query_as::<_, ContactRow>(
        r"
        UPDATE contacts
        SET first_name = $3, last_name = $4, email = $5, phone = $6, updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
        RETURNING id, user_id, first_name, last_name, email, phone, created_at, updated_at
        ",
    )
    .bind(contact.id)
    .bind(contact.user_id)
    .bind(&contact.first_name)
    .bind(&contact.last_name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Soft-delete a contact.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no live contact matched.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn soft_delete(
    conn: &mut PgConnection,
    id: ContactId,
    user_id: UserId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE contacts
        SET deleted_at = NOW()
        WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
        ",
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
