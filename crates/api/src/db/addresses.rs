//! Address repository.
//!
//! Addresses are always addressed through their parent contact; ownership of
//! that contact is checked by the caller.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use rolodex_core::{AddressId, ContactId};

use super::RepositoryError;
use crate::models::Address;

/// Database row for `addresses`.
#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    contact_id: ContactId,
    street: String,
    city: String,
    province: String,
    country: String,
    postal_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            contact_id: row.contact_id,
            street: row.street,
            city: row.city,
            province: row.province,
            country: row.country,
            postal_code: row.postal_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Parameters for inserting an address.
pub struct NewAddress<'a> {
    pub street: &'a str,
    pub city: &'a str,
    pub province: &'a str,
    pub country: &'a str,
    pub postal_code: &'a str,
}

/// Insert an address under `contact_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create(
    conn: &mut PgConnection,
    contact_id: ContactId,
    address: NewAddress<'_>,
) -> Result<Address, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(
        r"
        INSERT INTO addresses (contact_id, street, city, province, country, postal_code)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, contact_id, street, city, province, country, postal_code,
                  created_at, updated_at
        ",
    )
    .bind(contact_id)
    .bind(address.street)
    .bind(address.city)
    .bind(address.province)
    .bind(address.country)
    .bind(address.postal_code)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

/// Find a live address by id within its contact.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    conn: &mut PgConnection,
    id: AddressId,
    contact_id: ContactId,
) -> Result<Option<Address>, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(
        r"
        SELECT id, contact_id, street, city, province, country, postal_code,
               created_at, updated_at
        FROM addresses
        WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
        ",
    )
    .bind(id)
    .bind(contact_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Address::from))
}

/// List every live address of a contact, ordered by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_all(
    conn: &mut PgConnection,
    contact_id: ContactId,
) -> Result<Vec<Address>, RepositoryError> {
    let rows = sqlx::query_as::<_, AddressRow>(
        r"
        SELECT id, contact_id, street, city, province, country, postal_code,
               created_at, updated_at
        FROM addresses
        WHERE contact_id = $1 AND deleted_at IS NULL
        ORDER BY id
        ",
    )
    .bind(contact_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Address::from).collect())
}

/// Persist an address's editable fields.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the address was deleted meanwhile.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(conn: &mut PgConnection, address: &Address) -> Result<Address, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(
        r"
        UPDATE addresses
        SET street = $3, city = $4, province = $5, country = $6, postal_code = $7,
            updated_at = NOW()
        WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
        RETURNING id, contact_id, street, city, province, country, postal_code,
                  created_at, updated_at
        ",
    )
    .bind(address.id)
    .bind(address.contact_id)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.province)
    .bind(&address.country)
    .bind(&address.postal_code)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(row.into())
}

/// Soft-delete an address.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no live address matched.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn soft_delete(
    conn: &mut PgConnection,
    id: AddressId,
    contact_id: ContactId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE addresses
        SET deleted_at = NOW()
        WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
        ",
    )
    .bind(id)
    .bind(contact_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
