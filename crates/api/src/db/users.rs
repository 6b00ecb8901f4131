//! User repository.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use rolodex_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Database row for `users`.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password: String,
    name: String,
    token: Option<String>,
    token_exp: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password,
            name: row.name,
            token: row.token,
            token_exp: row.token_exp,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Parameters for inserting a user.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub token: Option<&'a str>,
    pub token_exp: i64,
}

/// Find a live user by username.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        SELECT id, username, password, name, token, token_exp, created_at, updated_at
        FROM users
        WHERE username = $1 AND deleted_at IS NULL
        ",
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(User::from))
}

/// Find the live user holding `token`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<User>, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        SELECT id, username, password, name, token, token_exp, created_at, updated_at
        FROM users
        WHERE token = $1 AND deleted_at IS NULL
        ",
    )
    .bind(token)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(User::from))
}

/// Count live users with the given username.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<i64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as(
        r"
        SELECT COUNT(*)
        FROM users
        WHERE username = $1 AND deleted_at IS NULL
        ",
    )
    .bind(username)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Insert a new user.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the username is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn create(conn: &mut PgConnection, user: NewUser<'_>) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        INSERT INTO users (username, password, name, token, token_exp)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, password, name, token, token_exp, created_at, updated_at
        ",
    )
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.name)
    .bind(user.token)
    .bind(user.token_exp)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| RepositoryError::from_unique_violation(e, "username already exists"))?;

    Ok(row.into())
}

/// Change a user's name and/or password hash. `None` keeps the stored value;
/// the session token is never touched.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user no longer exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_profile(
    conn: &mut PgConnection,
    id: UserId,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        UPDATE users
        SET
            name = COALESCE($2, name),
            password = COALESCE($3, password),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, username, password, name, token, token_exp, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(name)
    .bind(password_hash)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(row.into())
}

/// Replace a user's session token, invalidating whichever one was live.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user no longer exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn set_token(
    conn: &mut PgConnection,
    id: UserId,
    token: &str,
    token_exp: i64,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET token = $2, token_exp = $3, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        ",
    )
    .bind(id)
    .bind(token)
    .bind(token_exp)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Clear a user's session token if it is still `token`.
///
/// A token already replaced by a later login is left alone.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn clear_token(
    conn: &mut PgConnection,
    id: UserId,
    token: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE users
        SET token = NULL, token_exp = 0, updated_at = NOW()
        WHERE id = $1 AND token = $2
        ",
    )
    .bind(id)
    .bind(token)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
