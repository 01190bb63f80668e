//! User account persistence.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use super::db::{parse_timestamp, timestamp};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip)]
    pub hashed_password: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Insert a new account. Returns `None` when the email is already taken.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    hashed_password: &str,
    full_name: &str,
) -> Result<Option<User>> {
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: normalize_email(email),
        hashed_password: hashed_password.to_string(),
        full_name: full_name.trim().to_string(),
        created_at: Utc::now(),
        is_active: true,
    };

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, hashed_password, full_name, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(&user.full_name)
    .bind(user.is_active)
    .bind(timestamp(user.created_at))
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(Some(user)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, hashed_password, full_name, is_active, created_at FROM users WHERE email = ?1",
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;

    row.map(TryInto::try_into).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, hashed_password, full_name, is_active, created_at FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Activate or deactivate an account. Returns false if no such user.
pub async fn set_active(pool: &SqlitePool, id: &str, active: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE users SET is_active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Emails compare case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    hashed_password: String,
    full_name: String,
    is_active: bool,
    created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
            email: row.email,
            hashed_password: row.hashed_password,
            full_name: row.full_name,
            is_active: row.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;

    #[tokio::test]
    async fn create_and_find() {
        let db = init_database(":memory:", 1).await.unwrap();
        let user = create_user(db.pool(), " Ada@Example.com ", "hash", "Ada Lovelace")
            .await
            .unwrap()
            .expect("created");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_active);

        let by_email = find_by_email(db.pool(), "ADA@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.hashed_password, "hash");

        let by_id = find_by_id(db.pool(), &user.id).await.unwrap().unwrap();
        assert_eq!(by_id.full_name, "Ada Lovelace");
        assert!(find_by_id(db.pool(), "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let db = init_database(":memory:", 1).await.unwrap();
        assert!(create_user(db.pool(), "a@b.io", "h", "A").await.unwrap().is_some());
        assert!(create_user(db.pool(), "A@B.io", "h", "B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivate() {
        let db = init_database(":memory:", 1).await.unwrap();
        let user = create_user(db.pool(), "a@b.io", "h", "A").await.unwrap().unwrap();
        assert!(set_active(db.pool(), &user.id, false).await.unwrap());
        assert!(!find_by_id(db.pool(), &user.id).await.unwrap().unwrap().is_active);
        assert!(!set_active(db.pool(), "nobody", false).await.unwrap());
    }
}
