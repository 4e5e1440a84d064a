use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::model::role::Role;

/// Row of the `users` table: administrative accounts plus any login-only
/// identities that are not employees.
#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Salted one-way hash, never serialized outward.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

impl User {
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn email_exists(pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
