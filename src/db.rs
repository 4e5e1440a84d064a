use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::auth::password::hash_password;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    // One connection, kept alive: sqlite serializes writers anyway, and
    // an in-memory database vanishes when its last connection closes.
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to connect to database")
}

/// Creates the two identity tables. AUTOINCREMENT keeps ids monotonic,
/// so a deleted id is never handed out again.
pub async fn init_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            role TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            position TEXT NOT NULL,
            department TEXT NOT NULL,
            salary REAL NOT NULL,
            photo TEXT,
            password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts the demo accounts and sample employees, skipping rows whose
/// email is already present.
pub async fn seed_demo_data(pool: &SqlitePool) -> anyhow::Result<()> {
    let admin_hash = hash_password("admin123")?;
    let employee_hash = hash_password("employee123")?;

    sqlx::query(
        "INSERT INTO users (name, email, password, role) VALUES \
         ('Admin User', 'admin@company.com', ?, 'ADMIN'), \
         ('Employee User', 'employee@company.com', ?, 'EMPLOYEE') \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&admin_hash)
    .bind(&employee_hash)
    .execute(pool)
    .await?;

    let alice_hash = hash_password("alice123")?;
    let bob_hash = hash_password("bob123")?;

    sqlx::query(
        "INSERT INTO employees (name, email, position, department, salary, photo, password) VALUES \
         ('Alice Johnson', 'alice@company.com', 'Developer', 'Engineering', 70000, NULL, ?), \
         ('Bob Smith', 'bob@company.com', 'Designer', 'Design', 65000, NULL, ?) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&alice_hash)
    .bind(&bob_hash)
    .execute(pool)
    .await?;

    info!("Database seeded");

    Ok(())
}
