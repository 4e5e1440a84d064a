use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

/// Row of the `employees` table.
///
/// The hash rides along for credential checks but is skipped on
/// serialization, so handlers can return the row as-is.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Alice Johnson",
    "email": "alice@company.com",
    "position": "Developer",
    "department": "Engineering",
    "salary": 70000.0,
    "photo": null
}))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    #[schema(nullable = true)]
    pub photo: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
}

const COLUMNS: &str = "id, name, email, position, department, salary, photo, password";

impl Employee {
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<Employee>> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {COLUMNS} FROM employees WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Employee>> {
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employees WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Full-table read in ascending id order.
    pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employees ORDER BY id ASC"))
            .fetch_all(pool)
            .await
    }

    pub async fn email_exists(pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?)")
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
