use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{auth::AuthUser, password::hash_password},
    config::Config,
    error::ApiError,
    model::{employee::Employee, user::User},
};

/// Maximum accepted photo upload size (5MB).
const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

#[derive(Deserialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "Carl")]
    pub name: String,
    #[schema(example = "carl@x.com", format = "email")]
    pub email: String,
    #[schema(example = "QA")]
    pub position: String,
    #[schema(example = "Eng")]
    pub department: String,
    #[schema(example = 50000.0)]
    pub salary: f64,
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Partial update. Omitted fields keep their stored value; `photo` also
/// accepts an explicit null to clear it.
#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable = true)]
    pub photo: Option<Option<String>>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePassword {
    #[serde(rename = "newPassword")]
    #[schema(example = "s3cret99")]
    pub new_password: String,
}

/// Keeps "field absent" and "field: null" apart for nullable columns.
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// List employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employee records in ascending id order", body = [Employee]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let employees = Employee::list_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Create employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing or malformed fields"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email already exists", body = Object, example = json!({
            "error": "conflict",
            "message": "Email already exists"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Json<NewEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    require_non_empty("name", &body.name)?;
    require_non_empty("email", &body.email)?;
    require_non_empty("position", &body.position)?;
    require_non_empty("department", &body.department)?;
    require_non_empty("password", &body.password)?;

    if body.salary < 0.0 {
        return Err(ApiError::validation("salary must be non-negative"));
    }

    let email = body.email.trim();

    // The employees table enforces its own uniqueness; the users table
    // shares the same login-email space and needs an explicit check.
    if User::email_exists(pool.get_ref(), email).await? {
        return Err(ApiError::conflict("Email already exists"));
    }

    let hashed = hash_password(&body.password)?;

    let employee = sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (name, email, position, department, salary, photo, password) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, name, email, position, department, salary, photo, password",
    )
    .bind(body.name.trim())
    .bind(email)
    .bind(body.position.trim())
    .bind(body.department.trim())
    .bind(body.salary)
    .bind(body.photo.as_deref())
    .bind(&hashed)
    .fetch_one(pool.get_ref())
    .await?;

    info!(employee_id = employee.id, "Employee created");

    Ok(HttpResponse::Created().json(employee))
}

/// Update employee
///
/// Admin-only full update. A supplied password is re-hashed; an omitted
/// one leaves the stored hash untouched.
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated record", body = Employee),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let id = path.into_inner();
    let update = body.into_inner();

    if let Some(name) = &update.name {
        require_non_empty("name", name)?;
    }
    if let Some(email) = &update.email {
        require_non_empty("email", email)?;
    }
    if let Some(position) = &update.position {
        require_non_empty("position", position)?;
    }
    if let Some(department) = &update.department {
        require_non_empty("department", department)?;
    }
    if let Some(password) = &update.password {
        require_non_empty("password", password)?;
    }
    if let Some(salary) = update.salary {
        if salary < 0.0 {
            return Err(ApiError::validation("salary must be non-negative"));
        }
    }

    let current = Employee::find_by_id(pool.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    if let Some(email) = &update.email {
        let email = email.trim();
        if email != current.email && User::email_exists(pool.get_ref(), email).await? {
            return Err(ApiError::conflict("Email already exists"));
        }
    }

    let name = update.name.map_or(current.name, |v| v.trim().to_string());
    let email = update.email.map_or(current.email, |v| v.trim().to_string());
    let position = update
        .position
        .map_or(current.position, |v| v.trim().to_string());
    let department = update
        .department
        .map_or(current.department, |v| v.trim().to_string());
    let salary = update.salary.unwrap_or(current.salary);
    let photo = match update.photo {
        Some(value) => value,
        None => current.photo,
    };
    let password = match update.password {
        Some(plain) => hash_password(&plain)?,
        None => current.password,
    };

    let employee = sqlx::query_as::<_, Employee>(
        "UPDATE employees \
         SET name = ?, email = ?, position = ?, department = ?, salary = ?, photo = ?, password = ? \
         WHERE id = ? \
         RETURNING id, name, email, position, department, salary, photo, password",
    )
    .bind(&name)
    .bind(&email)
    .bind(&position)
    .bind(&department)
    .bind(salary)
    .bind(photo.as_deref())
    .bind(&password)
    .bind(id)
    .fetch_one(pool.get_ref())
    .await?;

    info!(employee_id = id, "Employee updated");

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "not_found",
            "message": "Employee not found"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    info!(employee_id = id, "Employee deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Own profile
///
/// Resolves the caller's employee record through the token's email
/// claim. Admin accounts without an employee row get a 404.
#[utoipa::path(
    get,
    path = "/employees/profile",
    responses(
        (status = 200, description = "Own employee record", body = Object, example = json!({
            "employee": {
                "id": 3,
                "name": "Alice Johnson",
                "email": "alice@company.com",
                "position": "Developer",
                "department": "Engineering",
                "salary": 70000.0,
                "photo": null
            }
        })),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn profile(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let employee = Employee::find_by_email(pool.get_ref(), &auth.email)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "employee": employee })))
}

/// Change own password
///
/// Keyed by the email claim with the same resolution order as login
/// (users first, then employees), so the new hash lands on the row
/// that authenticated this token.
#[utoipa::path(
    post,
    path = "/employees/update-password",
    request_body = UpdatePassword,
    responses(
        (status = 200, description = "Password updated", body = Object, example = json!({
            "message": "Password updated"
        })),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_password(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Json<UpdatePassword>,
) -> Result<HttpResponse, ApiError> {
    if body.new_password.chars().count() < 6 {
        return Err(ApiError::validation("Password too short"));
    }

    let hashed = hash_password(&body.new_password)?;

    let sql = if User::email_exists(pool.get_ref(), &auth.email).await? {
        "UPDATE users SET password = ? WHERE email = ?"
    } else {
        "UPDATE employees SET password = ? WHERE email = ?"
    };

    let result = sqlx::query(sql)
        .bind(&hashed)
        .bind(&auth.email)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Record not found"));
    }

    info!(id = auth.id, role = %auth.role, "Password updated");

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated" })))
}

/// Upload own photo
///
/// Employee-only: admin accounts have no photo column to write. The
/// file is stored under the configured upload directory with a fresh
/// name; only the client extension is kept.
#[utoipa::path(
    post,
    path = "/employees/update-photo",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored", body = Object, example = json!({
            "message": "Photo updated",
            "photo": "/uploads/3f2ab8a0-6a3e-4c59-9d3a-0c7c1a1f9b11.png"
        })),
        (status = 400, description = "No photo field in the upload, or file too large"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_photo(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    if !auth.is_employee() {
        return Err(ApiError::forbidden("Employees only"));
    }

    let mut stored: Option<(String, std::path::PathBuf)> = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.content_disposition().get_name() != Some("photo") {
            // Drain so the stream can advance to the next field.
            while field.try_next().await?.is_some() {}
            continue;
        }

        let ext = field
            .content_disposition()
            .get_filename()
            .and_then(|f| std::path::Path::new(f).extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let filename = format!("{}{}", Uuid::new_v4(), ext);

        let mut data = web::BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > MAX_PHOTO_SIZE {
                return Err(ApiError::validation(format!(
                    "File too large. Maximum size is {}MB",
                    MAX_PHOTO_SIZE / 1024 / 1024
                )));
            }
            data.extend_from_slice(&chunk);
        }

        debug!(filename = %filename, bytes = data.len(), "Writing uploaded photo");

        let dir = std::path::PathBuf::from(&config.upload_dir);
        let path = dir.join(&filename);
        let bytes = data.freeze();
        let write_path = path.clone();
        web::block(move || {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&write_path, &bytes)
        })
        .await??;

        stored = Some((format!("/uploads/{filename}"), path));
        break;
    }

    let (photo, file_path) = stored.ok_or_else(|| ApiError::validation("File upload error"))?;

    // Employee tokens can also come from a users row; those callers have
    // no employee record and land on the 404 below.
    let result = sqlx::query("UPDATE employees SET photo = ? WHERE email = ?")
        .bind(&photo)
        .bind(&auth.email)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        // No row took the update; drop the file written above.
        let _ = web::block(move || std::fs::remove_file(file_path)).await;
        return Err(ApiError::not_found("Employee not found"));
    }

    info!(email = %auth.email, photo = %photo, "Photo updated");

    Ok(HttpResponse::Ok().json(json!({ "message": "Photo updated", "photo": photo })))
}
