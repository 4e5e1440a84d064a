use std::str::FromStr;

use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        jwt::issue_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::{employee::Employee, role::Role, user::User},
    models::{LoginRequest, LoginResponse, SignupRequest},
};

/// Login
///
/// Resolves credentials against the `users` table first, then the
/// `employees` table; the first email match decides the outcome.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "unauthenticated",
            "message": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(body, pool, config),
    fields(email = %body.email)
)]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if body.email.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::validation("Email and password are required"));
    }

    debug!("Checking users table");

    if let Some(user) = User::find_by_email(pool.get_ref(), &body.email).await? {
        if !verify_password(&body.password, &user.password) {
            info!("Invalid credentials: password mismatch");
            return Err(ApiError::unauthenticated("Invalid credentials"));
        }

        let token = issue_token(
            user.id,
            &user.email,
            user.role,
            &config.jwt_secret,
            config.token_ttl,
        )?;

        info!(user_id = user.id, role = %user.role, "Login successful");
        return Ok(HttpResponse::Ok().json(LoginResponse {
            token,
            role: user.role,
        }));
    }

    debug!("Checking employees table");

    if let Some(employee) = Employee::find_by_email(pool.get_ref(), &body.email).await? {
        if !verify_password(&body.password, &employee.password) {
            info!("Invalid credentials: password mismatch");
            return Err(ApiError::unauthenticated("Invalid credentials"));
        }

        let token = issue_token(
            employee.id,
            &employee.email,
            Role::Employee,
            &config.jwt_secret,
            config.token_ttl,
        )?;

        info!(employee_id = employee.id, "Login successful");
        return Ok(HttpResponse::Ok().json(LoginResponse {
            token,
            role: Role::Employee,
        }));
    }

    info!("Invalid credentials: email not found");
    Err(ApiError::unauthenticated("Invalid credentials"))
}

/// Signup
///
/// Administrative bootstrap path: creates a `users` row with a hashed
/// password. Not exposed to self-registration flows.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = Object, example = json!({
            "message": "User created"
        })),
        (status = 400, description = "Missing or malformed fields", body = Object, example = json!({
            "error": "validation",
            "message": "Email and password are required"
        })),
        (status = 409, description = "Email already exists", body = Object, example = json!({
            "error": "conflict",
            "message": "Email already exists"
        }))
    ),
    tag = "Auth"
)]
pub async fn signup(
    body: web::Json<SignupRequest>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim();

    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let role = Role::from_str(body.role.trim())
        .map_err(|_| ApiError::validation("Role must be ADMIN or EMPLOYEE"))?;

    // users.email is UNIQUE; the employees table shares the same
    // login-email space and needs an explicit check.
    if Employee::email_exists(pool.get_ref(), email).await? {
        return Err(ApiError::conflict("Email already exists"));
    }

    let name = body.name.as_deref().unwrap_or("").trim();
    let hashed = hash_password(&body.password)?;

    sqlx::query("INSERT INTO users (name, email, password, role) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(&hashed)
        .bind(role)
        .execute(pool.get_ref())
        .await?;

    info!(email, %role, "User created");

    Ok(HttpResponse::Created().json(json!({ "message": "User created" })))
}
