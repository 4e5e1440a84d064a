use crate::api::employee::{NewEmployee, UpdateEmployee, UpdatePassword};
use crate::model::employee::Employee;
use crate::model::role::Role;
use crate::models::{LoginRequest, LoginResponse, SignupRequest};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staffdesk API",
        version = "1.0.0",
        description = r#"
## Staffdesk

Employee-records backend with role-gated access.

### 🔹 Key Features
- **Authentication**
  - Login with email and password, signed bearer tokens
  - Administrative signup for bootstrap accounts
- **Employee Management** (admin)
  - Create, list, update and delete employee records
- **Self Service**
  - Own profile, password change and photo upload

### 🔐 Security
All `/employees` endpoints require **JWT Bearer authentication**.
Record management is restricted to the **ADMIN** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::signup,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::profile,
        crate::api::employee::update_password,
        crate::api::employee::update_photo,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            SignupRequest,
            NewEmployee,
            UpdateEmployee,
            UpdatePassword,
            Employee,
            Role
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and administrative signup"),
        (name = "Employee", description = "Employee records and self service"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
