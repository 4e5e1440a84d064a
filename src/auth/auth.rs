use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::{error::ApiError, model::role::Role, models::Claims};

/// Verified identity of the caller, taken from the claims the auth
/// middleware attached to the request.
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<Claims>()
            .map(|claims| AuthUser {
                id: claims.sub,
                email: claims.email.clone(),
                role: claims.role,
            })
            .ok_or_else(|| ApiError::unauthenticated("Missing Authorization header").into());

        ready(user)
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin only"))
        }
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_admin_accepts_admin() {
        let user = AuthUser {
            id: 1,
            email: "admin@company.com".to_string(),
            role: Role::Admin,
        };
        assert!(user.require_admin().is_ok());
    }

    #[test]
    fn require_admin_rejects_employee() {
        let user = AuthUser {
            id: 2,
            email: "employee@company.com".to_string(),
            role: Role::Employee,
        };
        let err = user.require_admin().unwrap_err();
        assert_eq!(err.category(), "forbidden");
    }
}
