use actix_web::{
    App, Error, Responder,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    get,
    middleware::{Logger, NormalizePath, from_fn},
    web::{self, Data},
};
use sqlx::SqlitePool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::employee,
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    docs::ApiDoc,
    error::ApiError,
};

#[get("/")]
async fn index() -> impl Responder {
    "Staffdesk API"
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/login").route(web::post().to(handlers::login)))
            .service(web::resource("/signup").route(web::post().to(handlers::signup))),
    );

    // Protected routes. Literal paths go before "/{id}" so the matcher
    // never treats them as an id.
    cfg.service(
        web::scope("/employees")
            .wrap(from_fn(auth_middleware))
            // /employees/profile
            .service(web::resource("/profile").route(web::get().to(employee::profile)))
            // /employees/update-password
            .service(
                web::resource("/update-password").route(web::post().to(employee::update_password)),
            )
            // /employees/update-photo
            .service(
                web::resource("/update-photo").route(web::post().to(employee::update_photo)),
            )
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    );
}

/// Full application as served by `main` and driven directly by the API
/// tests: middleware, swagger, shared state and the route table.
pub fn app(
    pool: SqlitePool,
    config: Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(NormalizePath::trim())
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
        )
        .app_data(Data::new(pool))
        .app_data(Data::new(config))
        // Extractor failures (incomplete bodies, non-numeric ids) render
        // as the validation category instead of actix's plain-text 400.
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _| ApiError::validation(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _| ApiError::validation(err.to_string()).into()),
        )
        .service(index)
        .configure(configure)
}
