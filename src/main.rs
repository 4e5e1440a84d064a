use actix_web::HttpServer;
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;

use staffdesk::{config::Config, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = db::init_db(&config.database_url).await;
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || routes::app(pool.clone(), config.clone()))
        .bind(server_addr)?
        .run()
        .await
}
