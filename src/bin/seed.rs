use dotenvy::dotenv;
use staffdesk::db;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt().init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = db::init_db(&database_url).await;
    db::init_schema(&pool).await?;
    db::seed_demo_data(&pool).await?;

    println!("Database seeded successfully");

    Ok(())
}
