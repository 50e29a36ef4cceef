use std::str::FromStr;

use hyper::header::HeaderValue;
use hyper::http::Method;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::cors::CorsLayer;
use tracing::info;

use chirper::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:chirper.db".to_string());

    let pool = SqlitePoolOptions::new()
        .connect_with(SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true))
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let mut router = app(AppState { pool });

    if let Ok(front_url) = std::env::var("CORS_ORIGIN") {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
            .allow_origin(front_url.parse::<HeaderValue>()?);
        router = router.layer(cors);
    }

    let addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    info!("Listening on {addr}");

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
