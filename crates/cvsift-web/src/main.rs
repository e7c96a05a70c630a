use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

mod handlers;
mod models;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("CVSIFT_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let frontend_dir =
        std::env::var("CVSIFT_FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string());

    // Uploads can be sizable scanned documents
    let body_limit = axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024);

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::root))
        .route("/health", axum::routing::get(handlers::health))
        .route(
            "/parse-resume",
            axum::routing::post(handlers::parse_resume),
        )
        .route(
            "/parse-multiple",
            axum::routing::post(handlers::parse_multiple),
        )
        .nest_service("/app", ServeDir::new(frontend_dir))
        .layer(body_limit)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
