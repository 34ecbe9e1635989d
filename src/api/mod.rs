pub mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::database::Database;

pub type SharedDatabase = Arc<Database>;

pub fn create_router(db: SharedDatabase) -> Router {
    Router::new()
        .route("/", get(routes::hello))
        .route("/health", get(routes::health))
        .route("/prices", get(routes::get_prices))
        .route("/prices/:symbol", get(routes::get_price))
        .route("/users/:user_id/balances", get(routes::get_user_balances))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Allow all origins for dev
}

pub async fn start_server(db: SharedDatabase, address: &str) -> anyhow::Result<()> {
    let app = create_router(db);

    let listener = tokio::net::TcpListener::bind(address).await?;

    tracing::info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
