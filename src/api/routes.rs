use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Result,
    Json,
};

use crate::api::SharedDatabase;
use crate::error::StoreError;
use crate::model::{CoinBalance, CoinPrice, HealthResponse, HelloResponse};
use crate::portfolio;

fn internal_error(context: &str, err: StoreError) -> (StatusCode, String) {
    tracing::error!("{}: {}", context, err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
}

pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse { hello: "world" })
}

pub async fn health(State(db): State<SharedDatabase>) -> (StatusCode, Json<HealthResponse>) {
    match db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { ok: true })),
        Err(err) => {
            tracing::warn!("Storage health check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse { ok: false }))
        }
    }
}

pub async fn get_user_balances(
    Path(user_id): Path<String>,
    State(db): State<SharedDatabase>,
) -> Result<Json<Vec<CoinBalance>>, (StatusCode, String)> {
    match portfolio::list_balances_for_user(&db, &user_id).await {
        Ok(rows) => Ok(Json(rows)),
        Err(err) => Err(internal_error(&format!("Failed to list balances for user {}", user_id), err)),
    }
}

pub async fn get_prices(
    State(db): State<SharedDatabase>,
) -> Result<Json<Vec<CoinPrice>>, (StatusCode, String)> {
    match portfolio::load_prices(&db).await {
        Ok(catalog) => Ok(Json(
            catalog
                .into_iter()
                .map(|(symbol, entry)| CoinPrice {
                    symbol,
                    name: entry.name,
                    price: entry.price,
                })
                .collect(),
        )),
        Err(err) => Err(internal_error("Failed to load prices", err)),
    }
}

pub async fn get_price(
    Path(symbol): Path<String>,
    State(db): State<SharedDatabase>,
) -> Result<Json<CoinPrice>, (StatusCode, String)> {
    match db.get_price(&symbol).await {
        Ok(Some(price)) => Ok(Json(CoinPrice {
            symbol: price.symbol.to_uppercase(),
            ..price
        })),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Symbol not found".to_string())),
        Err(err) => Err(internal_error(&format!("Failed to get price for {}", symbol), err)),
    }
}
