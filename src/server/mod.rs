pub mod prices;
pub mod profit;
pub mod stocks;

use crate::errors::ProfitHubError;
use crate::services::DataService;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<DataService>;

impl IntoResponse for ProfitHubError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProfitHubError::NotFound(_) => StatusCode::NOT_FOUND,
            ProfitHubError::InvalidDateFormat | ProfitHubError::AlreadyExists(_) => StatusCode::NOT_ACCEPTABLE,
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/stocks", get(stocks::list_stocks).post(stocks::create_stock))
        .route("/stocks/", get(stocks::list_stocks).post(stocks::create_stock))
        .route(
            "/stocks/{ticker}",
            get(stocks::get_stock).put(stocks::update_stock).delete(stocks::delete_stock),
        )
        .route("/prices/{ticker}", get(prices::list_prices).post(prices::add_price))
        .route(
            "/prices/{ticker}/{month}/{day}/{year}",
            get(prices::get_price).put(prices::update_price).delete(prices::delete_price),
        )
        .route("/profit", post(profit::calculate_profit))
        .route("/profit/", post(profit::calculate_profit))
        .with_state(state)
}

/// Start the axum server
pub async fn serve(service: DataService, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    info!("Registering routes:");
    info!("  GET|POST /stocks");
    info!("  GET|PUT|DELETE /stocks/{{ticker}}");
    info!("  GET|POST /prices/{{ticker}}");
    info!("  GET|PUT|DELETE /prices/{{ticker}}/{{month}}/{{day}}/{{year}}");
    info!("  POST /profit");

    let app = build_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
