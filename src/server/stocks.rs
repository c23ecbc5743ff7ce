use crate::errors::Result;
use crate::models::stock::{NewStock, Stock};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// GET /stocks
pub async fn list_stocks(State(service): State<AppState>) -> Json<Vec<Stock>> {
    Json(service.list_stocks().await)
}

/// POST /stocks
pub async fn create_stock(
    State(service): State<AppState>,
    Json(new): Json<NewStock>,
) -> Result<(StatusCode, Json<Stock>)> {
    let stock = service.create_stock(new).await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

/// GET /stocks/{ticker}
pub async fn get_stock(State(service): State<AppState>, Path(ticker): Path<String>) -> Result<Json<Stock>> {
    Ok(Json(service.get_stock(&ticker).await?))
}

/// PUT /stocks/{ticker}
pub async fn update_stock(
    State(service): State<AppState>,
    Path(ticker): Path<String>,
    Json(updated): Json<NewStock>,
) -> Result<(StatusCode, Json<Stock>)> {
    let stock = service.update_stock(&ticker, updated).await?;
    Ok((StatusCode::ACCEPTED, Json(stock)))
}

/// DELETE /stocks/{ticker} - prices go with it
pub async fn delete_stock(State(service): State<AppState>, Path(ticker): Path<String>) -> Result<StatusCode> {
    service.delete_stock(&ticker).await?;
    Ok(StatusCode::ACCEPTED)
}
