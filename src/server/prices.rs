use crate::errors::Result;
use crate::models::stock::{NewStockPrice, StockPrice};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `{ticker}/{month}/{day}/{year}` path segments
type PricePath = Path<(String, String, String, String)>;

/// GET /prices/{ticker}
pub async fn list_prices(
    State(service): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Vec<StockPrice>>> {
    Ok(Json(service.list_prices(&ticker).await?))
}

/// POST /prices/{ticker}
pub async fn add_price(
    State(service): State<AppState>,
    Path(ticker): Path<String>,
    Json(new): Json<NewStockPrice>,
) -> Result<(StatusCode, Json<StockPrice>)> {
    let price = service.add_price(&ticker, new).await?;
    Ok((StatusCode::CREATED, Json(price)))
}

/// GET /prices/{ticker}/{month}/{day}/{year}
pub async fn get_price(
    State(service): State<AppState>,
    Path((ticker, month, day, year)): PricePath,
) -> Result<Json<StockPrice>> {
    Ok(Json(service.get_price(&ticker, &month, &day, &year).await?))
}

/// PUT /prices/{ticker}/{month}/{day}/{year}
pub async fn update_price(
    State(service): State<AppState>,
    Path((ticker, month, day, year)): PricePath,
    Json(updated): Json<NewStockPrice>,
) -> Result<(StatusCode, Json<StockPrice>)> {
    let price = service.update_price(&ticker, &month, &day, &year, updated).await?;
    Ok((StatusCode::ACCEPTED, Json(price)))
}

/// DELETE /prices/{ticker}/{month}/{day}/{year}
pub async fn delete_price(
    State(service): State<AppState>,
    Path((ticker, month, day, year)): PricePath,
) -> Result<StatusCode> {
    service.delete_price(&ticker, &month, &day, &year).await?;
    Ok(StatusCode::ACCEPTED)
}
