use crate::errors::Result;
use crate::models::profit::{ProfitReport, ProfitRequest};
use crate::server::AppState;
use axum::{extract::State, Json};

/// POST /profit
///
/// Body: `{"ticker": "AAPL", "start_date": "12/08/2000", "end_date": "12/18/2000"}`
pub async fn calculate_profit(
    State(service): State<AppState>,
    Json(request): Json<ProfitRequest>,
) -> Result<Json<ProfitReport>> {
    Ok(Json(service.profit(&request).await?))
}
