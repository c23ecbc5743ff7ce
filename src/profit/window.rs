use chrono::NaiveDate;
use log::debug;

use crate::data_provider::PriceSeriesProvider;
use crate::errors::Result;
use crate::models::profit::{Windowed, WindowedAnalysis};
use crate::models::stock::PricePoint;
use crate::profit::trade;

/// Fetch the main window and the equal-length windows right before and after it.
///
/// The adjacent windows hold as many trading days as the main window, so an
/// empty main window (including `end < start`) leaves all three empty.
pub async fn fetch_windows(
    provider: &(dyn PriceSeriesProvider + Send + Sync),
    stock_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Windowed<Vec<PricePoint>>> {
    let main = provider.fetch_range(stock_id, start, end).await?;
    let window_length = main.len();

    let preceding = provider.fetch_before_limited(stock_id, start, window_length).await?;
    let following = provider.fetch_after_limited(stock_id, end, window_length).await?;

    debug!(
        "stock {}: {} main / {} preceding / {} following points for {}..={}",
        stock_id,
        main.len(),
        preceding.len(),
        following.len(),
        start,
        end
    );

    Ok(Windowed {
        main,
        preceding,
        following,
    })
}

/// Full analysis of the three windows.
pub async fn analyze_windows(
    provider: &(dyn PriceSeriesProvider + Send + Sync),
    stock_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WindowedAnalysis> {
    let windows = fetch_windows(provider, stock_id, start, end).await?;
    Ok(windows.map(|points| trade::analyze_series(points.as_slice())))
}

/// Multi-trade totals only, used for peer comparison.
pub async fn multi_trade_windows(
    provider: &(dyn PriceSeriesProvider + Send + Sync),
    stock_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Windowed<f64>> {
    let windows = fetch_windows(provider, stock_id, start, end).await?;
    Ok(windows.map(|points| trade::max_multi_trade_profit(points.as_slice())))
}
