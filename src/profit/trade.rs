//! Single-series profit math.
//!
//! Both functions expect points ordered by strictly increasing date.

use crate::models::profit::{TradeResult, WindowOutcome};
use crate::models::stock::PricePoint;

/// Multi-trade position state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Flat,
    Holding(f64),
}

/// Analyze one series: best single trade plus the multi-trade total.
pub fn analyze_series(points: &[PricePoint]) -> WindowOutcome {
    match best_single_trade(points) {
        Some(mut trade) => {
            trade.max_multi_trade_profit = max_multi_trade_profit(points);
            WindowOutcome::Trade(trade)
        }
        None => WindowOutcome::NoData,
    }
}

/// Best single buy followed by a later sell.
///
/// Exhaustive scan: a buy day is only tried when its close is below the buy
/// price of the best pair found so far, and a pair only replaces the best one
/// when strictly more profitable, so the first pair reaching a profit wins.
/// Without a profitable pair the result is the first day for both legs with
/// `buy_close = +inf`, `sell_close = 0`, `profit = 0`.
///
/// Returns `None` for an empty series.
pub fn best_single_trade(points: &[PricePoint]) -> Option<TradeResult> {
    let first = points.first()?;

    let mut best = TradeResult {
        buy_date: first.date,
        sell_date: first.date,
        buy_close: f64::INFINITY,
        sell_close: 0.0,
        profit: 0.0,
        max_multi_trade_profit: 0.0,
    };

    for (i, buy) in points[..points.len() - 1].iter().enumerate() {
        if buy.close >= best.buy_close {
            continue;
        }
        for sell in &points[i + 1..] {
            let profit = sell.close - buy.close;
            if profit > best.profit {
                best.buy_date = buy.date;
                best.sell_date = sell.date;
                best.buy_close = buy.close;
                best.sell_close = sell.close;
                best.profit = profit;
            }
        }
    }

    Some(best)
}

/// Greedy multi-trade profit: buy at the start of every rise, sell at the
/// start of every fall, and close an open position on the last day if it is
/// in profit.
pub fn max_multi_trade_profit(points: &[PricePoint]) -> f64 {
    let mut total = 0.0;
    let mut position = Position::Flat;

    for pair in points.windows(2) {
        let (today, tomorrow) = (pair[0].close, pair[1].close);
        if today == tomorrow {
            continue;
        }

        match position {
            Position::Flat if today < tomorrow => position = Position::Holding(today),
            Position::Holding(bought) if today > tomorrow => {
                total += today - bought;
                position = Position::Flat;
            }
            _ => {}
        }
    }

    // 最后一天平仓
    if let (Position::Holding(bought), Some(last)) = (position, points.last()) {
        if bought < last.close {
            total += last.close - bought;
        }
    }

    total
}
