//! Profit analysis engine.
//!
//! Given a stock and a date range, analyzes the range plus the equal-length
//! windows before and after it, then lists the other stocks whose
//! multi-trade profit beat the target in each window.

pub mod ranking;
pub mod trade;
pub mod window;

use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use crate::data_provider::PriceSeriesProvider;
use crate::errors::{ProfitHubError, Result};
use crate::models::profit::ProfitReport;
use ranking::PeerProfit;

pub use trade::{analyze_series, best_single_trade, max_multi_trade_profit};

pub struct ProfitEngine {
    provider: Arc<dyn PriceSeriesProvider + Send + Sync>,
}

impl ProfitEngine {
    pub fn new(provider: Arc<dyn PriceSeriesProvider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Three-window analysis of `stock_id` annotated with outperforming peers.
    ///
    /// `end < start` is not rejected; it yields no data in every window.
    pub async fn analyze(&self, stock_id: i64, start: NaiveDate, end: NaiveDate) -> Result<ProfitReport> {
        let analysis = window::analyze_windows(self.provider.as_ref(), stock_id, start, end).await?;

        let peers = self.peer_profits(stock_id, start, end).await?;
        let outperformers = ranking::rank_outperformers(&analysis, &peers);

        info!(
            "Analyzed stock {} for {}..={} against {} peers",
            stock_id,
            start,
            end,
            peers.len()
        );

        Ok(ProfitReport {
            analysis,
            outperformers,
        })
    }

    /// 并发计算其他股票的多次交易收益，结果按目录顺序返回
    async fn peer_profits(&self, stock_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Vec<PeerProfit>> {
        let others = self.provider.list_other_stocks(stock_id).await?;

        let handles: Vec<_> = others
            .into_iter()
            .map(|(peer_id, name)| {
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move {
                    let multi_trade = window::multi_trade_windows(provider.as_ref(), peer_id, start, end).await?;
                    Ok::<_, ProfitHubError>(PeerProfit { name, multi_trade })
                })
            })
            .collect();

        let mut peers = Vec::with_capacity(handles.len());
        for handle in handles {
            let peer = handle
                .await
                .map_err(|e| ProfitHubError::Unknown(format!("peer task failed: {}", e)))??;
            debug!("peer {}: {:?}", peer.name, peer.multi_trade);
            peers.push(peer);
        }

        Ok(peers)
    }
}
