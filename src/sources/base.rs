use crate::errors::Result;
use crate::models::stock::{NewStock, NewStockPrice};
use async_trait::async_trait;

/// Base trait for seed data sources
#[async_trait]
pub trait PriceSource {
    /// Short name used in logs
    fn source_name(&self) -> &'static str;

    /// Stocks this source knows about, in the order they should be cataloged
    async fn fetch_stock_list(&self) -> Result<Vec<NewStock>>;

    /// Daily history for one stock; empty when the source has none
    async fn fetch_stock_history(&self, stock: &NewStock) -> Result<Vec<NewStockPrice>>;
}
