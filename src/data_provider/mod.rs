use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{ProfitHubError, Result};
use crate::models::stock::{NewStock, NewStockPrice, PricePoint, Stock, StockData, StockPrice};
use crate::util::arrow_utils;

/// Price series access needed by the profit engine.
///
/// Every returned series is ascending by date. Unknown stock ids yield empty series.
#[async_trait]
pub trait PriceSeriesProvider {
    /// Points with `from <= date <= to`.
    async fn fetch_range(&self, stock_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>>;

    /// The `limit` most recent points strictly before `before`.
    async fn fetch_before_limited(&self, stock_id: i64, before: NaiveDate, limit: usize) -> Result<Vec<PricePoint>>;

    /// The `limit` earliest points strictly after `after`.
    async fn fetch_after_limited(&self, stock_id: i64, after: NaiveDate, limit: usize) -> Result<Vec<PricePoint>>;

    /// `(id, name)` of every stock except `excluding_id`, in insertion order.
    async fn list_other_stocks(&self, excluding_id: i64) -> Result<Vec<(i64, String)>>;
}

pub type SharedStockStore = Arc<StockDataProvider>;

#[derive(Clone)]
struct Catalog {
    data: Vec<StockData>,
    // 索引用于快速查找
    ticker_index: HashMap<String, usize>,
    id_index: HashMap<i64, usize>,
    next_stock_id: i64,
    next_price_id: i64,
}

impl Catalog {
    fn from_data(data: Vec<StockData>) -> Self {
        let next_stock_id = data.iter().map(|s| s.stock.id).max().unwrap_or(0) + 1;
        let next_price_id = data
            .iter()
            .flat_map(|s| s.prices.iter().map(|p| p.id))
            .max()
            .unwrap_or(0)
            + 1;

        let mut catalog = Self {
            data,
            ticker_index: HashMap::new(),
            id_index: HashMap::new(),
            next_stock_id,
            next_price_id,
        };
        for stock in &mut catalog.data {
            stock.prices.sort_by_key(|p| p.date);
        }
        catalog.rebuild_indices();
        catalog
    }

    fn rebuild_indices(&mut self) {
        self.ticker_index.clear();
        self.id_index.clear();

        for (i, stock) in self.data.iter().enumerate() {
            self.ticker_index.insert(stock.stock.ticker.clone(), i);
            self.id_index.insert(stock.stock.id, i);
        }
    }

    fn by_ticker(&self, ticker: &str) -> Option<&StockData> {
        self.ticker_index.get(ticker).map(|&idx| &self.data[idx])
    }

    fn by_ticker_mut(&mut self, ticker: &str) -> Option<&mut StockData> {
        match self.ticker_index.get(ticker) {
            Some(&idx) => Some(&mut self.data[idx]),
            None => None,
        }
    }

    fn prices_of(&self, stock_id: i64) -> &[StockPrice] {
        self.id_index
            .get(&stock_id)
            .map(|&idx| self.data[idx].prices.as_slice())
            .unwrap_or(&[])
    }
}

/// Catalog state taken by [`StockDataProvider::checkpoint`].
pub struct Checkpoint(Catalog);

/// In-memory stock catalog with price history.
///
/// Stocks keep insertion order; each stock's prices are kept sorted by date.
pub struct StockDataProvider {
    catalog: RwLock<Catalog>,
}

impl StockDataProvider {
    pub fn new_empty() -> Self {
        Self::new_with_data(Vec::new())
    }

    /// 使用提供的数据创建新的数据提供者实例
    pub fn new_with_data(data: Vec<StockData>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::from_data(data)),
        }
    }

    /// Load an Arrow snapshot; a missing file gives an empty catalog.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            arrow_utils::read_stock_data_from_arrow(path)?
        } else {
            Vec::new()
        };
        info!("Loaded {} stocks from {}", data.len(), path.display());
        Ok(Self::new_with_data(data))
    }

    /// Write an Arrow snapshot. The lock is only held while copying the
    /// catalog; the file is written on the blocking pool.
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.snapshot().await;
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<()> {
            // 确保目录存在
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            arrow_utils::save_stock_data_to_arrow(&data, &path)
        })
        .await
        .map_err(|e| ProfitHubError::Unknown(format!("save task failed: {}", e)))?
    }

    /// Capture the whole catalog, ids counters included.
    pub async fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.catalog.read().await.clone())
    }

    /// Put the catalog back to a previous checkpoint.
    pub async fn rollback(&self, checkpoint: Checkpoint) {
        *self.catalog.write().await = checkpoint.0;
    }

    pub async fn snapshot(&self) -> Vec<StockData> {
        self.catalog.read().await.data.clone()
    }

    /// 获取所有股票列表
    pub async fn get_all_stocks(&self) -> Vec<Stock> {
        let catalog = self.catalog.read().await;
        catalog.data.iter().map(|s| s.stock.clone()).collect()
    }

    pub async fn get_stock_by_ticker(&self, ticker: &str) -> Option<Stock> {
        let catalog = self.catalog.read().await;
        catalog.by_ticker(ticker).map(|s| s.stock.clone())
    }

    pub async fn create_stock(&self, new: NewStock) -> Result<Stock> {
        let mut catalog = self.catalog.write().await;
        if catalog.ticker_index.contains_key(&new.ticker) {
            return Err(ProfitHubError::AlreadyExists("Stock already exists".to_string()));
        }

        let stock = Stock::from_new(catalog.next_stock_id, new);
        catalog.next_stock_id += 1;

        let idx = catalog.data.len();
        catalog.ticker_index.insert(stock.ticker.clone(), idx);
        catalog.id_index.insert(stock.id, idx);
        catalog.data.push(StockData {
            stock: stock.clone(),
            prices: Vec::new(),
        });

        info!("Stock '{}' ({}) added", stock.name, stock.ticker);
        Ok(stock)
    }

    /// Replace name, ticker and inception date, keeping id and catalog position.
    pub async fn update_stock(&self, ticker: &str, updated: NewStock) -> Result<Stock> {
        let mut catalog = self.catalog.write().await;
        if catalog.by_ticker(ticker).is_none() {
            return Err(ProfitHubError::stock_not_found());
        }
        if updated.ticker != ticker && catalog.ticker_index.contains_key(&updated.ticker) {
            return Err(ProfitHubError::AlreadyExists("New ticker already exists".to_string()));
        }

        let entry = catalog
            .by_ticker_mut(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;
        entry.stock.name = updated.name;
        entry.stock.ticker = updated.ticker;
        entry.stock.inception_date = updated.inception_date;
        let stock = entry.stock.clone();

        catalog.rebuild_indices();
        Ok(stock)
    }

    /// Remove a stock together with all of its prices.
    pub async fn delete_stock(&self, ticker: &str) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        let idx = *catalog
            .ticker_index
            .get(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;

        let removed = catalog.data.remove(idx);
        catalog.rebuild_indices();

        info!(
            "Stock '{}' deleted with {} price records",
            removed.stock.ticker,
            removed.prices.len()
        );
        Ok(())
    }

    pub async fn get_prices(&self, ticker: &str) -> Result<Vec<StockPrice>> {
        let catalog = self.catalog.read().await;
        catalog
            .by_ticker(ticker)
            .map(|s| s.prices.clone())
            .ok_or_else(ProfitHubError::stock_not_found)
    }

    pub async fn add_price(&self, ticker: &str, new: NewStockPrice) -> Result<StockPrice> {
        let mut catalog = self.catalog.write().await;
        let price_id = catalog.next_price_id;

        let entry = catalog
            .by_ticker_mut(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;
        let pos = match entry.prices.binary_search_by_key(&new.date, |p| p.date) {
            Ok(_) => return Err(ProfitHubError::AlreadyExists("Date already exists".to_string())),
            Err(pos) => pos,
        };

        let price = StockPrice::from_new(price_id, entry.stock.id, new);
        entry.prices.insert(pos, price.clone());
        catalog.next_price_id += 1;

        Ok(price)
    }

    /// Bulk insert used by seeding; dates already present are skipped.
    pub async fn extend_prices(&self, ticker: &str, rows: Vec<NewStockPrice>) -> Result<usize> {
        let mut catalog = self.catalog.write().await;
        let mut next_id = catalog.next_price_id;

        let entry = catalog
            .by_ticker_mut(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;
        let stock_id = entry.stock.id;
        let before = entry.prices.len();
        let mut known: HashSet<NaiveDate> = entry.prices.iter().map(|p| p.date).collect();

        for row in rows {
            if !known.insert(row.date) {
                continue;
            }
            entry.prices.push(StockPrice::from_new(next_id, stock_id, row));
            next_id += 1;
        }
        entry.prices.sort_by_key(|p| p.date);
        let added = entry.prices.len() - before;

        catalog.next_price_id = next_id;
        Ok(added)
    }

    pub async fn get_price(&self, ticker: &str, date: NaiveDate) -> Result<StockPrice> {
        let catalog = self.catalog.read().await;
        catalog
            .by_ticker(ticker)
            .and_then(|s| s.prices.iter().find(|p| p.date == date))
            .cloned()
            .ok_or_else(|| ProfitHubError::NotFound("Stock or date not found".to_string()))
    }

    pub async fn update_price(&self, ticker: &str, date: NaiveDate, updated: NewStockPrice) -> Result<StockPrice> {
        let mut catalog = self.catalog.write().await;
        let entry = catalog
            .by_ticker_mut(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;

        let idx = entry
            .prices
            .iter()
            .position(|p| p.date == date)
            .ok_or_else(|| ProfitHubError::NotFound("Date not found".to_string()))?;
        if updated.date != date && entry.prices.iter().any(|p| p.date == updated.date) {
            return Err(ProfitHubError::AlreadyExists("New date already exists".to_string()));
        }

        entry.prices[idx].apply(updated);
        let price = entry.prices[idx].clone();
        entry.prices.sort_by_key(|p| p.date);

        Ok(price)
    }

    pub async fn delete_price(&self, ticker: &str, date: NaiveDate) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        let entry = catalog
            .by_ticker_mut(ticker)
            .ok_or_else(ProfitHubError::stock_not_found)?;

        let idx = entry
            .prices
            .iter()
            .position(|p| p.date == date)
            .ok_or_else(|| ProfitHubError::NotFound("Date not found".to_string()))?;
        entry.prices.remove(idx);

        Ok(())
    }

    /// 获取最新交易日期
    pub async fn get_latest_trading_date(&self) -> Option<NaiveDate> {
        let catalog = self.catalog.read().await;
        catalog
            .data
            .iter()
            .filter_map(|s| s.prices.last().map(|p| p.date))
            .max()
    }
}

#[async_trait]
impl PriceSeriesProvider for StockDataProvider {
    async fn fetch_range(&self, stock_id: i64, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>> {
        let catalog = self.catalog.read().await;
        let prices = catalog.prices_of(stock_id);

        let lo = prices.partition_point(|p| p.date < from);
        let hi = prices.partition_point(|p| p.date <= to);
        if lo >= hi {
            return Ok(Vec::new());
        }
        Ok(prices[lo..hi].iter().map(StockPrice::point).collect())
    }

    async fn fetch_before_limited(&self, stock_id: i64, before: NaiveDate, limit: usize) -> Result<Vec<PricePoint>> {
        let catalog = self.catalog.read().await;
        let prices = catalog.prices_of(stock_id);

        let end = prices.partition_point(|p| p.date < before);
        let start = end.saturating_sub(limit);
        Ok(prices[start..end].iter().map(StockPrice::point).collect())
    }

    async fn fetch_after_limited(&self, stock_id: i64, after: NaiveDate, limit: usize) -> Result<Vec<PricePoint>> {
        let catalog = self.catalog.read().await;
        let prices = catalog.prices_of(stock_id);

        let start = prices.partition_point(|p| p.date <= after);
        Ok(prices[start..]
            .iter()
            .take(limit)
            .map(StockPrice::point)
            .collect())
    }

    async fn list_other_stocks(&self, excluding_id: i64) -> Result<Vec<(i64, String)>> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .data
            .iter()
            .filter(|s| s.stock.id != excluding_id)
            .map(|s| (s.stock.id, s.stock.name.clone()))
            .collect())
    }
}
