use crate::config::Config;
use crate::data_provider::{SharedStockStore, StockDataProvider};
use crate::errors::{ProfitHubError, Result};
use crate::models::profit::{ProfitReport, ProfitRequest};
use crate::models::stock::{NewStock, NewStockPrice, Stock, StockPrice};
use crate::profit::ProfitEngine;
use crate::sources::PriceSource;
use crate::util;
use log::{error, info, warn};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 数据服务，处理股票/价格的增删改查、初始化数据和收益分析
pub struct DataService {
    config: Config,
    store: SharedStockStore,
    sources: Vec<Arc<dyn PriceSource + Send + Sync>>,
    engine: ProfitEngine,
    data_path: PathBuf,
    // 串行化 修改+保存，保证失败时能整体回滚
    write_lock: Mutex<()>,
}

impl DataService {
    /// 创建新的数据服务实例
    pub fn new(config: Config, store: SharedStockStore, sources: Vec<Arc<dyn PriceSource + Send + Sync>>) -> Self {
        let data_path = config.store_path();
        let engine = ProfitEngine::new(store.clone());
        Self {
            config,
            store,
            sources,
            engine,
            data_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted catalog, seeding it from `sources` the first time.
    pub async fn open(config: Config, sources: Vec<Arc<dyn PriceSource + Send + Sync>>) -> Result<Self> {
        let data_path = config.store_path();
        let seeded = data_path.exists();

        let store = if seeded {
            info!("Loading existing data from {}", data_path.display());
            StockDataProvider::load_from_file(&data_path)?
        } else {
            info!("No existing data found, creating new dataset");
            StockDataProvider::new_empty()
        };

        let service = Self::new(config, Arc::new(store), sources);
        if !seeded {
            service.seed().await?;
        }
        Ok(service)
    }

    /// 获取数据文件路径
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Import every stock and its history from the configured sources.
    ///
    /// Stocks whose ticker is already cataloged are skipped. Returns the
    /// number of price records added.
    pub async fn seed(&self) -> Result<usize> {
        let mut total = 0;

        for source in &self.sources {
            info!("Seeding from {}", source.source_name());
            let stocks = source.fetch_stock_list().await?;

            for new_stock in stocks {
                let ticker = new_stock.ticker.clone();
                match self.store.create_stock(new_stock.clone()).await {
                    Ok(_) => {}
                    Err(ProfitHubError::AlreadyExists(_)) => {
                        warn!("Stock {} already cataloged, skipping", ticker);
                        continue;
                    }
                    Err(e) => return Err(e),
                }

                let history = source.fetch_stock_history(&new_stock).await?;
                let added = self.store.extend_prices(&ticker, history).await?;
                info!("Imported {} price records for {}", added, ticker);
                total += added;
            }
        }

        self.save_data().await?;
        Ok(total)
    }

    /// 保存数据
    pub async fn save_data(&self) -> Result<()> {
        self.store.save_to_file(&self.data_path).await
    }

    /// Apply one mutation and persist it. When saving fails the catalog is
    /// rolled back, so the caller's error leaves no trace in memory.
    async fn commit<T, F, Fut>(&self, mutation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.config.autosave {
            return mutation().await;
        }

        let _guard = self.write_lock.lock().await;
        let checkpoint = self.store.checkpoint().await;
        let value = mutation().await?;

        if let Err(e) = self.save_data().await {
            error!("Failed to save {}, rolling back: {}", self.data_path.display(), e);
            self.store.rollback(checkpoint).await;
            return Err(e);
        }
        Ok(value)
    }

    async fn require_stock(&self, ticker: &str) -> Result<Stock> {
        self.store
            .get_stock_by_ticker(ticker)
            .await
            .ok_or_else(ProfitHubError::stock_not_found)
    }

    pub async fn list_stocks(&self) -> Vec<Stock> {
        self.store.get_all_stocks().await
    }

    pub async fn get_stock(&self, ticker: &str) -> Result<Stock> {
        self.require_stock(ticker).await
    }

    pub async fn create_stock(&self, new: NewStock) -> Result<Stock> {
        self.commit(|| self.store.create_stock(new)).await
    }

    pub async fn update_stock(&self, ticker: &str, updated: NewStock) -> Result<Stock> {
        self.commit(|| self.store.update_stock(ticker, updated)).await
    }

    pub async fn delete_stock(&self, ticker: &str) -> Result<()> {
        self.commit(|| self.store.delete_stock(ticker)).await
    }

    pub async fn list_prices(&self, ticker: &str) -> Result<Vec<StockPrice>> {
        self.store.get_prices(ticker).await
    }

    pub async fn add_price(&self, ticker: &str, new: NewStockPrice) -> Result<StockPrice> {
        self.commit(|| self.store.add_price(ticker, new)).await
    }

    /// Date is checked before the lookup, so a bad date wins over an unknown ticker.
    pub async fn get_price(&self, ticker: &str, month: &str, day: &str, year: &str) -> Result<StockPrice> {
        let date = util::parse_path_date(month, day, year)?;
        self.store.get_price(ticker, date).await
    }

    pub async fn update_price(
        &self,
        ticker: &str,
        month: &str,
        day: &str,
        year: &str,
        updated: NewStockPrice,
    ) -> Result<StockPrice> {
        self.require_stock(ticker).await?;
        let date = util::parse_path_date(month, day, year)?;

        self.commit(|| self.store.update_price(ticker, date, updated)).await
    }

    pub async fn delete_price(&self, ticker: &str, month: &str, day: &str, year: &str) -> Result<()> {
        self.require_stock(ticker).await?;
        let date = util::parse_path_date(month, day, year)?;

        self.commit(|| self.store.delete_price(ticker, date)).await
    }

    /// Resolve the ticker, parse `MM/DD/YYYY` dates and run the three-window analysis.
    pub async fn profit(&self, request: &ProfitRequest) -> Result<ProfitReport> {
        let stock = self.require_stock(&request.ticker).await?;

        let start = util::parse_us_date(&request.start_date)?;
        let end = util::parse_us_date(&request.end_date)?;

        info!("Profit analysis for {} from {} to {}", stock.ticker, start, end);
        self.engine.analyze(stock.id, start, end).await
    }
}
