mod common;

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use stock_profit_hub::config::Config;
use stock_profit_hub::models::stock::{NewStock, NewStockPrice};
use stock_profit_hub::services::DataService;
use stock_profit_hub::{ProfitHubError, StockDataProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn new_stock(name: &str, ticker: &str) -> NewStock {
    NewStock {
        name: name.to_string(),
        ticker: ticker.to_string(),
        inception_date: d(1990, 1, 2),
    }
}

fn row(date: NaiveDate, close: f64) -> NewStockPrice {
    NewStockPrice {
        date,
        open: close,
        high: close,
        low: close,
        close,
        adj_close: close,
        volume: 1000,
    }
}

/// `data_dir` sits below a regular file, so every save fails.
fn unwritable_config(root: &Path) -> Config {
    let blocker = root.join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    Config::new().with_data_dir(blocker.join("data").to_str().unwrap())
}

async fn seeded_store() -> Arc<StockDataProvider> {
    let store = StockDataProvider::new_empty();
    store.create_stock(new_stock("Apple", "AAPL")).await.unwrap();
    store.add_price("AAPL", row(d(2000, 12, 8), 1.0)).await.unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn failed_save_discards_new_stock() {
    let dir = tempfile::tempdir().unwrap();
    let service = DataService::new(
        unwritable_config(dir.path()),
        Arc::new(StockDataProvider::new_empty()),
        Vec::new(),
    );

    let result = service.create_stock(new_stock("Apple", "AAPL")).await;
    assert!(matches!(result, Err(ProfitHubError::IoError(_))));
    assert!(service.list_stocks().await.is_empty());

    // 重试仍然是保存失败，而不是 "Stock already exists"
    let retry = service.create_stock(new_stock("Apple", "AAPL")).await;
    assert!(matches!(retry, Err(ProfitHubError::IoError(_))));
}

#[tokio::test]
async fn failed_save_keeps_deleted_and_updated_records() {
    let dir = tempfile::tempdir().unwrap();
    let service = DataService::new(unwritable_config(dir.path()), seeded_store().await, Vec::new());

    assert!(service.delete_stock("AAPL").await.is_err());
    assert!(service.get_stock("AAPL").await.is_ok());

    assert!(service
        .update_stock("AAPL", new_stock("Apple", "APPL"))
        .await
        .is_err());
    assert!(service.get_stock("APPL").await.is_err());

    assert!(service.add_price("AAPL", row(d(2000, 12, 11), 2.0)).await.is_err());
    assert!(service
        .update_price("AAPL", "12", "08", "2000", row(d(2000, 12, 8), 9.0))
        .await
        .is_err());
    assert!(service.delete_price("AAPL", "12", "08", "2000").await.is_err());

    let prices = service.list_prices("AAPL").await.unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].close, 1.0);
}

#[tokio::test]
async fn validation_errors_are_reported_before_saving() {
    let dir = tempfile::tempdir().unwrap();
    let service = DataService::new(unwritable_config(dir.path()), seeded_store().await, Vec::new());

    let result = service.add_price("AAPL", row(d(2000, 12, 8), 3.0)).await;
    assert!(matches!(result, Err(ProfitHubError::AlreadyExists(_))));
}

#[tokio::test]
async fn successful_mutations_reach_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());
    let path = config.store_path();
    let service = DataService::new(config, Arc::new(StockDataProvider::new_empty()), Vec::new());

    service.create_stock(new_stock("Apple", "AAPL")).await.unwrap();
    service.add_price("AAPL", row(d(2000, 12, 8), 1.5)).await.unwrap();

    let reloaded = StockDataProvider::load_from_file(&path).unwrap();
    let prices = reloaded.get_prices("AAPL").await.unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].close, 1.5);
}
