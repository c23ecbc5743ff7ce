mod common;

use std::fs;
use std::sync::Arc;
use stock_profit_hub::models::profit::ProfitRequest;
use stock_profit_hub::services::DataService;
use stock_profit_hub::sources::{CsvDirectorySource, PriceSource};

const APPLE_CSV: &str = "Date,Open,High,Low,Close,Adj Close,Volume
2000-12-08,0.5,0.6,0.4,10.0,9.0,1000
2000-12-11,0.5,0.6,0.4,12.0,11.0,1000
2000-12-12,0.5,0.6,0.4,,7.0,1000
2000-12-13,0.5,0.6,0.4,8.0,7.0,1000
2000-12-14,0.5,0.6,0.4,14.0,13.0,1000
";

fn sources(config: &stock_profit_hub::config::Config) -> Vec<Arc<dyn PriceSource + Send + Sync>> {
    vec![Arc::new(CsvDirectorySource::new(&config.csv_dir).unwrap())]
}

#[tokio::test]
async fn first_open_seeds_from_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());
    fs::create_dir_all(&config.csv_dir).unwrap();
    fs::write(dir.path().join("csv_files").join("Apple.csv"), APPLE_CSV).unwrap();
    fs::write(dir.path().join("csv_files").join("Unknown Corp.csv"), APPLE_CSV).unwrap();

    let srcs = sources(&config);
    let service = DataService::open(config, srcs).await.unwrap();
    assert!(service.data_path().exists());

    let tickers: Vec<String> = service.list_stocks().await.into_iter().map(|s| s.ticker).collect();
    assert_eq!(tickers, vec!["AMZN", "AAPL", "META", "GOOGL", "NFLX"]);

    let prices = service.list_prices("AAPL").await.unwrap();
    assert_eq!(prices.len(), 4);
    assert!(service.list_prices("AMZN").await.unwrap().is_empty());

    let report = service
        .profit(&ProfitRequest {
            ticker: "AAPL".to_string(),
            start_date: "12/08/2000".to_string(),
            end_date: "12/14/2000".to_string(),
        })
        .await
        .unwrap();
    let main = report.analysis.main.trade().copied().unwrap();
    assert_eq!(main.profit, 6.0);
    assert_eq!(main.max_multi_trade_profit, 8.0);
}

#[tokio::test]
async fn existing_store_is_not_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());
    fs::create_dir_all(&config.csv_dir).unwrap();
    fs::write(dir.path().join("csv_files").join("Apple.csv"), APPLE_CSV).unwrap();

    let srcs = sources(&config);
    let service = DataService::open(config, srcs).await.unwrap();
    service.delete_stock("NFLX").await.unwrap();
    drop(service);

    let config = common::config_in(dir.path());
    let srcs = sources(&config);
    let reopened = DataService::open(config, srcs).await.unwrap();

    let tickers: Vec<String> = reopened.list_stocks().await.into_iter().map(|s| s.ticker).collect();
    assert_eq!(tickers, vec!["AMZN", "AAPL", "META", "GOOGL"]);
    assert_eq!(reopened.list_prices("AAPL").await.unwrap().len(), 4);
}

#[tokio::test]
async fn missing_csv_directory_still_catalogs_companies() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());

    let srcs = sources(&config);
    let service = DataService::open(config, srcs).await.unwrap();
    assert_eq!(service.list_stocks().await.len(), 5);
    assert!(service.list_prices("GOOGL").await.unwrap().is_empty());
}

#[tokio::test]
async fn seeding_twice_skips_known_tickers() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_in(dir.path());
    fs::create_dir_all(&config.csv_dir).unwrap();
    fs::write(dir.path().join("csv_files").join("Apple.csv"), APPLE_CSV).unwrap();

    let srcs = sources(&config);
    let service = DataService::open(config, srcs).await.unwrap();
    assert_eq!(service.seed().await.unwrap(), 0);
    assert_eq!(service.list_prices("AAPL").await.unwrap().len(), 4);
}
