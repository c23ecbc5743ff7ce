#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use stock_profit_hub::config::Config;
use stock_profit_hub::server::build_router;
use stock_profit_hub::services::DataService;
use stock_profit_hub::StockDataProvider;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub service: Arc<DataService>,
    pub dir: TempDir,
}

pub fn config_in(dir: &Path) -> Config {
    Config::new()
        .with_data_dir(dir.join("data").to_str().unwrap())
        .with_csv_dir(dir.join("csv_files").to_str().unwrap())
}

/// Empty catalog, no seed sources, nothing written to disk.
pub fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_autosave(false);
    let service = Arc::new(DataService::new(
        config,
        Arc::new(StockDataProvider::new_empty()),
        Vec::new(),
    ));

    TestApp {
        router: build_router(service.clone()),
        service,
        dir,
    }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn create_stock(router: &Router, name: &str, ticker: &str) {
    let (status, _) = send(
        router,
        Method::POST,
        "/stocks",
        Some(json!({ "name": name, "ticker": ticker, "inception_date": "1990-01-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

pub fn price_body(date: &str, close: f64) -> Value {
    json!({
        "date": date,
        "open": close,
        "high": close,
        "low": close,
        "close": close,
        "adj_close": close,
        "volume": 1000
    })
}

/// Add one close per `(YYYY-MM-DD, close)` pair.
pub async fn add_closes(router: &Router, ticker: &str, closes: &[(&str, f64)]) {
    for (date, close) in closes {
        let uri = format!("/prices/{}", ticker);
        let (status, _) = send(router, Method::POST, &uri, Some(price_body(date, *close))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

pub async fn profit(router: &Router, ticker: &str, start: &str, end: &str) -> (StatusCode, Value) {
    send(
        router,
        Method::POST,
        "/profit",
        Some(json!({ "ticker": ticker, "start_date": start, "end_date": end })),
    )
    .await
}

pub fn detail(value: &Value) -> &str {
    value["detail"].as_str().unwrap_or_default()
}
