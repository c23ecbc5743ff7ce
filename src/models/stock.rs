use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 股票基本信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    pub inception_date: NaiveDate,
}

/// Payload for creating or replacing a stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStock {
    pub name: String,
    pub ticker: String,
    pub inception_date: NaiveDate,
}

/// 日线数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub id: i64,
    pub stock_id: i64,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockPrice {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// The only part of a daily record the profit engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl Stock {
    pub fn from_new(id: i64, new: NewStock) -> Self {
        Self {
            id,
            name: new.name,
            ticker: new.ticker,
            inception_date: new.inception_date,
        }
    }
}

impl StockPrice {
    pub fn from_new(id: i64, stock_id: i64, new: NewStockPrice) -> Self {
        Self {
            id,
            stock_id,
            date: new.date,
            open: new.open,
            high: new.high,
            low: new.low,
            close: new.close,
            adj_close: new.adj_close,
            volume: new.volume,
        }
    }

    /// 用新数据覆盖，保留 id 和 stock_id
    pub fn apply(&mut self, new: NewStockPrice) {
        self.date = new.date;
        self.open = new.open;
        self.high = new.high;
        self.low = new.low;
        self.close = new.close;
        self.adj_close = new.adj_close;
        self.volume = new.volume;
    }

    pub fn point(&self) -> PricePoint {
        PricePoint {
            date: self.date,
            close: self.close,
        }
    }
}

/// Stock together with its price history, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockData {
    pub stock: Stock,
    pub prices: Vec<StockPrice>,
}
