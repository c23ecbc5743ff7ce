use crate::errors::Result;
use crate::models::stock::{NewStock, NewStockPrice};
use crate::sources::base::PriceSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 内置的公司列表: (name, ticker, inception_date)
pub const DEFAULT_COMPANIES: [(&str, &str, &str); 5] = [
    ("Amazon", "AMZN", "1997-05-15"),
    ("Apple", "AAPL", "1976-04-01"),
    ("Facebook", "META", "2004-02-04"),
    ("Google", "GOOGL", "1998-09-04"),
    ("Netflix", "NFLX", "1997-08-29"),
];

const REQUIRED_COLUMNS: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    /// Rows with any missing value are dropped.
    fn into_price(self) -> Option<NewStockPrice> {
        let date = NaiveDate::parse_from_str(self.date?.trim(), "%Y-%m-%d").ok()?;
        Some(NewStockPrice {
            date,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            adj_close: self.adj_close?,
            volume: self.volume? as i64,
        })
    }
}

/// Reads `<dir>/<Company Name>.csv` files exported from a quote site.
pub struct CsvDirectorySource {
    dir: PathBuf,
    companies: Vec<NewStock>,
}

impl CsvDirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let companies = DEFAULT_COMPANIES
            .iter()
            .map(|(name, ticker, inception)| {
                Ok(NewStock {
                    name: name.to_string(),
                    ticker: ticker.to_string(),
                    inception_date: NaiveDate::parse_from_str(inception, "%Y-%m-%d")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_companies(dir, companies))
    }

    pub fn with_companies(dir: impl AsRef<Path>, companies: Vec<NewStock>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            companies,
        }
    }

    fn csv_path(&self, company_name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", company_name))
    }

    /// Stems of the `.csv` files in the directory.
    fn csv_stems(&self) -> Result<Vec<String>> {
        let mut stems = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
        stems.sort();
        Ok(stems)
    }

    fn read_prices(path: &Path) -> Result<Vec<NewStockPrice>> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            error!("CSV file {} is missing required columns: {:?}", path.display(), missing);
            return Ok(Vec::new());
        }

        let mut prices = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<CsvRow>() {
            match row?.into_price() {
                Some(price) => prices.push(price),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("Dropped {} incomplete rows from {}", dropped, path.display());
        }
        Ok(prices)
    }
}

#[async_trait]
impl PriceSource for CsvDirectorySource {
    fn source_name(&self) -> &'static str {
        "CSV"
    }

    async fn fetch_stock_list(&self) -> Result<Vec<NewStock>> {
        if self.dir.is_dir() {
            for stem in self.csv_stems()? {
                if !self.companies.iter().any(|c| c.name == stem) {
                    warn!("Skipping {}.csv: no company named '{}'", stem, stem);
                }
            }
        } else {
            warn!("CSV directory {} not found, stocks will have no prices", self.dir.display());
        }
        Ok(self.companies.clone())
    }

    async fn fetch_stock_history(&self, stock: &NewStock) -> Result<Vec<NewStockPrice>> {
        let path = self.csv_path(&stock.name);
        if !path.is_file() {
            return Ok(Vec::new());
        }

        info!("Importing data for {} from {}...", stock.name, path.display());
        Self::read_prices(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n";

    #[tokio::test]
    async fn default_companies_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(dir.path()).unwrap();

        let tickers: Vec<String> = source
            .fetch_stock_list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.ticker)
            .collect();
        assert_eq!(tickers, vec!["AMZN", "AAPL", "META", "GOOGL", "NFLX"]);
    }

    #[tokio::test]
    async fn incomplete_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Apple.csv"),
            format!(
                "{}2000-12-08,1,2,0.5,1.5,1.4,100\n2000-12-11,1,2,,1.6,1.5,100\n2000-12-12,1,2,0.5,null,1.5,100\n2000-12-13,1,2,0.5,1.7,1.6,200.0\n",
                HEADER
            ),
        )
        .unwrap();
        let source = CsvDirectorySource::new(dir.path()).unwrap();
        let apple = source.fetch_stock_list().await.unwrap().remove(1);

        let prices = source.fetch_stock_history(&apple).await.unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].close, 1.5);
        assert_eq!(prices[1].date, NaiveDate::from_ymd_opt(2000, 12, 13).unwrap());
        assert_eq!(prices[1].volume, 200);
    }

    #[tokio::test]
    async fn file_missing_columns_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Amazon.csv"), "Date,Open,Close\n2000-12-08,1,2\n").unwrap();
        let source = CsvDirectorySource::new(dir.path()).unwrap();
        let amazon = source.fetch_stock_list().await.unwrap().remove(0);

        assert!(source.fetch_stock_history(&amazon).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn company_without_file_has_no_history() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a csv").unwrap();
        let source = CsvDirectorySource::new(dir.path()).unwrap();
        let netflix = source.fetch_stock_list().await.unwrap().remove(4);

        assert!(source.fetch_stock_history(&netflix).await.unwrap().is_empty());
    }
}
