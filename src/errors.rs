use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfitHubError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    ArrowError(String),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    /// Caller-supplied date strings that do not match `MM/DD/YYYY`.
    #[error("Date has wrong format")]
    InvalidDateFormat,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ProfitHubError>;

impl ProfitHubError {
    pub fn stock_not_found() -> Self {
        ProfitHubError::NotFound("Stock not found".to_string())
    }
}

impl From<arrow::error::ArrowError> for ProfitHubError {
    fn from(e: arrow::error::ArrowError) -> Self {
        ProfitHubError::ArrowError(e.to_string())
    }
}

// 用于从字符串创建错误
impl From<String> for ProfitHubError {
    fn from(s: String) -> Self {
        ProfitHubError::Unknown(s)
    }
}

impl From<&str> for ProfitHubError {
    fn from(s: &str) -> Self {
        ProfitHubError::Unknown(s.to_string())
    }
}
