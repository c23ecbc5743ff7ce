// 公开导出的模块，供外部使用
pub mod models;
pub mod data_provider;
pub mod errors;
pub mod profit;

// 为了支持主程序，保持这些模块公开
// 但在库使用场景中，这些应该是内部模块
#[doc(hidden)]
pub mod sources;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod services;
#[doc(hidden)]
pub mod server;
#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::stock::{Stock, StockData, StockPrice};
pub use models::profit::{ProfitReport, ProfitRequest};
pub use data_provider::{PriceSeriesProvider, StockDataProvider};
pub use profit::ProfitEngine;
pub use services::DataService;
pub use errors::{Result, ProfitHubError};
