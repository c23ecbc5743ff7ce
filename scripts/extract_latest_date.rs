use std::error::Error;
use std::path::Path;
use chrono::Datelike;
use stock_profit_hub::StockDataProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // 检查数据文件是否存在
    let arrow_path = Path::new("data/stocks.arrow");
    if !arrow_path.exists() {
        return Err("数据文件不存在，请先运行 'cargo run -- seed'".into());
    }

    let provider = StockDataProvider::load_from_file(arrow_path)?;

    match provider.get_latest_trading_date().await {
        Some(date) => {
            println!("最新交易日期: {}", date);

            // 格式化为 YYYY.M.D 版本号（移除前导零）
            println!("版本号: {}.{}.{}", date.year(), date.month(), date.day());
        }
        None => println!("未找到有效的日期"),
    }

    Ok(())
}
