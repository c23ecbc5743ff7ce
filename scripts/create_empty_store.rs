use std::path::PathBuf;
use stock_profit_hub::util::arrow_utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // 默认输出到 data/stocks.arrow，可通过第一个参数覆盖
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/stocks.arrow"));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 写入不含任何股票的快照，schema 与服务读取的一致
    arrow_utils::save_stock_data_to_arrow(&[], &path)?;

    println!("Created empty stock store at {}", path.display());
    Ok(())
}
