use chrono::NaiveDate;
use crate::errors::{ProfitHubError, Result};

/// Date format used by the profit API and price routes
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse `MM/DD/YYYY`; anything else is `InvalidDateFormat`.
pub fn parse_us_date(date_str: &str) -> Result<NaiveDate> {
    // chrono 的 %Y 接受任意位数年份，这里要求恰好四位
    let year = date_str.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProfitHubError::InvalidDateFormat);
    }
    NaiveDate::parse_from_str(date_str, US_DATE_FORMAT).map_err(|_| ProfitHubError::InvalidDateFormat)
}

/// 路由中的日期由 month/day/year 三段组成
pub fn parse_path_date(month: &str, day: &str, year: &str) -> Result<NaiveDate> {
    parse_us_date(&format!("{}/{}/{}", month, day, year))
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

// Arrow Date32: days since 1970-01-01
pub fn naive_date_to_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

pub fn days_to_naive_date(days: i32) -> Result<NaiveDate> {
    epoch()
        .checked_add_signed(chrono::Duration::days(days as i64))
        .ok_or_else(|| ProfitHubError::DataError(format!("Invalid date32 value: {}", days)))
}

// Arrow数据转换工具
pub mod arrow_utils {
    use super::*;
    use crate::models::stock::{Stock, StockData, StockPrice};
    use arrow::array::{ArrayRef, StringBuilder};
    use arrow::datatypes::{DataType, Field, Fields, Schema};
    use arrow::ipc::reader::FileReader;
    use arrow::ipc::writer::FileWriter;
    use arrow::record_batch::RecordBatch;
    use arrow_array::{Array, Date32Array, Float64Array, Int64Array, ListArray, StringArray, StructArray};
    use log::info;
    use std::fs::File;
    use std::io::{Cursor, Read, Seek};
    use std::path::Path;
    use std::sync::Arc;

    fn price_fields() -> Fields {
        Fields::from(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("date", DataType::Date32, false),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("adj_close", DataType::Float64, false),
            Field::new("volume", DataType::Int64, false),
        ])
    }

    pub fn stock_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("ticker", DataType::Utf8, false),
            Field::new("inception_date", DataType::Date32, false),
            Field::new(
                "prices",
                DataType::List(Arc::new(Field::new("item", DataType::Struct(price_fields()), false))),
                true,
            ),
        ])
    }

    // 将股票数据转换为Arrow记录批次
    pub fn stock_data_to_record_batch(data: &[StockData]) -> Result<RecordBatch> {
        let mut name_builder = StringBuilder::new();
        let mut ticker_builder = StringBuilder::new();
        let mut ids = Vec::with_capacity(data.len());
        let mut inception_dates = Vec::with_capacity(data.len());

        let mut price_ids = Vec::new();
        let mut dates = Vec::new();
        let mut opens = Vec::new();
        let mut highs = Vec::new();
        let mut lows = Vec::new();
        let mut closes = Vec::new();
        let mut adj_closes = Vec::new();
        let mut volumes = Vec::new();
        let mut offsets = vec![0i32];

        for entry in data {
            ids.push(entry.stock.id);
            name_builder.append_value(&entry.stock.name);
            ticker_builder.append_value(&entry.stock.ticker);
            inception_dates.push(naive_date_to_days(entry.stock.inception_date));

            for price in &entry.prices {
                price_ids.push(price.id);
                dates.push(naive_date_to_days(price.date));
                opens.push(price.open);
                highs.push(price.high);
                lows.push(price.low);
                closes.push(price.close);
                adj_closes.push(price.adj_close);
                volumes.push(price.volume);
            }

            let last = offsets.last().copied().unwrap_or(0);
            offsets.push(last + entry.prices.len() as i32);
        }

        let fields = price_fields();
        let price_columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(price_ids)),
            Arc::new(Date32Array::from(dates)),
            Arc::new(Float64Array::from(opens)),
            Arc::new(Float64Array::from(highs)),
            Arc::new(Float64Array::from(lows)),
            Arc::new(Float64Array::from(closes)),
            Arc::new(Float64Array::from(adj_closes)),
            Arc::new(Int64Array::from(volumes)),
        ];
        let struct_array = StructArray::try_new(fields.clone(), price_columns, None)?;

        let list_array = ListArray::try_new(
            Arc::new(Field::new("item", DataType::Struct(fields), false)),
            arrow::buffer::OffsetBuffer::new(arrow::buffer::ScalarBuffer::from(offsets)),
            Arc::new(struct_array),
            None,
        )?;

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(name_builder.finish()),
            Arc::new(ticker_builder.finish()),
            Arc::new(Date32Array::from(inception_dates)),
            Arc::new(list_array),
        ];

        Ok(RecordBatch::try_new(Arc::new(stock_schema()), columns)?)
    }

    fn column<'a, T: 'static>(batch: &'a RecordBatch, idx: usize, name: &str) -> Result<&'a T> {
        batch
            .column(idx)
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ProfitHubError::ArrowError(format!("Failed to downcast {} column", name)))
    }

    fn price_column<'a, T: 'static>(prices: &'a StructArray, name: &str) -> Result<&'a T> {
        prices
            .column_by_name(name)
            .and_then(|a| a.as_any().downcast_ref::<T>())
            .ok_or_else(|| ProfitHubError::ArrowError(format!("Missing price column {}", name)))
    }

    fn read_prices(stock_id: i64, prices: &StructArray) -> Result<Vec<StockPrice>> {
        let id_array = price_column::<Int64Array>(prices, "id")?;
        let date_array = price_column::<Date32Array>(prices, "date")?;
        let open_array = price_column::<Float64Array>(prices, "open")?;
        let high_array = price_column::<Float64Array>(prices, "high")?;
        let low_array = price_column::<Float64Array>(prices, "low")?;
        let close_array = price_column::<Float64Array>(prices, "close")?;
        let adj_close_array = price_column::<Float64Array>(prices, "adj_close")?;
        let volume_array = price_column::<Int64Array>(prices, "volume")?;

        (0..prices.len())
            .map(|j| {
                Ok(StockPrice {
                    id: id_array.value(j),
                    stock_id,
                    date: days_to_naive_date(date_array.value(j))?,
                    open: open_array.value(j),
                    high: high_array.value(j),
                    low: low_array.value(j),
                    close: close_array.value(j),
                    adj_close: adj_close_array.value(j),
                    volume: volume_array.value(j),
                })
            })
            .collect()
    }

    fn read_stock_data<R: Read + Seek>(reader: R) -> Result<Vec<StockData>> {
        let reader = FileReader::try_new(reader, None)?;
        let mut result = Vec::new();

        for batch in reader {
            let batch = batch?;

            let id_array = column::<Int64Array>(&batch, 0, "id")?;
            let name_array = column::<StringArray>(&batch, 1, "name")?;
            let ticker_array = column::<StringArray>(&batch, 2, "ticker")?;
            let inception_array = column::<Date32Array>(&batch, 3, "inception_date")?;
            let prices_array = column::<ListArray>(&batch, 4, "prices")?;

            for i in 0..batch.num_rows() {
                let stock = Stock {
                    id: id_array.value(i),
                    name: name_array.value(i).to_string(),
                    ticker: ticker_array.value(i).to_string(),
                    inception_date: days_to_naive_date(inception_array.value(i))?,
                };

                let prices = if prices_array.is_null(i) {
                    Vec::new()
                } else {
                    let list = prices_array.value(i);
                    let price_struct = list
                        .as_any()
                        .downcast_ref::<StructArray>()
                        .ok_or_else(|| ProfitHubError::ArrowError("Failed to downcast price struct".to_string()))?;
                    read_prices(stock.id, price_struct)?
                };

                result.push(StockData { stock, prices });
            }
        }

        Ok(result)
    }

    // 从Arrow文件读取股票数据
    pub fn read_stock_data_from_arrow(path: &Path) -> Result<Vec<StockData>> {
        read_stock_data(File::open(path)?)
    }

    // 从内存中读取Arrow数据
    pub fn read_stock_data_from_memory(data: &[u8]) -> Result<Vec<StockData>> {
        read_stock_data(Cursor::new(data))
    }

    // 将股票数据保存到Arrow文件
    pub fn save_stock_data_to_arrow(data: &[StockData], path: &Path) -> Result<()> {
        let total_prices: usize = data.iter().map(|s| s.prices.len()).sum();
        info!(
            "Saving {} stocks ({} price records) to {}",
            data.len(),
            total_prices,
            path.display()
        );

        let batch = stock_data_to_record_batch(data)?;
        let file = File::create(path)?;

        let mut writer = FileWriter::try_new(file, &batch.schema())?;
        writer.write(&batch)?;
        writer.finish()?;

        Ok(())
    }
}
