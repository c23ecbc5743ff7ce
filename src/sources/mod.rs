pub mod base;
pub mod csv_dir;

pub use base::PriceSource;
pub use csv_dir::CsvDirectorySource;
