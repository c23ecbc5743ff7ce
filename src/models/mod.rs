pub mod profit;
pub mod stock;
