//! Display formatting: plain numbers (`num`) and currency-aware prices (`price`).

pub mod num;
pub mod price;

pub use price::{format_axis_label, format_large_number, format_percent, format_price};
