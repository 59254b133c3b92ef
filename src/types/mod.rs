pub mod data_source;
pub mod date_range;
pub mod error;
pub mod frames;
pub mod period;
pub mod records;
pub mod table_kind;
