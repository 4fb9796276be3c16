pub mod customer_queries;
pub mod invoice_queries;
pub mod meter_queries;
pub mod reading_queries;

pub use reading_queries::MeterRollup;
