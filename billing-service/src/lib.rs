pub mod config;
pub mod dataset;
pub mod error;
pub mod http;
pub mod ingest;
pub mod invoice;
pub mod metrics_server;
pub mod numeric;
pub mod observability;
pub mod render;
pub mod storage;

pub use error::BillingError;
pub use ingest::{BatchOutcome, Ingestor};
pub use invoice::{InvoiceService, InvoiceSummary};
