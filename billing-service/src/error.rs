/// Why a single dataset row was rejected.
#[derive(thiserror::Error, Debug)]
pub enum RowParseError {
    #[error("invalid numeric value '{0}'")]
    InvalidNumericFormat(String),
    #[error("invalid timestamp '{0}'")]
    InvalidTimestampFormat(String),
    #[error("expected 3 columns (timestamp;usage;price), found {0}")]
    WrongColumnCount(usize),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Failure taxonomy of the ingestion-to-invoice pipeline.
///
/// Every kind is distinguishable to the caller; nothing is swallowed.
/// `BatchParse` aborts the whole upload before any row is persisted, and
/// `RenderFailure`/`StorageWriteFailure` leave behind an invoice row without
/// a document path, which the caller may re-render later.
#[derive(thiserror::Error, Debug)]
pub enum BillingError {
    #[error("customer {0} not found")]
    CustomerNotFound(i64),
    #[error("meter {meter_id} is registered to another customer")]
    MeterConflict { meter_id: i64 },
    #[error("batch rejected at row {row} ('{raw}'): {source}")]
    BatchParse {
        row: usize,
        raw: String,
        #[source]
        source: RowParseError,
    },
    #[error("invoice rendering failed: {0}")]
    RenderFailure(String),
    #[error("document write failed for '{key}': {source}")]
    StorageWriteFailure {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
