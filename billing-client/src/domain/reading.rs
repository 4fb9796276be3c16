use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single timestamped usage/price observation attributed to one meter.
///
/// `ts` is the event time of the measurement, not the ingestion time.
/// `batch_tag` identifies the upload the reading came from. Readings are
/// immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub usage: Decimal,
    pub price: Decimal,
    pub meter_id: i64,
    pub batch_tag: String,
}

/// A parsed reading that has not been persisted yet. The meter and batch tag
/// are supplied by the ingestor at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub ts: OffsetDateTime,
    pub usage: Decimal,
    pub price: Decimal,
}
