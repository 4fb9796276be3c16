use serde::{Deserialize, Serialize};

/// A physical or virtual usage meter.
///
/// The serial number may be unset for meters created implicitly during
/// ingestion, pending reconciliation with the field inventory.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meter {
    pub id: i64,
    pub serial_number: Option<String>,
    pub customer_id: i64,
}
