use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// A computed invoice over a closed billing period.
///
/// Invoices are an append-only audit trail: recomputing the same period
/// creates a new row instead of overwriting. `document_path` is attached
/// once the rendered document has been written; it stays `None` if
/// rendering or the document write failed after the row was created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i64,
    pub customer_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub period_start: Date,
    pub period_end: Date,
    pub total_usage: Decimal,
    pub total_cost: Decimal,
    pub document_path: Option<String>,
}

/// Input for persisting a freshly computed invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub customer_id: i64,
    pub created_at: OffsetDateTime,
    pub period_start: Date,
    pub period_end: Date,
    pub total_usage: Decimal,
    pub total_cost: Decimal,
}
