use billing_client::db::{customer_queries, reading_queries};
use sqlx::PgPool;
use time::Date;

use crate::error::BillingError;

use super::{build_summary, period_window, resolve_period_end, InvoiceSummary};

/// Aggregate usage and cost per meter for one customer over the inclusive
/// `[start, end]` period. When `end` is `None` it defaults to the last day
/// of `start`'s month.
///
/// This is a pure read over a store snapshot: no side effects, identical
/// results for identical inputs as long as the readings are unchanged.
/// Meters with no readings in the period are omitted; a customer with no
/// matching readings at all gets an empty meter list and zero totals.
pub async fn compute_summary(
    pool: &PgPool,
    customer_id: i64,
    start: Date,
    end: Option<Date>,
) -> Result<InvoiceSummary, BillingError> {
    let customer = customer_queries::find_customer(pool, customer_id)
        .await?
        .ok_or(BillingError::CustomerNotFound(customer_id))?;

    let period_end = resolve_period_end(start, end);
    let (from, to) = period_window(start, period_end);

    let meters = reading_queries::meter_rollups(pool, customer_id, from, to).await?;

    tracing::debug!(
        customer_id,
        %start,
        end = %period_end,
        meters = meters.len(),
        "computed invoice summary"
    );

    Ok(build_summary(customer, start, period_end, meters))
}
