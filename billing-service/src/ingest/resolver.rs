use billing_client::{
    db::{customer_queries, meter_queries},
    domain::Meter,
};
use sqlx::PgConnection;

use crate::error::BillingError;

/// Resolve the meter a batch of readings belongs to, creating one if needed.
///
/// Runs on the open batch transaction and starts by locking the customer
/// row, so concurrent uploads for the same customer cannot both create a
/// "first" meter or race on the default pointer.
///
/// With no explicit id, the customer's default meter wins; absent one, a
/// fresh meter is created and becomes the default. With an explicit id, a
/// missing meter is created under that id, a meter owned by someone else is
/// a `MeterConflict`, and in every surviving case the customer's default is
/// repointed at the explicit meter.
pub async fn resolve_meter(
    conn: &mut PgConnection,
    customer_id: i64,
    explicit_meter_id: Option<i64>,
) -> Result<Meter, BillingError> {
    let customer = customer_queries::lock_customer(conn, customer_id)
        .await?
        .ok_or(BillingError::CustomerNotFound(customer_id))?;

    match explicit_meter_id {
        None => match customer.default_meter_id {
            Some(meter_id) => Ok(meter_queries::fetch_meter(conn, meter_id).await?),
            None => {
                let meter = meter_queries::insert_meter(conn, customer.id, None).await?;
                customer_queries::set_default_meter(conn, customer.id, meter.id).await?;
                tracing::info!(
                    customer_id = customer.id,
                    meter_id = meter.id,
                    "created implicit meter and set it as default"
                );
                Ok(meter)
            }
        },
        Some(meter_id) => {
            let meter = match meter_queries::find_meter(conn, meter_id).await? {
                None => {
                    let meter = meter_queries::insert_meter_with_id(conn, meter_id, customer.id).await?;
                    tracing::info!(
                        customer_id = customer.id,
                        meter_id,
                        "adopted caller-supplied meter id"
                    );
                    meter
                }
                Some(meter) if meter.customer_id != customer.id => {
                    return Err(BillingError::MeterConflict { meter_id });
                }
                Some(meter) => meter,
            };

            // The explicit branch always repoints the default, even when the
            // meter already was the default.
            customer_queries::set_default_meter(conn, customer.id, meter.id).await?;
            Ok(meter)
        }
    }
}
