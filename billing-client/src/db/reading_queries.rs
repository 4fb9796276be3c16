use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::domain::NewReading;

/// Per-meter usage and cost sums over a time window, as returned by
/// [`meter_rollups`]. Meters with no readings in the window do not appear.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MeterRollup {
    pub meter_id: i64,
    pub serial_number: Option<String>,
    pub usage: Decimal,
    pub cost: Decimal,
}

/// Insert every reading of a batch in one multi-row statement.
///
/// Runs on the caller's transaction; the batch commits or rolls back as a
/// whole with it.
pub async fn insert_batch(
    conn: &mut PgConnection,
    meter_id: i64,
    batch_tag: &str,
    rows: &[NewReading],
) -> Result<u64, sqlx::Error> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO readings (ts, usage, price, meter_id, batch_tag) ",
    );
    builder.push_values(rows, |mut b, r| {
        b.push_bind(r.ts)
            .push_bind(r.usage)
            .push_bind(r.price)
            .push_bind(meter_id)
            .push_bind(batch_tag);
    });

    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Aggregate usage and cost per meter for one customer over `[from, to)`.
///
/// The window is half-open in event time; callers translate an inclusive
/// end date into an exclusive next-midnight bound. Sums are exact NUMERIC
/// arithmetic on the server, decoded as `Decimal`.
pub async fn meter_rollups(
    pool: &PgPool,
    customer_id: i64,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<Vec<MeterRollup>, sqlx::Error> {
    sqlx::query_as::<_, MeterRollup>(
        r#"
        SELECT
            m.id AS meter_id,
            m.serial_number,
            COALESCE(SUM(r.usage), 0) AS usage,
            COALESCE(SUM(r.usage * r.price), 0) AS cost
        FROM readings r
        JOIN meters m ON r.meter_id = m.id
        WHERE m.customer_id = $1
          AND r.ts >= $2
          AND r.ts <  $3
        GROUP BY m.id, m.serial_number
        ORDER BY m.id
        "#,
    )
    .bind(customer_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Count the readings stored under one batch tag.
pub async fn count_for_batch(pool: &PgPool, batch_tag: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM readings
        WHERE batch_tag = $1
        "#,
    )
    .bind(batch_tag)
    .fetch_one(pool)
    .await
}
