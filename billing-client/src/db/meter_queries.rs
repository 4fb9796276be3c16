use sqlx::PgConnection;

use crate::domain::Meter;

/// Look up a meter by id.
pub async fn find_meter(conn: &mut PgConnection, id: i64) -> Result<Option<Meter>, sqlx::Error> {
    sqlx::query_as::<_, Meter>(
        r#"
        SELECT id, serial_number, customer_id
        FROM meters
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Look up a meter by id, failing with `RowNotFound` if it is absent.
pub async fn fetch_meter(conn: &mut PgConnection, id: i64) -> Result<Meter, sqlx::Error> {
    sqlx::query_as::<_, Meter>(
        r#"
        SELECT id, serial_number, customer_id
        FROM meters
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_one(conn)
    .await
}

/// Create a meter with a store-assigned id.
pub async fn insert_meter(
    conn: &mut PgConnection,
    customer_id: i64,
    serial_number: Option<&str>,
) -> Result<Meter, sqlx::Error> {
    sqlx::query_as::<_, Meter>(
        r#"
        INSERT INTO meters (serial_number, customer_id)
        VALUES ($1, $2)
        RETURNING id, serial_number, customer_id
        "#,
    )
    .bind(serial_number)
    .bind(customer_id)
    .fetch_one(conn)
    .await
}

/// Create a meter with a caller-supplied id (an upload that names a meter
/// the store has never seen).
///
/// The id sequence is bumped past the adopted id afterwards so that later
/// store-assigned ids cannot collide with it.
pub async fn insert_meter_with_id(
    conn: &mut PgConnection,
    id: i64,
    customer_id: i64,
) -> Result<Meter, sqlx::Error> {
    let meter = sqlx::query_as::<_, Meter>(
        r#"
        INSERT INTO meters (id, serial_number, customer_id)
        VALUES ($1, NULL, $2)
        RETURNING id, serial_number, customer_id
        "#,
    )
    .bind(id)
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        SELECT setval(
            pg_get_serial_sequence('meters', 'id'),
            GREATEST((SELECT MAX(id) FROM meters), 1)
        )
        "#,
    )
    .execute(conn)
    .await?;

    Ok(meter)
}
