use sqlx::{PgConnection, PgPool};

use crate::domain::{Customer, NewCustomer};

/// Register a new customer.
pub async fn insert_customer(pool: &PgPool, input: &NewCustomer) -> Result<Customer, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (name, address, email)
        VALUES ($1, $2, $3)
        RETURNING id, name, address, email, default_meter_id
        "#,
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(&input.email)
    .fetch_one(pool)
    .await
}

/// Look up a customer by id.
pub async fn find_customer(pool: &PgPool, id: i64) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, address, email, default_meter_id
        FROM customers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List all customers, oldest first.
pub async fn list_customers(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, address, email, default_meter_id
        FROM customers
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Look up a customer inside a transaction and take a row lock on it.
///
/// Concurrent uploads for the same customer serialize on this lock, so only
/// one of them can create the first meter and point the default at it.
pub async fn lock_customer(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, address, email, default_meter_id
        FROM customers
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Point the customer's default meter at `meter_id`.
pub async fn set_default_meter(
    conn: &mut PgConnection,
    customer_id: i64,
    meter_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE customers
        SET default_meter_id = $2
        WHERE id = $1
        "#,
    )
    .bind(customer_id)
    .bind(meter_id)
    .execute(conn)
    .await
    .map(|_| ())
}
