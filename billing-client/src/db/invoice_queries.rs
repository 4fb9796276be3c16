use sqlx::PgPool;

use crate::domain::{Invoice, NewInvoice};

/// Persist a freshly computed invoice. The document path starts out unset
/// and is attached separately once rendering has succeeded.
pub async fn insert_invoice(pool: &PgPool, input: &NewInvoice) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices
            (customer_id, created_at, period_start, period_end, total_usage, total_cost)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, customer_id, created_at, period_start, period_end,
                  total_usage, total_cost, document_path
        "#,
    )
    .bind(input.customer_id)
    .bind(input.created_at)
    .bind(input.period_start)
    .bind(input.period_end)
    .bind(input.total_usage)
    .bind(input.total_cost)
    .fetch_one(pool)
    .await
}

/// Attach the rendered document location to an invoice.
pub async fn set_document_path(
    pool: &PgPool,
    invoice_id: i64,
    document_path: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE invoices
        SET document_path = $2
        WHERE id = $1
        "#,
    )
    .bind(invoice_id)
    .bind(document_path)
    .execute(pool)
    .await
    .map(|_| ())
}

/// List a customer's invoices, newest first.
pub async fn list_for_customer(
    pool: &PgPool,
    customer_id: i64,
) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, customer_id, created_at, period_start, period_end,
               total_usage, total_cost, document_path
        FROM invoices
        WHERE customer_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await
}
