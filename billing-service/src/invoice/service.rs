use std::sync::Arc;

use billing_client::{db::invoice_queries, domain::NewInvoice};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use crate::{error::BillingError, render::InvoiceRenderer, storage, storage::DocumentStore};

use super::aggregate;

/// Orchestrates invoice creation: aggregate, persist the invoice row,
/// render, write the document, attach its location.
///
/// The invoice row is committed before rendering starts. If rendering or
/// the document write fails, the row survives with an empty document path
/// and can be re-rendered from its stored totals; the error still reaches
/// the caller.
pub struct InvoiceService {
    pool: PgPool,
    renderer: Arc<dyn InvoiceRenderer>,
    store: Arc<dyn DocumentStore>,
}

impl InvoiceService {
    pub fn new(pool: PgPool, renderer: Arc<dyn InvoiceRenderer>, store: Arc<dyn DocumentStore>) -> Self {
        Self { pool, renderer, store }
    }

    pub async fn create_invoice(
        &self,
        customer_id: i64,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<u8>, BillingError> {
        let summary = aggregate::compute_summary(&self.pool, customer_id, start, end).await?;

        let invoice = invoice_queries::insert_invoice(
            &self.pool,
            &NewInvoice {
                customer_id,
                created_at: OffsetDateTime::now_utc(),
                period_start: summary.period_start,
                period_end: summary.period_end,
                total_usage: summary.total_usage,
                total_cost: summary.total_cost,
            },
        )
        .await?;
        metrics::counter!("invoices_created_total").increment(1);

        let bytes = match self.renderer.render(&invoice, &summary) {
            Ok(bytes) => bytes,
            Err(e) => {
                metrics::counter!("invoice_render_failures_total").increment(1);
                tracing::warn!(
                    invoice_id = invoice.id,
                    error = %e,
                    "rendering failed; invoice row kept without a document"
                );
                return Err(e);
            }
        };

        let key = storage::document_key(
            customer_id,
            summary.period_end.year(),
            invoice.id,
            self.renderer.extension(),
        );
        let location = match self.store.write(&key, &bytes).await {
            Ok(location) => location,
            Err(e) => {
                metrics::counter!("invoice_document_write_failures_total").increment(1);
                tracing::warn!(
                    invoice_id = invoice.id,
                    key = %key,
                    error = %e,
                    "document write failed; invoice row kept without a document"
                );
                return Err(e);
            }
        };

        invoice_queries::set_document_path(&self.pool, invoice.id, &location).await?;

        tracing::info!(
            invoice_id = invoice.id,
            customer_id,
            document = %location,
            total_cost = %invoice.total_cost,
            "invoice created"
        );

        Ok(bytes)
    }
}
