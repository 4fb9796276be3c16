pub mod resolver;

use std::path::PathBuf;

use billing_client::db::{customer_queries, reading_queries};
use sqlx::PgPool;

use crate::{dataset, error::BillingError};

/// What a successful upload produced: the tag stored on every reading of
/// the batch, and how many rows went in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchOutcome {
    pub batch_tag: String,
    pub rows_inserted: usize,
}

/// Ingests one uploaded reading dataset per call.
pub struct Ingestor {
    pool: PgPool,
    upload_dir: PathBuf,
}

impl Ingestor {
    pub fn new<P: Into<PathBuf>>(pool: PgPool, upload_dir: P) -> Self {
        Self {
            pool,
            upload_dir: upload_dir.into(),
        }
    }

    /// Ingest a raw `;`-delimited dataset for a customer.
    ///
    /// The upload artifact lands on disk under its batch tag before parsing
    /// starts; rejected batches stay inspectable there. The dataset is
    /// parsed completely before the store is touched, and meter resolution
    /// plus the multi-row insert share one transaction: a batch is either
    /// fully visible or not at all.
    pub async fn ingest(
        &self,
        customer_id: i64,
        explicit_meter_id: Option<i64>,
        filename: &str,
        raw: &str,
    ) -> Result<BatchOutcome, BillingError> {
        customer_queries::find_customer(&self.pool, customer_id)
            .await?
            .ok_or(BillingError::CustomerNotFound(customer_id))?;

        let batch_tag = batch_tag(filename, raw.as_bytes());

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(self.upload_dir.join(&batch_tag), raw).await?;

        let rows = match dataset::parse_dataset(raw) {
            Ok(rows) => rows,
            Err(e) => {
                metrics::counter!("batch_parse_rejected_total").increment(1);
                tracing::warn!(customer_id, batch_tag = %batch_tag, error = %e, "batch rejected");
                return Err(e);
            }
        };

        let mut tx = self.pool.begin().await?;
        let meter = resolver::resolve_meter(&mut tx, customer_id, explicit_meter_id).await?;
        reading_queries::insert_batch(&mut tx, meter.id, &batch_tag, &rows).await?;
        tx.commit().await?;

        metrics::counter!("readings_ingested_total").increment(rows.len() as u64);
        tracing::info!(
            customer_id,
            meter_id = meter.id,
            batch_tag = %batch_tag,
            rows = rows.len(),
            "batch ingested"
        );

        Ok(BatchOutcome {
            batch_tag,
            rows_inserted: rows.len(),
        })
    }
}

/// Derive the batch tag for an upload: an 8-character content-derived token
/// plus the original filename. The same bytes always produce the same tag,
/// which keeps re-uploads traceable to one another.
pub fn batch_tag(filename: &str, content: &[u8]) -> String {
    let digest = blake3::hash(content);
    format!("{}_{}", &digest.to_hex()[..8], filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_tag_is_token_plus_filename() {
        let tag = batch_tag("readings.csv", b"timestamp;usage;price\n");
        let (token, name) = tag.split_once('_').unwrap();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(name, "readings.csv");
    }

    #[test]
    fn batch_tag_is_stable_for_identical_content() {
        assert_eq!(
            batch_tag("a.csv", b"same bytes"),
            batch_tag("a.csv", b"same bytes")
        );
        assert_ne!(
            batch_tag("a.csv", b"same bytes"),
            batch_tag("a.csv", b"other bytes")
        );
    }
}
