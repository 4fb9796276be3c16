use std::path::PathBuf;

use crate::error::BillingError;

/// Durable home for rendered invoice documents.
///
/// Keys are hierarchical (`customer/year/invoice.ext`); implementations
/// create missing intermediate containers. `write` returns the resolved
/// location that gets stored on the invoice row.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<String, BillingError>;
}

/// Build the document key for an invoice: `{customer}/{year}/{invoice}.{ext}`.
pub fn document_key(customer_id: i64, year: i32, invoice_id: i64, extension: &str) -> String {
    format!("{customer_id}/{year}/{invoice_id}.{extension}")
}

/// Filesystem-backed store rooted at the configured invoice directory.
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<String, BillingError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| BillingError::StorageWriteFailure {
                    key: key.to_string(),
                    source,
                })?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| BillingError::StorageWriteFailure {
                key: key.to_string(),
                source,
            })?;

        Ok(path.display().to_string())
    }
}
