use std::sync::Arc;

use anyhow::Result;
use billing_service::{
    config::AppConfig,
    http::{self, AppState},
    ingest::Ingestor,
    invoice::InvoiceService,
    metrics_server, observability,
    render::HtmlRenderer,
    storage::FsDocumentStore,
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let ingestor = Arc::new(Ingestor::new(pool.clone(), &cfg.storage.upload_dir));
    let invoices = Arc::new(InvoiceService::new(
        pool.clone(),
        Arc::new(HtmlRenderer),
        Arc::new(FsDocumentStore::new(&cfg.storage.invoice_dir)),
    ));

    let app = http::router(AppState {
        pool,
        ingestor,
        invoices,
    });

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr).await?;
    tracing::info!(addr = %cfg.http.bind_addr, "billing service listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
