use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use billing_client::{
    db::{customer_queries, invoice_queries},
    domain::{Customer, Invoice, NewCustomer},
};
use serde::Deserialize;
use sqlx::PgPool;
use time::Date;

use crate::{
    error::BillingError,
    ingest::{BatchOutcome, Ingestor},
    invoice::InvoiceService,
};

/// Shared handler state. The handlers are a thin shell: every decision
/// lives in the ingest and invoice modules.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ingestor: Arc<Ingestor>,
    pub invoices: Arc<InvoiceService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/customers", post(create_customer).get(list_customers))
        .route("/customers/:customer_id/uploads", post(upload_readings))
        .route(
            "/customers/:customer_id/invoices",
            post(create_invoice).get(list_invoices),
        )
        .with_state(state)
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BillingError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            BillingError::MeterConflict { .. } => StatusCode::CONFLICT,
            BillingError::BatchParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BillingError::RenderFailure(_)
            | BillingError::StorageWriteFailure { .. }
            | BillingError::Database(_)
            | BillingError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<NewCustomer>,
) -> Result<Json<Customer>, BillingError> {
    let customer = customer_queries::insert_customer(&state.pool, &input).await?;
    Ok(Json(customer))
}

async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, BillingError> {
    Ok(Json(customer_queries::list_customers(&state.pool).await?))
}

#[derive(Deserialize)]
struct UploadParams {
    filename: String,
    meter_id: Option<i64>,
}

async fn upload_readings(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Query(params): Query<UploadParams>,
    body: String,
) -> Result<Json<BatchOutcome>, BillingError> {
    let outcome = state
        .ingestor
        .ingest(customer_id, params.meter_id, &params.filename, &body)
        .await?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct InvoiceParams {
    start: Date,
    end: Option<Date>,
}

async fn create_invoice(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Query(params): Query<InvoiceParams>,
) -> Result<Response, BillingError> {
    let bytes = state
        .invoices
        .create_invoice(customer_id, params.start, params.end)
        .await?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        bytes,
    )
        .into_response())
}

async fn list_invoices(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<Invoice>>, BillingError> {
    customer_queries::find_customer(&state.pool, customer_id)
        .await?
        .ok_or(BillingError::CustomerNotFound(customer_id))?;
    Ok(Json(
        invoice_queries::list_for_customer(&state.pool, customer_id).await?,
    ))
}
