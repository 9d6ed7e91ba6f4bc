//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::api::InvoiceDetail;
use crate::checkout::{self, CheckoutRequest};
use crate::error::{Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Submit the cart as an invoice. Responds 201 with the created invoice.
#[instrument(skip(state, request))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<InvoiceDetail>)> {
    let invoice = checkout::checkout(state.cart(), state.catalog(), request).await?;

    let invoice_id = invoice.invoice.invoice_id.to_string();
    add_breadcrumb(
        "checkout",
        "Invoice created",
        Some(&[("invoice_id", invoice_id.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(invoice)))
}
