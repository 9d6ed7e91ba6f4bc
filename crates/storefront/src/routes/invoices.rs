//! Invoice handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use chinook_core::InvoiceId;

use crate::api::{InvoiceDetail, InvoiceFilters, InvoiceList};
use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

/// Invoice listing filtered by customer, employee and date range.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<InvoiceFilters>,
) -> Result<Json<InvoiceList>> {
    if let (Some(start), Some(end)) = (filters.start_date, filters.end_date)
        && start > end
    {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    Ok(Json(state.catalog().list_invoices(&filters).await?))
}

/// Invoice with its line items.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<InvoiceId>,
) -> Result<Json<InvoiceDetail>> {
    Ok(Json(state.catalog().get_invoice(id).await?))
}
