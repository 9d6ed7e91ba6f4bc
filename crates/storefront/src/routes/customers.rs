//! Customer handlers: listing, lookup, creation and purchase history.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use chinook_core::CustomerId;

use crate::api::{Customer, CustomerList, InvoiceList, PaginationParams, SearchParams};
use crate::checkout::{self, NewCustomer};
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<CustomerList>> {
    Ok(Json(state.catalog().list_customers(&params).await?))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<Customer>> {
    Ok(Json(state.catalog().get_customer(id).await?))
}

/// Create a customer. The form is validated before the backend is called.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = checkout::create_customer(state.catalog(), form).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Invoices issued to one customer.
#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<InvoiceList>> {
    Ok(Json(
        state
            .catalog()
            .customer_purchase_history(id, &params)
            .await?,
    ))
}
