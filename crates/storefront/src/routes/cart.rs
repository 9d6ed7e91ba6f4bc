//! Cart route handlers.
//!
//! The cart lives in application state. Every handler takes the lock only
//! for the synchronous cart operation; catalog lookups happen before the
//! lock is taken.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chinook_core::TrackId;

use crate::cart::CartSnapshot;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub track_id: TrackId,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Update-quantity request body. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub track_id: TrackId,
    pub quantity: i64,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub track_id: TrackId,
}

/// Header badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Current cart contents with derived count and total.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartSnapshot> {
    Json(state.cart().lock().await.snapshot())
}

/// Number of items in the cart.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let count = state.cart().lock().await.item_count();
    Json(CartCount { count })
}

/// Look up a track in the catalog and add it to the cart.
#[instrument(skip(state), fields(track_id = %request.track_id))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let track = state.catalog().get_track(request.track_id).await?;

    let track_id = request.track_id.to_string();
    let quantity_str = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("track_id", track_id.as_str()), ("quantity", quantity_str.as_str())]),
    );

    let mut cart = state.cart().lock().await;
    cart.add_to_cart(track, quantity);
    Ok(Json(cart.snapshot()))
}

/// Set the quantity of a line.
#[instrument(skip(state), fields(track_id = %request.track_id))]
pub async fn update(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateCartRequest>,
) -> Json<CartSnapshot> {
    let mut cart = state.cart().lock().await;
    cart.update_quantity(request.track_id, request.quantity);
    Json(cart.snapshot())
}

/// Remove a line.
#[instrument(skip(state), fields(track_id = %request.track_id))]
pub async fn remove(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RemoveFromCartRequest>,
) -> Json<CartSnapshot> {
    let mut cart = state.cart().lock().await;
    cart.remove_from_cart(request.track_id);
    Json(cart.snapshot())
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartSnapshot> {
    let mut cart = state.cart().lock().await;
    cart.clear_cart();
    Json(cart.snapshot())
}
