//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! chinook cart add 42 -q 2
//! chinook cart update 42 5
//! chinook cart remove 42
//! chinook cart show
//! chinook cart clear
//! ```

use chinook_core::TrackId;
use chinook_storefront::cart::CartStore;

use super::{CommandError, Context, emit};

/// Render the cart as printable lines.
pub fn render(cart: &CartStore) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "{:>5}  {:<40}  {:>4} x {:>6}  {:>8}",
                line.item_id(),
                line.item.name(),
                line.quantity,
                line.item.unit_price().display(),
                line.line_total().display(),
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), total {}",
        cart.item_count(),
        cart.total().display()
    ));
    lines
}

pub fn show(ctx: &Context) -> Result<(), CommandError> {
    emit(render(&ctx.cart()))
}

/// Fetch the track from the catalog and add it.
pub async fn add(ctx: &Context, track_id: TrackId, quantity: u32) -> Result<(), CommandError> {
    let track = ctx.client.get_track(track_id).await?;
    let mut cart = ctx.cart();

    tracing::info!("Adding {} x {} to cart", quantity, track.name());
    cart.add_to_cart(track, quantity);
    emit(render(&cart))
}

pub fn update(ctx: &Context, track_id: TrackId, quantity: i64) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    if !cart.is_in_cart(track_id) {
        tracing::warn!("Track {track_id} is not in the cart");
    }
    cart.update_quantity(track_id, quantity);
    emit(render(&cart))
}

pub fn remove(ctx: &Context, track_id: TrackId) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    cart.remove_from_cart(track_id);
    emit(render(&cart))
}

pub fn clear(ctx: &Context) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    cart.clear_cart();
    emit(["Cart cleared"])
}
