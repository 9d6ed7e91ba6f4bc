//! Shopper cart store.
//!
//! The cart is the single source of truth for the shopper's pending
//! selection. Lines are kept in insertion order in memory and written through
//! to a [`KeyValueStore`] under [`CART_STORAGE_KEY`] after every mutation, so
//! the selection survives restarts.
//!
//! Persistence is best effort: a value that cannot be read or parsed at
//! start-up yields an empty cart, and a failed write is logged while the
//! in-memory change stands. Neither is ever reported to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use chinook_storefront::cart::{CartStore, FileStore};
//!
//! let mut cart = CartStore::load(FileStore::new(".chinook"));
//! cart.add_to_cart(track, 2);
//! println!("{} items, total {}", cart.item_count(), cart.total());
//! ```

pub mod storage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use chinook_core::{Price, TrackId};

use crate::api::TrackDetail;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Key under which the cart lines are persisted.
pub const CART_STORAGE_KEY: &str = "chinook_cart";

/// One distinct catalog item and its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: TrackDetail,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub const fn item_id(&self) -> TrackId {
        self.item.id()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.unit_price().times(self.quantity)
    }
}

/// Derived, read-only view of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    #[serde(serialize_with = "two_places")]
    pub total: Price,
}

/// Totals are presented rounded to cents.
fn two_places<S: serde::Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&price.display())
}

/// The shopper's cart.
///
/// Invariants: at most one line per track ID, and every quantity is at least
/// one.
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Box<dyn KeyValueStore>,
    checkout: Arc<Mutex<()>>,
}

/// Held for as long as a checkout of the cart is in flight.
#[derive(Debug)]
pub struct CheckoutGuard {
    _held: OwnedMutexGuard<()>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines.len())
            .field("item_count", &self.item_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart from `storage`, or start empty.
    ///
    /// An absent, unreadable or malformed persisted value is logged and
    /// replaced by an empty cart.
    pub fn load(storage: impl KeyValueStore + 'static) -> Self {
        let lines = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable persisted cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart");
                Vec::new()
            }
        };

        debug!(lines = lines.len(), "Cart loaded");
        Self {
            lines,
            storage: Box::new(storage),
            checkout: Arc::new(Mutex::new(())),
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of `item`.
    ///
    /// An existing line for the same track is incremented; otherwise a new
    /// line is appended at the end. Adding zero changes nothing.
    pub fn add_to_cart(&mut self, item: TrackDetail, quantity: u32) {
        if quantity > 0 {
            if let Some(line) = self.line_mut(item.id()) {
                line.quantity = line.quantity.saturating_add(quantity);
            } else {
                self.lines.push(CartLine { item, quantity });
            }
        }
        self.persist();
    }

    /// Drop the line for `item_id`, if any.
    pub fn remove_from_cart(&mut self, item_id: TrackId) {
        self.lines.retain(|line| line.item_id() != item_id);
        self.persist();
    }

    /// Set the quantity of an existing line.
    ///
    /// Zero or a negative quantity removes the line. Unknown IDs are ignored.
    pub fn update_quantity(&mut self, item_id: TrackId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(item_id);
            return;
        }

        if let Some(line) = self.line_mut(item_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist();
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Take purchased quantities off their lines.
    ///
    /// Lines added or increased after the purchase was taken keep the
    /// difference; lines that reach zero are dropped.
    pub fn remove_purchased(&mut self, purchased: impl IntoIterator<Item = (TrackId, u32)>) {
        for (item_id, quantity) in purchased {
            if let Some(line) = self.line_mut(item_id) {
                line.quantity = line.quantity.saturating_sub(quantity);
            }
        }
        self.lines.retain(|line| line.quantity > 0);
        self.persist();
    }

    /// Claim the cart for checkout.
    ///
    /// Returns `None` while another checkout holds the claim. The claim is
    /// released when the guard is dropped.
    #[must_use]
    pub fn begin_checkout(&self) -> Option<CheckoutGuard> {
        Arc::clone(&self.checkout)
            .try_lock_owned()
            .ok()
            .map(|held| CheckoutGuard { _held: held })
    }

    #[must_use]
    pub fn is_in_cart(&self, item_id: TrackId) -> bool {
        self.line(item_id).is_some()
    }

    /// Quantity of `item_id` in the cart, 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, item_id: TrackId) -> u32 {
        self.line(item_id).map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            item_count: self.item_count(),
            total: self.total(),
        }
    }

    fn line(&self, item_id: TrackId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id() == item_id)
    }

    fn line_mut(&mut self, item_id: TrackId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id() == item_id)
    }

    /// Write the full line list through to storage.
    fn persist(&self) {
        let raw = match serde_json::to_string(&self.lines) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(CART_STORAGE_KEY, &raw) {
            warn!(error = %e, "Failed to persist cart, continuing in memory");
        }
    }
}

/// Restore the invariants on lines read from storage: zero quantities are
/// dropped and repeated IDs are merged into their first occurrence.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut out: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            continue;
        }
        if let Some(existing) = out.iter_mut().find(|l| l.item_id() == line.item_id()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            out.push(line);
        }
    }
    out
}
