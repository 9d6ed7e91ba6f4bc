//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod customers;
pub mod invoices;
pub mod tracks;

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use chinook_storefront::api::{ApiError, CatalogClient, Invoice, TrackDetail};
use chinook_storefront::cart::{CartStore, FileStore};
use chinook_storefront::checkout::CheckoutError;
use chinook_storefront::config::{ConfigError, StorefrontConfig};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog API error: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Shared handles for every command.
pub struct Context {
    pub client: CatalogClient,
    pub data_dir: PathBuf,
}

impl Context {
    /// Build the context from the environment; `data_dir` overrides
    /// `STOREFRONT_DATA_DIR` when given.
    pub fn from_env(data_dir: Option<PathBuf>) -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let client = CatalogClient::new(&config.api)?;

        Ok(Self {
            client,
            data_dir: data_dir.unwrap_or(config.data_dir),
        })
    }

    /// Load the persisted cart.
    pub fn cart(&self) -> CartStore {
        CartStore::load(FileStore::new(&self.data_dir))
    }
}

/// Write lines to stdout.
pub fn emit<I>(lines: I) -> Result<(), CommandError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}

/// One-line summary of a track.
pub fn track_row(track: &TrackDetail) -> String {
    format!(
        "{:>5}  {:<40}  {:<24}  {:>6}  {:>6}",
        track.id(),
        truncate(track.name(), 40),
        truncate(track.artist_name.as_deref().unwrap_or("-"), 24),
        track.duration(),
        track.unit_price().display(),
    )
}

/// One-line summary of an invoice.
pub fn invoice_row(invoice: &Invoice) -> String {
    format!(
        "{:>5}  {}  customer {:>4}  {:<20}  {:>8}",
        invoice.invoice_id,
        invoice.invoice_date.format("%Y-%m-%d"),
        invoice.customer_id,
        truncate(invoice.billing_city.as_deref().unwrap_or("-"), 20),
        invoice.total.display(),
    )
}

/// Page footer for list output.
pub fn page_footer(shown: usize, total: u64, page: u32, page_size: u32) -> String {
    let pages = if page_size == 0 {
        1
    } else {
        total.div_ceil(u64::from(page_size)).max(1)
    };
    format!("{shown} of {total} (page {page}/{pages})")
}

/// Cut `s` to at most `max` characters, marking the cut with `~`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Back in Black", 40), "Back in Black");
        assert_eq!(truncate("Highway to Hell", 8), "Highway~");
    }

    #[test]
    fn test_page_footer() {
        assert_eq!(page_footer(50, 3503, 1, 50), "50 of 3503 (page 1/71)");
        assert_eq!(page_footer(0, 0, 1, 50), "0 of 0 (page 1/1)");
    }

    #[test]
    fn test_invoice_row() {
        let invoice: Invoice = serde_json_invoice();
        let row = invoice_row(&invoice);
        assert!(row.contains("2024-03-01"));
        assert!(row.contains("Prague"));
        assert!(row.ends_with("1.98"));
    }

    fn serde_json_invoice() -> Invoice {
        let raw = r#"{
            "InvoiceId": 412,
            "CustomerId": 5,
            "InvoiceDate": "2024-03-01T00:00:00",
            "BillingCity": "Prague",
            "Total": "1.98"
        }"#;
        serde_json::from_str(raw).unwrap()
    }
}
