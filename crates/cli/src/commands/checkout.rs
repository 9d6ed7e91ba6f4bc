//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! chinook checkout --customer 5 --employee 3 --address "Klanova 9/506" --city Prague
//! ```

use tokio::sync::Mutex;

use chinook_core::{CustomerId, EmployeeId};
use chinook_storefront::api::BillingAddress;
use chinook_storefront::checkout::{self, CheckoutRequest};

use super::{CommandError, Context, emit};

/// Submit the persisted cart as an invoice and print it.
pub async fn run(
    ctx: &Context,
    customer: Option<CustomerId>,
    employee: Option<EmployeeId>,
    billing: BillingAddress,
) -> Result<(), CommandError> {
    let cart = Mutex::new(ctx.cart());
    let request = CheckoutRequest {
        customer_id: customer,
        employee_id: employee,
        billing,
    };

    let invoice = checkout::checkout(&cart, &ctx.client, request).await?;

    tracing::info!("Invoice {} created", invoice.invoice.invoice_id);
    let mut lines = vec![format!(
        "Invoice #{} for customer {} - total {}",
        invoice.invoice.invoice_id,
        invoice.invoice.customer_id,
        invoice.invoice.total.display()
    )];
    lines.extend(super::invoices::item_rows(&invoice.items));
    emit(lines)
}
