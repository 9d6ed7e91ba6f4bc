//! Invoice commands.

use chinook_core::InvoiceId;
use chinook_storefront::api::{InvoiceFilters, InvoiceItemDetail};

use super::{CommandError, Context, emit, invoice_row, page_footer};

/// One printable row per invoice line.
pub fn item_rows(items: &[InvoiceItemDetail]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            format!(
                "  {:>5}  {:<40}  {:<24}  {:>3} x {:>6}",
                item.track_id,
                item.track_name.as_deref().unwrap_or("-"),
                item.artist_name.as_deref().unwrap_or("-"),
                item.quantity,
                item.unit_price.display(),
            )
        })
        .collect()
}

pub async fn list(ctx: &Context, filters: &InvoiceFilters) -> Result<(), CommandError> {
    let list = ctx.client.list_invoices(filters).await?;

    let mut lines: Vec<String> = list.invoices.iter().map(invoice_row).collect();
    lines.push(page_footer(
        list.invoices.len(),
        list.total,
        list.page,
        list.page_size,
    ));
    emit(lines)
}

pub async fn show(ctx: &Context, id: InvoiceId) -> Result<(), CommandError> {
    let detail = ctx.client.get_invoice(id).await?;

    let mut lines = vec![
        invoice_row(&detail.invoice),
        format!(
            "Customer: {}",
            detail.customer_name.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(employee) = &detail.employee_name {
        lines.push(format!("Employee: {employee}"));
    }
    lines.extend(item_rows(&detail.items));
    emit(lines)
}
