//! Customer commands.
//!
//! # Usage
//!
//! ```bash
//! chinook customers list --search smith
//! chinook customers create --first-name Ada --last-name Lovelace --email ada@example.com
//! chinook customers history 5 --page 2
//! ```

use chinook_core::{CustomerId, EmployeeId};
use chinook_storefront::api::{Customer, PaginationParams, SearchParams};
use chinook_storefront::checkout::{self, NewCustomer};

use super::{CommandError, Context, emit, invoice_row, page_footer};
use crate::PageArgs;

/// Details for a new customer.
#[derive(clap::Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    company: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    postal_code: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    fax: Option<String>,

    /// Employee assigned as support representative
    #[arg(long)]
    support_rep: Option<EmployeeId>,
}

impl From<CreateArgs> for NewCustomer {
    fn from(args: CreateArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            company: args.company,
            address: args.address,
            city: args.city,
            state: args.state,
            country: args.country,
            postal_code: args.postal_code,
            phone: args.phone,
            fax: args.fax,
            support_rep_id: args.support_rep,
        }
    }
}

fn customer_row(customer: &Customer) -> String {
    format!(
        "{:>4}  {:<30}  {:<36}  {}",
        customer.customer_id,
        customer.full_name(),
        customer.email,
        customer.country.as_deref().unwrap_or("-"),
    )
}

pub async fn list(
    ctx: &Context,
    search: Option<String>,
    page: PageArgs,
) -> Result<(), CommandError> {
    let params = SearchParams {
        page: page.page,
        page_size: page.page_size,
        search,
    };
    let list = ctx.client.list_customers(&params).await?;

    let mut lines: Vec<String> = list.customers.iter().map(customer_row).collect();
    lines.push(page_footer(
        list.customers.len(),
        list.total,
        list.page,
        list.page_size,
    ));
    emit(lines)
}

pub async fn show(ctx: &Context, id: CustomerId) -> Result<(), CommandError> {
    let customer = ctx.client.get_customer(id).await?;

    let mut lines = vec![
        format!("#{} {}", customer.customer_id, customer.full_name()),
        format!("Email:   {}", customer.email),
    ];
    let optional = [
        ("Company", &customer.company),
        ("Address", &customer.address),
        ("City", &customer.city),
        ("State", &customer.state),
        ("Country", &customer.country),
        ("Postal", &customer.postal_code),
        ("Phone", &customer.phone),
    ];
    for (label, value) in optional {
        if let Some(v) = value {
            lines.push(format!("{label}: {v}"));
        }
    }
    emit(lines)
}

/// Validate locally, then create the customer.
pub async fn create(ctx: &Context, args: CreateArgs) -> Result<(), CommandError> {
    let customer = checkout::create_customer(&ctx.client, args.into()).await?;
    tracing::info!("Customer {} created", customer.customer_id);
    emit([customer_row(&customer)])
}

pub async fn history(ctx: &Context, id: CustomerId, page: PageArgs) -> Result<(), CommandError> {
    let params = PaginationParams {
        page: page.page,
        page_size: page.page_size,
    };
    let list = ctx.client.customer_purchase_history(id, &params).await?;

    if list.invoices.is_empty() {
        return emit([format!("Customer {id} has no purchases")]);
    }

    let mut lines: Vec<String> = list.invoices.iter().map(invoice_row).collect();
    lines.push(page_footer(
        list.invoices.len(),
        list.total,
        list.page,
        list.page_size,
    ));
    emit(lines)
}
