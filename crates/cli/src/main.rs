//! Chinook CLI - cart, checkout and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! chinook tracks list --search "love" --genre 1
//! chinook tracks show 42
//!
//! # Fill the cart and check out
//! chinook cart add 42 -q 2
//! chinook cart show
//! chinook checkout --customer 5 --city Prague
//!
//! # Customers and invoices
//! chinook customers create --first-name Ada --last-name Lovelace --email ada@example.com
//! chinook customers history 5
//! chinook invoices list --customer 5 --from 2024-01-01
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the persisted cart
//! - `checkout` - Turn the cart into an invoice
//! - `tracks` - Browse tracks
//! - `customers` - List, show, create customers and view purchase history
//! - `invoices` - List and show invoices
//!
//! The cart is stored in `STOREFRONT_DATA_DIR` (default `.chinook`), the same
//! place the storefront service keeps it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use chinook_core::{AlbumId, CustomerId, EmployeeId, GenreId, InvoiceId, TrackId};

mod commands;

#[derive(Parser)]
#[command(name = "chinook")]
#[command(author, version, about = "Chinook storefront CLI")]
struct Cli {
    /// Directory holding the persisted cart (overrides `STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create an invoice from the cart
    Checkout {
        /// Customer the invoice is issued to
        #[arg(long)]
        customer: Option<CustomerId>,

        /// Support employee handling the sale
        #[arg(long)]
        employee: Option<EmployeeId>,

        #[command(flatten)]
        billing: BillingArgs,
    },
    /// Browse tracks
    Tracks {
        #[command(subcommand)]
        action: TrackAction,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Browse invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines, item count and total
    Show,
    /// Add a track to the cart
    Add {
        track_id: TrackId,

        /// Number of copies
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line (0 or less removes it)
    Update {
        track_id: TrackId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a track from the cart
    Remove { track_id: TrackId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum TrackAction {
    /// List tracks
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        album: Option<AlbumId>,

        #[arg(long)]
        genre: Option<GenreId>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one track
    Show { id: TrackId },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one customer
    Show { id: CustomerId },
    /// Create a customer
    Create(commands::customers::CreateArgs),
    /// Show a customer's purchase history
    History {
        id: CustomerId,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum InvoiceAction {
    /// List invoices
    List {
        #[arg(long)]
        customer: Option<CustomerId>,

        #[arg(long)]
        employee: Option<EmployeeId>,

        /// Earliest invoice date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest invoice date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one invoice with its lines
    Show { id: InvoiceId },
}

/// Pagination flags shared by list commands.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    /// Page number (starting at 1)
    #[arg(long)]
    page: Option<u32>,

    /// Items per page (backend maximum is 100)
    #[arg(long)]
    page_size: Option<u32>,
}

/// Billing fields recorded on the invoice.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BillingArgs {
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
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env(cli.data_dir)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx)?,
            CartAction::Add { track_id, quantity } => {
                commands::cart::add(&ctx, track_id, quantity).await?;
            }
            CartAction::Update { track_id, quantity } => {
                commands::cart::update(&ctx, track_id, quantity)?;
            }
            CartAction::Remove { track_id } => commands::cart::remove(&ctx, track_id)?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Checkout {
            customer,
            employee,
            billing,
        } => commands::checkout::run(&ctx, customer, employee, billing.into()).await?,
        Commands::Tracks { action } => match action {
            TrackAction::List {
                search,
                album,
                genre,
                page,
            } => commands::tracks::list(&ctx, search, album, genre, page).await?,
            TrackAction::Show { id } => commands::tracks::show(&ctx, id).await?,
        },
        Commands::Customers { action } => match action {
            CustomerAction::List { search, page } => {
                commands::customers::list(&ctx, search, page).await?;
            }
            CustomerAction::Show { id } => commands::customers::show(&ctx, id).await?,
            CustomerAction::Create(args) => commands::customers::create(&ctx, args).await?,
            CustomerAction::History { id, page } => {
                commands::customers::history(&ctx, id, page).await?;
            }
        },
        Commands::Invoices { action } => match action {
            InvoiceAction::List {
                customer,
                employee,
                from,
                to,
                page,
            } => {
                let filters = chinook_storefront::api::InvoiceFilters {
                    page: page.page,
                    page_size: page.page_size,
                    customer_id: customer,
                    employee_id: employee,
                    start_date: from,
                    end_date: to,
                };
                commands::invoices::list(&ctx, &filters).await?;
            }
            InvoiceAction::Show { id } => commands::invoices::show(&ctx, id).await?,
        },
    }
    Ok(())
}

impl From<BillingArgs> for chinook_storefront::api::BillingAddress {
    fn from(args: BillingArgs) -> Self {
        Self {
            address: args.address,
            city: args.city,
            state: args.state,
            country: args.country,
            postal_code: args.postal_code,
        }
    }
}
