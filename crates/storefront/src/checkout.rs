//! Converting the cart into a backend invoice.
//!
//! Checkout is the only place the cart and the backend meet. Local checks
//! (empty cart, no customer selected, malformed customer details) run before
//! any request is made. Only one checkout of a cart runs at a time, and once
//! the backend has accepted the invoice exactly the invoiced quantities are
//! taken off the cart.

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use chinook_core::{CustomerId, Email, EmailError, EmployeeId};

use crate::api::{
    ApiError, BillingAddress, CatalogClient, Customer, CustomerCreate, InvoiceCreate,
    InvoiceDetail, InvoiceItemCreate,
};
use crate::cart::CartStore;

/// Errors that can occur during checkout or customer creation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Please select a customer")]
    MissingCustomer,

    /// Another checkout of the same cart has not finished yet.
    #[error("Checkout already in progress")]
    InProgress,

    #[error(transparent)]
    InvalidCustomer(#[from] CustomerFormError),

    /// The backend refused or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the shopper submits at checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub billing: BillingAddress,
}

/// Build the invoice payload for the current cart, in cart order.
///
/// # Errors
///
/// Returns `EmptyCart` or `MissingCustomer` if checkout cannot proceed.
pub fn prepare_invoice(
    cart: &CartStore,
    request: CheckoutRequest,
) -> Result<InvoiceCreate, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let customer_id = request.customer_id.ok_or(CheckoutError::MissingCustomer)?;

    let items = cart
        .lines()
        .iter()
        .map(|line| InvoiceItemCreate {
            track_id: line.item_id(),
            quantity: line.quantity,
        })
        .collect();

    Ok(InvoiceCreate::new(
        customer_id,
        request.employee_id,
        request.billing,
        items,
    ))
}

/// Submit the cart as an invoice.
///
/// The cart lock is released while the request is in flight, but the cart
/// stays claimed so a second checkout is turned away. On success the
/// invoiced quantities are removed and the created invoice returned; lines
/// added meanwhile stay in the cart. On failure the cart is left as it was.
///
/// # Errors
///
/// Returns `InProgress` or a validation error before any request is made,
/// or the backend error if invoice creation fails.
#[instrument(skip(cart, client, request), fields(customer_id = ?request.customer_id))]
pub async fn checkout(
    cart: &Mutex<CartStore>,
    client: &CatalogClient,
    request: CheckoutRequest,
) -> Result<InvoiceDetail, CheckoutError> {
    let (invoice, _claim) = {
        let cart = cart.lock().await;
        let claim = cart.begin_checkout().ok_or(CheckoutError::InProgress)?;
        (prepare_invoice(&cart, request)?, claim)
    };

    let created = client.create_invoice(&invoice).await?;
    cart.lock()
        .await
        .remove_purchased(invoice.items.iter().map(|i| (i.track_id, i.quantity)));

    info!(
        invoice_id = %created.invoice.invoice_id,
        total = %created.invoice.total,
        "Checkout completed"
    );
    Ok(created)
}

// =============================================================================
// Customer creation
// =============================================================================

/// Customer details validated before they are sent to the backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerFormError {
    #[error("First name is required")]
    MissingFirstName,

    #[error("Last name is required")]
    MissingLastName,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

/// New-customer form as entered during checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub support_rep_id: Option<EmployeeId>,
}

impl NewCustomer {
    /// Validate the form into a create payload.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a blank name or a malformed email.
    pub fn validate(self) -> Result<CustomerCreate, CustomerFormError> {
        if self.first_name.trim().is_empty() {
            return Err(CustomerFormError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(CustomerFormError::MissingLastName);
        }
        let email = Email::parse(&self.email)?;

        let mut create = CustomerCreate::new(self.first_name, self.last_name, email);
        create.company = self.company;
        create.address = self.address;
        create.city = self.city;
        create.state = self.state;
        create.country = self.country;
        create.postal_code = self.postal_code;
        create.phone = self.phone;
        create.fax = self.fax;
        create.support_rep_id = self.support_rep_id;
        Ok(create.normalized())
    }
}

/// Validate and create a customer.
///
/// # Errors
///
/// Returns `InvalidCustomer` without calling the backend if the form is
/// invalid, or the backend error if creation fails.
pub async fn create_customer(
    client: &CatalogClient,
    form: NewCustomer,
) -> Result<Customer, CheckoutError> {
    let create = form.validate()?;
    Ok(client.create_customer(&create).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::cart::MemoryStore;
    use crate::config::ApiConfig;
    use crate::fixtures::track;

    /// Client pointed at a port nothing listens on. Any request it makes
    /// fails, so a test that succeeds with it proves no request was made.
    fn offline_client() -> CatalogClient {
        CatalogClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            version: "v1".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap()
    }

    fn request(customer: i32) -> CheckoutRequest {
        CheckoutRequest {
            customer_id: Some(CustomerId::new(customer)),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_invoice_keeps_cart_order() {
        let mut cart = CartStore::load(MemoryStore::new());
        cart.add_to_cart(track(20, "0.99"), 1);
        cart.add_to_cart(track(10, "0.99"), 3);

        let invoice = prepare_invoice(
            &cart,
            CheckoutRequest {
                billing: BillingAddress {
                    city: Some("Prague".to_string()),
                    country: Some("  ".to_string()),
                    ..Default::default()
                },
                ..request(5)
            },
        )
        .unwrap();

        let items: Vec<(i32, u32)> = invoice
            .items
            .iter()
            .map(|i| (i.track_id.as_i32(), i.quantity))
            .collect();
        assert_eq!(items, vec![(20, 1), (10, 3)]);
        assert_eq!(invoice.customer_id, CustomerId::new(5));
        assert_eq!(invoice.billing_city.as_deref(), Some("Prague"));
        assert!(invoice.billing_country.is_none());
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_without_network() {
        let cart = Mutex::new(CartStore::load(MemoryStore::new()));

        let err = checkout(&cart, &offline_client(), request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_missing_customer_rejected_without_network() {
        let mut store = CartStore::load(MemoryStore::new());
        store.add_to_cart(track(1, "0.99"), 1);
        let cart = Mutex::new(store);

        let err = checkout(&cart, &offline_client(), CheckoutRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingCustomer));
        assert_eq!(cart.lock().await.item_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_cart() {
        let mut store = CartStore::load(MemoryStore::new());
        store.add_to_cart(track(1, "0.99"), 2);
        let cart = Mutex::new(store);

        let err = checkout(&cart, &offline_client(), request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Api(ApiError::Http(_))));
        assert_eq!(cart.lock().await.item_quantity(1.into()), 2);
    }

    #[tokio::test]
    async fn test_claimed_cart_is_turned_away() {
        let mut store = CartStore::load(MemoryStore::new());
        store.add_to_cart(track(1, "0.99"), 1);
        let claim = store.begin_checkout().unwrap();
        let cart = Mutex::new(store);

        let err = checkout(&cart, &offline_client(), request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InProgress));
        assert_eq!(cart.lock().await.item_count(), 1);
        drop(claim);
    }

    #[test]
    fn test_new_customer_validation() {
        let form = NewCustomer {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            city: Some(String::new()),
            ..Default::default()
        };
        let create = form.validate().unwrap();
        assert_eq!(create.first_name, "Ada");
        assert_eq!(create.email.as_str(), "ada@example.com");
        assert!(create.city.is_none());

        let blank = NewCustomer {
            first_name: "  ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(CustomerFormError::MissingFirstName));

        let bad_email = NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada.example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_email.validate(),
            Err(CustomerFormError::Email(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_customer_never_reaches_backend() {
        let err = create_customer(&offline_client(), NewCustomer::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidCustomer(CustomerFormError::MissingFirstName)
        ));
    }
}
