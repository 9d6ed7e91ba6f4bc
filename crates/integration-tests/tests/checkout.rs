//! Checkout against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use tokio::sync::Mutex;

use chinook_core::{CustomerId, TrackId};
use chinook_integration_tests::MockBackend;
use chinook_storefront::api::{ApiError, BillingAddress};
use chinook_storefront::cart::{CartStore, FileStore, MemoryStore};
use chinook_storefront::checkout::{self, CheckoutError, CheckoutRequest, NewCustomer};

async fn cart_with(backend: &MockBackend, lines: &[(i32, u32)]) -> CartStore {
    let client = backend.client();
    let mut cart = CartStore::load(MemoryStore::new());
    for (id, quantity) in lines {
        let track = client.get_track(TrackId::new(*id)).await.unwrap();
        cart.add_to_cart(track, *quantity);
    }
    cart
}

#[tokio::test]
async fn test_successful_checkout_clears_cart() {
    let backend = MockBackend::start().await;
    let cart = Mutex::new(cart_with(&backend, &[(7, 2), (8, 1), (1, 1)]).await);

    let invoice = checkout::checkout(
        &cart,
        &backend.client(),
        CheckoutRequest {
            customer_id: Some(CustomerId::new(5)),
            employee_id: None,
            billing: BillingAddress {
                city: Some("Prague".to_string()),
                address: Some(String::new()),
                ..Default::default()
            },
        },
    )
    .await
    .unwrap();

    assert_eq!(invoice.invoice.total.display(), "13.98");
    assert_eq!(invoice.items.len(), 3);
    assert_eq!(
        invoice.customer_name.as_deref(),
        Some("František Wichterlová")
    );
    assert!(cart.lock().await.is_empty());

    let sent = backend.data().created_invoices[0].clone();
    assert_eq!(
        sent,
        json!({
            "CustomerId": 5,
            "BillingCity": "Prague",
            "items": [
                { "TrackId": 7, "Quantity": 2 },
                { "TrackId": 8, "Quantity": 1 },
                { "TrackId": 1, "Quantity": 1 },
            ],
        })
    );
}

#[tokio::test]
async fn test_backend_failure_keeps_cart() {
    let backend = MockBackend::start().await;
    backend.data().fail_invoices = true;
    let cart = Mutex::new(cart_with(&backend, &[(6, 3)]).await);

    let err = checkout::checkout(
        &cart,
        &backend.client(),
        CheckoutRequest {
            customer_id: Some(CustomerId::new(5)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Api(ApiError::Status { status: 500, .. })
    ));
    assert_eq!(cart.lock().await.item_quantity(TrackId::new(6)), 3);
}

#[tokio::test]
async fn test_unknown_customer_keeps_cart() {
    let backend = MockBackend::start().await;
    let cart = Mutex::new(cart_with(&backend, &[(1, 1)]).await);

    let err = checkout::checkout(
        &cart,
        &backend.client(),
        CheckoutRequest {
            customer_id: Some(CustomerId::new(77)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckoutError::Api(ApiError::NotFound(_))));
    assert_eq!(cart.lock().await.item_count(), 1);
}

#[tokio::test]
async fn test_rejections_make_no_request() {
    let backend = MockBackend::start().await;

    let empty = Mutex::new(CartStore::load(MemoryStore::new()));
    let err = checkout::checkout(
        &empty,
        &backend.client(),
        CheckoutRequest {
            customer_id: Some(CustomerId::new(5)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    let cart = Mutex::new(cart_with(&backend, &[(1, 1)]).await);
    let err = checkout::checkout(&cart, &backend.client(), CheckoutRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::MissingCustomer));

    assert!(backend.data().created_invoices.is_empty());
}

#[tokio::test]
async fn test_cleared_cart_is_persisted() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = backend.client();

    let mut store = CartStore::load(FileStore::new(dir.path()));
    store.add_to_cart(client.get_track(TrackId::new(1)).await.unwrap(), 1);
    let cart = Mutex::new(store);

    checkout::checkout(
        &cart,
        &client,
        CheckoutRequest {
            customer_id: Some(CustomerId::new(5)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let reloaded = CartStore::load(FileStore::new(dir.path()));
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn test_create_customer_then_check_out() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let customer = checkout::create_customer(
        &client,
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let cart = Mutex::new(cart_with(&backend, &[(8, 1)]).await);
    let invoice = checkout::checkout(
        &cart,
        &client,
        CheckoutRequest {
            customer_id: Some(customer.customer_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(invoice.invoice.customer_id, customer.customer_id);
    assert_eq!(invoice.customer_name.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn test_concurrent_checkouts_create_one_invoice() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let cart = Mutex::new(cart_with(&backend, &[(7, 1), (8, 2)]).await);
    let request = CheckoutRequest {
        customer_id: Some(CustomerId::new(5)),
        ..Default::default()
    };

    let (first, second) = tokio::join!(
        checkout::checkout(&cart, &client, request.clone()),
        checkout::checkout(&cart, &client, request.clone()),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(CheckoutError::InProgress)))
    );
    assert_eq!(backend.data().created_invoices.len(), 1);
    assert!(cart.lock().await.is_empty());

    // The claim is released once the first checkout finishes.
    cart.lock()
        .await
        .add_to_cart(client.get_track(TrackId::new(1)).await.unwrap(), 1);
    checkout::checkout(&cart, &client, request).await.unwrap();
    assert_eq!(backend.data().created_invoices.len(), 2);
}

#[tokio::test]
async fn test_lines_added_during_checkout_stay_in_cart() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let cart = Mutex::new(cart_with(&backend, &[(7, 1)]).await);
    let extra = client.get_track(TrackId::new(8)).await.unwrap();

    let (result, ()) = tokio::join!(
        checkout::checkout(
            &cart,
            &client,
            CheckoutRequest {
                customer_id: Some(CustomerId::new(5)),
                ..Default::default()
            },
        ),
        async {
            tokio::task::yield_now().await;
            cart.lock().await.add_to_cart(extra, 3);
        },
    );
    let invoice = result.unwrap();

    let invoiced = |id: i32| -> u32 {
        invoice
            .items
            .iter()
            .filter(|line| line.track_id == TrackId::new(id))
            .map(|line| line.quantity)
            .sum()
    };
    let cart = cart.lock().await;
    assert_eq!(invoiced(7), 1);
    assert!(!cart.is_in_cart(TrackId::new(7)));
    assert_eq!(invoiced(8) + cart.item_quantity(TrackId::new(8)), 3);
}
