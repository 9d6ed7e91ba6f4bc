//! `CatalogClient` against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chinook_core::{CustomerId, Email, GenreId, InvoiceId, TrackId};
use chinook_integration_tests::MockBackend;
use chinook_storefront::api::{ApiError, CustomerCreate, PaginationParams, TrackFilters};

#[tokio::test]
async fn test_list_tracks_sends_only_set_filters() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let list = client
        .list_tracks(&TrackFilters {
            search: Some("the".to_string()),
            genre_id: Some(GenreId::new(1)),
            page_size: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.tracks[0].name(), "Put The Finger On You");
    assert_eq!(list.page_size, 10);

    let query = backend.data().last_query.clone();
    assert_eq!(query.get("search").map(String::as_str), Some("the"));
    assert_eq!(query.get("genre_id").map(String::as_str), Some("1"));
    assert!(!query.contains_key("album_id"));
    assert!(!query.contains_key("page"));
}

#[tokio::test]
async fn test_get_track_is_cached() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let first = client.get_track(TrackId::new(7)).await.unwrap();
    let second = client.get_track(TrackId::new(7)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.unit_price().display(), "1.50");
    assert_eq!(first.artist_name.as_deref(), Some("AC/DC"));
    assert_eq!(backend.data().track_hits.get(&7), Some(&1));
}

#[tokio::test]
async fn test_missing_track_is_not_found() {
    let backend = MockBackend::start().await;

    let err = backend.client().get_track(TrackId::new(404)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Track no encontrado"));
}

#[tokio::test]
async fn test_duplicate_customer_is_rejected() {
    let backend = MockBackend::start().await;
    let create = CustomerCreate::new(
        "Frank",
        "W",
        Email::parse("frantisekw@jetbrains.com").unwrap(),
    );

    let err = backend.client().create_customer(&create).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref msg) if msg == "El email ya está registrado"));
}

#[tokio::test]
async fn test_create_customer_wire_format() {
    let backend = MockBackend::start().await;
    let mut create = CustomerCreate::new(
        "Ada",
        "Lovelace",
        Email::parse("ada@example.com").unwrap(),
    );
    create.city = Some("London".to_string());

    let customer = backend.client().create_customer(&create).await.unwrap();
    assert_eq!(customer.full_name(), "Ada Lovelace");
    assert_eq!(customer.city.as_deref(), Some("London"));

    let sent = backend.data().created_customers[0].clone();
    assert_eq!(sent["FirstName"], "Ada");
    assert_eq!(sent["Email"], "ada@example.com");
    assert!(sent.get("Company").is_none());
}

#[tokio::test]
async fn test_history_of_unknown_customer() {
    let backend = MockBackend::start().await;

    let err = backend
        .client()
        .customer_purchase_history(CustomerId::new(999), &PaginationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_invoice() {
    let backend = MockBackend::start().await;

    let err = backend
        .client()
        .get_invoice(InvoiceId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
