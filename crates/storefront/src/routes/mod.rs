//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart contents, count and total
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add a track ({track_id, quantity?})
//! POST /cart/update            - Set a line quantity ({track_id, quantity})
//! POST /cart/remove            - Remove a line ({track_id})
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! POST /checkout               - Create an invoice from the cart (201)
//!
//! # Catalog
//! GET  /catalog/artists        - Artist listing (?page, page_size, search)
//! GET  /catalog/artists/{id}   - Artist detail
//! GET  /catalog/albums         - Album listing (+ artist_id)
//! GET  /catalog/albums/{id}    - Album detail with tracks
//! GET  /catalog/genres         - All genres
//! GET  /catalog/genres/{id}    - Genre detail
//! GET  /catalog/tracks         - Track listing (+ album_id, genre_id)
//! GET  /catalog/tracks/{id}    - Track detail
//!
//! # Customers
//! GET  /customers              - Customer listing (?page, page_size, search)
//! POST /customers              - Create a customer (201)
//! GET  /customers/{id}         - Customer detail
//! GET  /customers/{id}/history - Purchase history
//!
//! # Invoices
//! GET  /invoices               - Invoice listing (?customer_id, employee_id, start_date, end_date)
//! GET  /invoices/{id}          - Invoice detail with lines
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod invoices;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(catalog::artists))
        .route("/artists/{id}", get(catalog::artist))
        .route("/albums", get(catalog::albums))
        .route("/albums/{id}", get(catalog::album))
        .route("/genres", get(catalog::genres))
        .route("/genres/{id}", get(catalog::genre))
        .route("/tracks", get(catalog::tracks))
        .route("/tracks/{id}", get(catalog::track))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::create))
        .route("/{id}", get(customers::show))
        .route("/{id}/history", get(customers::history))
}

/// Create the invoice routes router.
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(invoices::index))
        .route("/{id}", get(invoices::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/catalog", catalog_routes())
        .nest("/customers", customer_routes())
        .nest("/invoices", invoice_routes())
}

/// The complete application: routes, request IDs and request tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::cart::MemoryStore;
    use crate::config::{ApiConfig, StorefrontConfig};
    use crate::middleware::REQUEST_ID_HEADER;

    /// State whose backend is unreachable.
    fn offline_state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: ".".into(),
            api: ApiConfig {
                base_url: Url::parse("http://127.0.0.1:9").unwrap(),
                version: "v1".to_string(),
                timeout: Duration::from_millis(200),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::with_storage(config, MemoryStore::new()).unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        app.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app(offline_state()), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let response = send(app(offline_state()), Method::GET, "/cart", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["item_count"], 0);
        assert_eq!(body["total"], "0.00");
        assert_eq!(body["lines"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_cart_count() {
        let response = send(app(offline_state()), Method::GET, "/cart/count", None).await;
        assert_eq!(json(response).await, serde_json::json!({ "count": 0 }));
    }

    #[tokio::test]
    async fn test_add_zero_quantity_rejected() {
        let response = send(
            app(offline_state()),
            Method::POST,
            "/cart/add",
            Some(r#"{"track_id": 1, "quantity": 0}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "Quantity must be at least 1");
    }

    #[tokio::test]
    async fn test_add_with_backend_down_is_bad_gateway() {
        let state = offline_state();
        let response = send(
            app(state.clone()),
            Method::POST,
            "/cart/add",
            Some(r#"{"track_id": 1}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(state.cart().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let response = send(
            app(offline_state()),
            Method::POST,
            "/checkout",
            Some(r#"{"customer_id": 1}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "Cart is empty");
    }

    #[tokio::test]
    async fn test_create_customer_validation() {
        let response = send(
            app(offline_state()),
            Method::POST,
            "/customers",
            Some(r#"{"first_name": "Ada", "last_name": "Lovelace", "email": "nope"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_invoice_date_range_checked_locally() {
        let response = send(
            app(offline_state()),
            Method::GET,
            "/invoices?start_date=2024-02-01&end_date=2024-01-01",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn assert_json_bad_request(response: Response) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let body = json(response).await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let app = app(offline_state());

        let negative = send(
            app.clone(),
            Method::POST,
            "/cart/add",
            Some(r#"{"track_id": 1, "quantity": -2}"#),
        )
        .await;
        assert_json_bad_request(negative).await;

        let missing_id = send(
            app.clone(),
            Method::POST,
            "/cart/update",
            Some(r#"{"quantity": 2}"#),
        )
        .await;
        assert_json_bad_request(missing_id).await;

        let not_json = send(app, Method::POST, "/checkout", Some("customer_id=5")).await;
        assert_json_bad_request(not_json).await;
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_error() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/customers")
            .body(Body::from(r#"{"first_name": "Ada"}"#))
            .unwrap();
        let response = app(offline_state()).oneshot(request).await.unwrap();
        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_bad_path_and_query_are_json_errors() {
        let app = app(offline_state());

        let path = send(app.clone(), Method::GET, "/catalog/tracks/abc", None).await;
        assert_json_bad_request(path).await;

        let query = send(app, Method::GET, "/invoices?customer_id=abc", None).await;
        assert_json_bad_request(query).await;
    }
}
