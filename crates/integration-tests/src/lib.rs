//! Integration tests for the Chinook storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chinook-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] serves a small slice of
//! the catalog REST API (`/api/v1`) from memory on an ephemeral port, and
//! records what the storefront sent it.
//!
//! # Test Categories
//!
//! - `catalog_client` - `CatalogClient` requests, error mapping and caching
//! - `checkout` - Cart to invoice, success and failure paths
//! - `storefront_routes` - The JSON HTTP surface end to end

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

use chinook_core::Price;
use chinook_storefront::api::CatalogClient;
use chinook_storefront::config::{ApiConfig, StorefrontConfig};

/// Everything the mock backend serves and records.
#[derive(Debug, Default)]
pub struct MockData {
    pub tracks: Vec<Value>,
    pub customers: Vec<Value>,
    pub invoices: Vec<Value>,
    /// Invoice payloads received, in order.
    pub created_invoices: Vec<Value>,
    /// Customer payloads received, in order.
    pub created_customers: Vec<Value>,
    /// Number of `GET /tracks/{id}` requests per track.
    pub track_hits: HashMap<i32, usize>,
    /// Query string of the most recent list request.
    pub last_query: HashMap<String, String>,
    /// Answer invoice creation with a 500.
    pub fail_invoices: bool,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<MockData>>);

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.0.lock().unwrap()
    }
}

/// A running in-process catalog backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend seeded with [`sample_tracks`] and [`sample_customers`].
    pub async fn start() -> Self {
        let state = MockState::default();
        {
            let mut data = state.lock();
            data.tracks = sample_tracks();
            data.customers = sample_customers();
        }

        let api = Router::new()
            .route("/tracks/", get(list_tracks))
            .route("/tracks/{id}", get(get_track))
            .route("/customers/", get(list_customers).post(create_customer))
            .route("/customers/{id}", get(get_customer))
            .route("/invoices/", get(list_invoices).post(create_invoice))
            .route("/invoices/{id}", get(get_invoice))
            .route("/invoices/customer/{id}/history", get(customer_history));
        let app = Router::new().nest("/api/v1", api).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Origin of the backend, e.g. `http://127.0.0.1:54321`.
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            version: "v1".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Storefront configuration pointed at this backend.
    pub fn storefront_config(&self, data_dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: data_dir.to_path_buf(),
            api: self.api_config(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.api_config()).unwrap()
    }

    /// Inspect or change the backend's data.
    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.state.lock()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A track in the backend's wire format.
pub fn track_json(id: i32, name: &str, price: &str, genre_id: i32) -> Value {
    json!({
        "TrackId": id,
        "Name": name,
        "AlbumId": 1,
        "MediaTypeId": 1,
        "GenreId": genre_id,
        "Composer": "Angus Young, Malcolm Young, Brian Johnson",
        "Milliseconds": 343_719,
        "UnitPrice": price,
        "album": { "AlbumId": 1, "Title": "For Those About To Rock We Salute You", "ArtistId": 1 },
        "artist_name": "AC/DC",
        "genre_name": "Rock",
    })
}

pub fn sample_tracks() -> Vec<Value> {
    vec![
        track_json(1, "For Those About To Rock (We Salute You)", "0.99", 1),
        track_json(6, "Put The Finger On You", "0.99", 1),
        track_json(7, "Let's Get It Up", "1.50", 1),
        track_json(8, "Inject The Venom", "9.99", 2),
    ]
}

pub fn sample_customers() -> Vec<Value> {
    vec![json!({
        "CustomerId": 5,
        "FirstName": "František",
        "LastName": "Wichterlová",
        "Company": "JetBrains s.r.o.",
        "Address": "Klanova 9/506",
        "City": "Prague",
        "State": null,
        "Country": "Czech Republic",
        "PostalCode": "14700",
        "Phone": "+420 2 4172 5555",
        "Fax": null,
        "Email": "frantisekw@jetbrains.com",
        "SupportRepId": 4,
    })]
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn page(params: &HashMap<String, String>) -> (usize, usize) {
    let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size = params
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50);
    (page, size)
}

fn paginate(key: &str, items: Vec<Value>, params: &HashMap<String, String>) -> Value {
    let (page, size) = page(params);
    let total = items.len();
    let slice: Vec<Value> = items
        .into_iter()
        .skip((page.max(1) - 1) * size)
        .take(size)
        .collect();
    json!({ key: slice, "total": total, "page": page, "page_size": size })
}

async fn list_tracks(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut data = state.lock();
    data.last_query.clone_from(&params);

    let search = params.get("search").map(|s| s.to_lowercase());
    let genre = params.get("genre_id").and_then(|g| g.parse::<i64>().ok());
    let tracks: Vec<Value> = data
        .tracks
        .iter()
        .filter(|t| {
            search.as_ref().is_none_or(|s| {
                t["Name"].as_str().unwrap().to_lowercase().contains(s.as_str())
            })
        })
        .filter(|t| genre.is_none_or(|g| t["GenreId"].as_i64() == Some(g)))
        .cloned()
        .collect();
    Json(paginate("tracks", tracks, &params))
}

async fn get_track(State(state): State<MockState>, Path(id): Path<i32>) -> Response {
    let mut data = state.lock();
    *data.track_hits.entry(id).or_default() += 1;
    data.tracks
        .iter()
        .find(|t| t["TrackId"] == id)
        .cloned()
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Track no encontrado"),
            |t| Json(t).into_response(),
        )
}

async fn list_customers(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut data = state.lock();
    data.last_query.clone_from(&params);
    let customers = data.customers.clone();
    Json(paginate("customers", customers, &params))
}

async fn get_customer(State(state): State<MockState>, Path(id): Path<i32>) -> Response {
    let data = state.lock();
    data.customers
        .iter()
        .find(|c| c["CustomerId"] == id)
        .cloned()
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Cliente no encontrado"),
            |c| Json(c).into_response(),
        )
}

async fn create_customer(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut data = state.lock();
    data.created_customers.push(body.clone());

    let email = body["Email"].as_str().unwrap_or_default().to_string();
    if data.customers.iter().any(|c| c["Email"] == email.as_str()) {
        return detail(StatusCode::BAD_REQUEST, "El email ya está registrado");
    }

    let mut customer = body;
    customer["CustomerId"] = json!(100 + data.customers.len());
    data.customers.push(customer.clone());
    (StatusCode::CREATED, Json(customer)).into_response()
}

async fn list_invoices(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut data = state.lock();
    data.last_query.clone_from(&params);
    let customer = params.get("customer_id").and_then(|c| c.parse::<i64>().ok());
    let invoices: Vec<Value> = data
        .invoices
        .iter()
        .filter(|i| customer.is_none_or(|c| i["CustomerId"].as_i64() == Some(c)))
        .map(summary)
        .collect();
    Json(paginate("invoices", invoices, &params))
}

async fn customer_history(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = state.lock();
    if !data.customers.iter().any(|c| c["CustomerId"] == id) {
        return detail(StatusCode::NOT_FOUND, "Cliente no encontrado");
    }
    let invoices: Vec<Value> = data
        .invoices
        .iter()
        .filter(|i| i["CustomerId"] == id)
        .map(summary)
        .collect();
    Json(paginate("invoices", invoices, &params)).into_response()
}

async fn get_invoice(State(state): State<MockState>, Path(id): Path<i32>) -> Response {
    let data = state.lock();
    data.invoices
        .iter()
        .find(|i| i["InvoiceId"] == id)
        .cloned()
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Factura no encontrada"),
            |i| Json(i).into_response(),
        )
}

/// Invoice list entries carry no lines.
fn summary(invoice: &Value) -> Value {
    let mut summary = invoice.clone();
    if let Some(object) = summary.as_object_mut() {
        object.remove("items");
        object.remove("customer_name");
        object.remove("employee_name");
    }
    summary
}

async fn create_invoice(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut data = state.lock();
    data.created_invoices.push(body.clone());

    if data.fail_invoices {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database is locked");
    }

    let Some(customer) = data
        .customers
        .iter()
        .find(|c| c["CustomerId"] == body["CustomerId"])
        .cloned()
    else {
        return detail(StatusCode::NOT_FOUND, "Cliente no encontrado");
    };

    let invoice_id = 1000 + data.invoices.len();
    let mut total = Price::ZERO;
    let mut items = Vec::new();
    for (n, item) in body["items"].as_array().cloned().unwrap_or_default().iter().enumerate() {
        let Some(track) = data.tracks.iter().find(|t| t["TrackId"] == item["TrackId"]) else {
            return detail(StatusCode::NOT_FOUND, "Track no encontrado");
        };
        let quantity = u32::try_from(item["Quantity"].as_u64().unwrap()).unwrap();
        let price = Price::parse(track["UnitPrice"].as_str().unwrap()).unwrap();
        total += price.times(quantity);
        items.push(json!({
            "InvoiceLineId": invoice_id * 10 + n,
            "InvoiceId": invoice_id,
            "TrackId": item["TrackId"],
            "UnitPrice": track["UnitPrice"],
            "Quantity": quantity,
            "track_name": track["Name"],
            "artist_name": track["artist_name"],
            "album_title": track["album"]["Title"],
        }));
    }

    let invoice = json!({
        "InvoiceId": invoice_id,
        "CustomerId": body["CustomerId"],
        "InvoiceDate": "2024-03-01T12:00:00",
        "BillingAddress": body.get("BillingAddress"),
        "BillingCity": body.get("BillingCity"),
        "BillingState": body.get("BillingState"),
        "BillingCountry": body.get("BillingCountry"),
        "BillingPostalCode": body.get("BillingPostalCode"),
        "Total": total.display(),
        "EmployeeId": body.get("EmployeeId"),
        "items": items,
        "customer_name": format!(
            "{} {}",
            customer["FirstName"].as_str().unwrap_or_default(),
            customer["LastName"].as_str().unwrap_or_default()
        ),
        "employee_name": null,
    });
    data.invoices.push(invoice.clone());
    (StatusCode::CREATED, Json(invoice)).into_response()
}
