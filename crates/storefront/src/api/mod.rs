//! Client for the Chinook catalog REST API.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local sync, direct API calls
//! - Plain JSON over HTTP with `reqwest`; every list endpoint is paginated
//! - In-memory caching via `moka` for catalog entities (5 minute TTL)
//! - Failures are returned to the caller and never retried automatically
//!
//! # Example
//!
//! ```rust,ignore
//! use chinook_storefront::api::{CatalogClient, TrackFilters};
//!
//! let client = CatalogClient::new(&config.api)?;
//!
//! let page = client
//!     .list_tracks(&TrackFilters { search: Some("love".into()), ..Default::default() })
//!     .await?;
//! let track = client.get_track(page.tracks[0].id()).await?;
//! ```

mod cache;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use chinook_core::{AlbumId, ArtistId, CustomerId, GenreId, InvoiceId, TrackId};

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};
pub use types::*;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the request as invalid (400/409/422).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Any other non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error detail reported by the backend.
        message: String,
    },
}

/// Client for the catalog REST API.
///
/// Cheaply cloneable. Single artists, albums, genres and tracks are cached
/// for 5 minutes; lists, searches, customers and invoices are not.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chinook-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.endpoint(),
                cache,
            }),
        })
    }

    /// Base URL all paths are appended to, e.g. `http://localhost:8000/api/v1`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::execute(self.inner.client.get(self.url(path))).await
    }

    async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.inner.client.get(self.url(path)).query(query);
        Self::execute(request).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.inner.client.post(self.url(path)).json(body);
        Self::execute(request).await
    }

    /// Send a request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = error_detail(status, &response_text);
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                    ApiError::Rejected(message)
                }
                _ => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Artists
    // =========================================================================

    /// List artists, optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_artists(&self, params: &SearchParams) -> Result<ArtistList, ApiError> {
        self.get_with("/artists/", params).await
    }

    /// Get a single artist.
    ///
    /// # Errors
    ///
    /// Returns an error if the artist is not found or the API request fails.
    #[instrument(skip(self), fields(artist_id = %id))]
    pub async fn get_artist(&self, id: ArtistId) -> Result<Artist, ApiError> {
        let key = CacheKey::Artist(id);
        if let Some(CacheValue::Artist(artist)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for artist");
            return Ok(*artist);
        }

        let artist: Artist = self.get(&format!("/artists/{id}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Artist(Box::new(artist.clone())))
            .await;
        Ok(artist)
    }

    // =========================================================================
    // Albums
    // =========================================================================

    /// List albums, optionally filtered by title or artist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_albums(&self, filters: &AlbumFilters) -> Result<AlbumList, ApiError> {
        self.get_with("/albums/", filters).await
    }

    /// Get an album with its artist and track list.
    ///
    /// # Errors
    ///
    /// Returns an error if the album is not found or the API request fails.
    #[instrument(skip(self), fields(album_id = %id))]
    pub async fn get_album(&self, id: AlbumId) -> Result<AlbumDetail, ApiError> {
        let key = CacheKey::Album(id);
        if let Some(CacheValue::Album(album)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for album");
            return Ok(*album);
        }

        let album: AlbumDetail = self.get(&format!("/albums/{id}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Album(Box::new(album.clone())))
            .await;
        Ok(album)
    }

    // =========================================================================
    // Genres
    // =========================================================================

    /// List every genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_genres(&self) -> Result<GenreList, ApiError> {
        if let Some(CacheValue::Genres(genres)) = self.inner.cache.get(&CacheKey::Genres).await {
            debug!("Cache hit for genres");
            return Ok(genres);
        }

        let genres: GenreList = self.get("/genres/").await?;
        self.inner
            .cache
            .insert(CacheKey::Genres, CacheValue::Genres(genres.clone()))
            .await;
        Ok(genres)
    }

    /// Get a single genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the genre is not found or the API request fails.
    #[instrument(skip(self), fields(genre_id = %id))]
    pub async fn get_genre(&self, id: GenreId) -> Result<Genre, ApiError> {
        let key = CacheKey::Genre(id);
        if let Some(CacheValue::Genre(genre)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for genre");
            return Ok(*genre);
        }

        let genre: Genre = self.get(&format!("/genres/{id}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Genre(Box::new(genre.clone())))
            .await;
        Ok(genre)
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// List tracks with album/artist/genre names, optionally searched or
    /// filtered by album and genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_tracks(&self, filters: &TrackFilters) -> Result<TrackList, ApiError> {
        self.get_with("/tracks/", filters).await
    }

    /// Get a single track with its album and derived names.
    ///
    /// # Errors
    ///
    /// Returns an error if the track is not found or the API request fails.
    #[instrument(skip(self), fields(track_id = %id))]
    pub async fn get_track(&self, id: TrackId) -> Result<TrackDetail, ApiError> {
        let key = CacheKey::Track(id);
        if let Some(CacheValue::Track(track)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for track");
            return Ok(*track);
        }

        let track: TrackDetail = self.get(&format!("/tracks/{id}")).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Track(Box::new(track.clone())))
            .await;
        Ok(track)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List customers, optionally searched by name, email or company.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_customers(&self, params: &SearchParams) -> Result<CustomerList, ApiError> {
        self.get_with("/customers/", params).await
    }

    /// Get a single customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is not found or the API request fails.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        self.get(&format!("/customers/{id}")).await
    }

    /// Create a customer and return the stored record with its new ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] if the backend refuses the record (for
    /// example a duplicate email), or another error if the request fails.
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    pub async fn create_customer(&self, customer: &CustomerCreate) -> Result<Customer, ApiError> {
        let created: Customer = self.post("/customers/", customer).await?;
        tracing::info!(customer_id = %created.customer_id, "Customer created");
        Ok(created)
    }

    /// Purchase history (invoices) of one customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is not found or the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn customer_purchase_history(
        &self,
        customer_id: CustomerId,
        params: &PaginationParams,
    ) -> Result<InvoiceList, ApiError> {
        self.get_with(&format!("/invoices/customer/{customer_id}/history"), params)
            .await
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    /// List invoices, optionally filtered by customer, employee or date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self, filters: &InvoiceFilters) -> Result<InvoiceList, ApiError> {
        self.get_with("/invoices/", filters).await
    }

    /// Get an invoice with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is not found or the API request fails.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceDetail, ApiError> {
        self.get(&format!("/invoices/{id}")).await
    }

    /// Create an invoice. The backend prices the lines and computes the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the invoice or the request fails.
    #[instrument(skip(self, invoice), fields(customer_id = %invoice.customer_id, lines = invoice.items.len()))]
    pub async fn create_invoice(&self, invoice: &InvoiceCreate) -> Result<InvoiceDetail, ApiError> {
        let created: InvoiceDetail = self.post("/invoices/", invoice).await?;
        tracing::info!(
            invoice_id = %created.invoice.invoice_id,
            total = %created.invoice.total,
            "Invoice created"
        );
        Ok(created)
    }
}

/// Extract a readable message from a backend error body.
///
/// The backend answers errors with `{"detail": "..."}`, or for validation
/// failures `{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}`.
fn error_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(serde_json::Value::Array(errors)) => errors
            .iter()
            .map(|error| {
                let message = error
                    .get("msg")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("invalid value");
                let location = error
                    .get("loc")
                    .and_then(serde_json::Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .map(|p| p.as_str().map_or_else(|| p.to_string(), str::to_owned))
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_default();
                if location.is_empty() {
                    message.to_owned()
                } else {
                    format!("{location}: {message}")
                }
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ if !body.trim().is_empty() => body.chars().take(200).collect(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    }
}
