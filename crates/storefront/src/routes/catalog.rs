//! Catalog browsing handlers: artists, albums, genres and tracks.
//!
//! These pass straight through to the backend; single entities come from
//! the client's cache when fresh.

use axum::{Json, extract::State};
use tracing::instrument;

use chinook_core::{AlbumId, ArtistId, GenreId, TrackId};

use crate::api::{
    AlbumDetail, AlbumFilters, AlbumList, Artist, ArtistList, Genre, GenreList, SearchParams,
    TrackDetail, TrackFilters, TrackList,
};
use crate::error::Result;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn artists(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<ArtistList>> {
    Ok(Json(state.catalog().list_artists(&params).await?))
}

#[instrument(skip(state))]
pub async fn artist(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ArtistId>,
) -> Result<Json<Artist>> {
    Ok(Json(state.catalog().get_artist(id).await?))
}

#[instrument(skip(state))]
pub async fn albums(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<AlbumFilters>,
) -> Result<Json<AlbumList>> {
    Ok(Json(state.catalog().list_albums(&filters).await?))
}

/// Album with its artist and track listing.
#[instrument(skip(state))]
pub async fn album(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AlbumId>,
) -> Result<Json<AlbumDetail>> {
    Ok(Json(state.catalog().get_album(id).await?))
}

#[instrument(skip(state))]
pub async fn genres(State(state): State<AppState>) -> Result<Json<GenreList>> {
    Ok(Json(state.catalog().list_genres().await?))
}

#[instrument(skip(state))]
pub async fn genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<GenreId>,
) -> Result<Json<Genre>> {
    Ok(Json(state.catalog().get_genre(id).await?))
}

/// Track listing with search, album and genre filters.
#[instrument(skip(state))]
pub async fn tracks(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<TrackFilters>,
) -> Result<Json<TrackList>> {
    Ok(Json(state.catalog().list_tracks(&filters).await?))
}

#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TrackId>,
) -> Result<Json<TrackDetail>> {
    Ok(Json(state.catalog().get_track(id).await?))
}
