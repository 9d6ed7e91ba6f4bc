//! Cache types for catalog API responses.
//!
//! Only read-mostly catalog entities are cached. Customer and invoice data
//! changes with every checkout and always goes to the backend.

use chinook_core::{AlbumId, ArtistId, GenreId, TrackId};

use super::types::{AlbumDetail, Artist, Genre, GenreList, TrackDetail};

/// Cache key for catalog entities.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Artist(ArtistId),
    Album(AlbumId),
    Genre(GenreId),
    Genres,
    Track(TrackId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Artist(Box<Artist>),
    Album(Box<AlbumDetail>),
    Genre(Box<Genre>),
    Genres(GenreList),
    Track(Box<TrackDetail>),
}
