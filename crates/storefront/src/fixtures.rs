//! Sample catalog data shared by unit tests.

#![allow(clippy::unwrap_used)]

use chinook_core::{MediaTypeId, Price, TrackId};

use crate::api::{Track, TrackDetail};

/// A track with the given ID and unit price.
pub fn track(id: i32, price: &str) -> TrackDetail {
    TrackDetail {
        track: Track {
            track_id: TrackId::new(id),
            name: format!("Track {id}"),
            album_id: None,
            media_type_id: MediaTypeId::new(1),
            genre_id: None,
            composer: None,
            milliseconds: 215_000,
            unit_price: Price::parse(price).unwrap(),
        },
        album: None,
        artist_name: Some("AC/DC".to_string()),
        genre_name: Some("Rock".to_string()),
    }
}
