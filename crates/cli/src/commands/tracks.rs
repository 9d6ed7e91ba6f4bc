//! Track browsing commands.

use chinook_core::{AlbumId, GenreId, TrackId};
use chinook_storefront::api::TrackFilters;

use super::{CommandError, Context, emit, page_footer, track_row};
use crate::PageArgs;

pub async fn list(
    ctx: &Context,
    search: Option<String>,
    album: Option<AlbumId>,
    genre: Option<GenreId>,
    page: PageArgs,
) -> Result<(), CommandError> {
    let filters = TrackFilters {
        page: page.page,
        page_size: page.page_size,
        search,
        album_id: album,
        genre_id: genre,
    };
    let list = ctx.client.list_tracks(&filters).await?;

    let mut lines: Vec<String> = list.tracks.iter().map(track_row).collect();
    lines.push(page_footer(
        list.tracks.len(),
        list.total,
        list.page,
        list.page_size,
    ));
    emit(lines)
}

pub async fn show(ctx: &Context, id: TrackId) -> Result<(), CommandError> {
    let track = ctx.client.get_track(id).await?;

    let mut lines = vec![
        format!("#{} {}", track.id(), track.name()),
        format!("Artist:   {}", track.artist_name.as_deref().unwrap_or("-")),
        format!(
            "Album:    {}",
            track.album.as_ref().map_or("-", |a| a.title.as_str())
        ),
        format!("Genre:    {}", track.genre_name.as_deref().unwrap_or("-")),
        format!("Duration: {}", track.duration()),
        format!("Price:    {}", track.unit_price().display()),
    ];
    if let Some(composer) = &track.track.composer {
        lines.push(format!("Composer: {composer}"));
    }
    emit(lines)
}
