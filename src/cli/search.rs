use tabled::Table;

use crate::{
    error, info,
    spotify::{SearchKind, SearchResults},
    types::{AlbumTableRow, ArtistTableRow, NamedTableRow, PlaylistTableRow, TrackTableRow},
    utils,
};

pub async fn search(query: String, kind: SearchKind) {
    let client = super::client().await;

    let pb = super::spinner(&format!("Searching {}s for \"{}\"...", kind, query));
    let results = client.search(&query, kind).await;
    pb.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if results.is_empty() {
        info!("No {} found for \"{}\".", kind, query);
        return;
    }

    let table = match results {
        SearchResults::Artists(artists) => Table::new(artists.into_iter().map(|a| ArtistTableRow {
            genres: utils::join_limited(&a.genres, 3),
            name: a.name,
            id: a.id,
        })),
        SearchResults::Tracks(tracks) => Table::new(tracks.into_iter().map(|t| TrackTableRow {
            artists: t.artist_names().join(", "),
            album: t.album.map(|a| a.name).unwrap_or_default(),
            popularity: t.popularity,
            name: t.name,
        })),
        SearchResults::Albums(albums) => Table::new(albums.into_iter().map(|a| AlbumTableRow {
            artists: a
                .artists
                .iter()
                .map(|ar| ar.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            release_date: a.release_date,
            kind: a.album_type,
            name: a.name,
        })),
        SearchResults::Playlists(playlists) => {
            Table::new(playlists.into_iter().map(|p| PlaylistTableRow {
                owner: p.owner.display_name.unwrap_or(p.owner.id),
                tracks: p.tracks.map(|t| t.total).unwrap_or(0),
                public: p.public.map(|v| v.to_string()).unwrap_or_default(),
                name: p.name,
                id: p.id,
            }))
        }
        SearchResults::Shows(shows) => Table::new(shows.into_iter().map(|s| NamedTableRow {
            detail: format!("{} ({} episodes)", s.publisher, s.total_episodes),
            name: s.name,
            id: s.id,
        })),
        SearchResults::Episodes(episodes) => {
            Table::new(episodes.into_iter().map(|e| NamedTableRow {
                detail: format!("{} {}", e.release_date, utils::format_duration(e.duration_ms)),
                name: e.name,
                id: e.id,
            }))
        }
    };

    println!("{}", table);
}
