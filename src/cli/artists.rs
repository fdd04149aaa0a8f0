use tabled::Table;

use crate::{
    error, info, success,
    types::{AlbumTableRow, ArtistTableRow, TrackTableRow},
    utils, warning,
};

/// Lists followed artists sorted by name, optionally filtered.
pub async fn list_artists(search: Option<String>) {
    let client = super::client().await;

    let pb = super::spinner("Fetching followed artists...");
    let artists = client.followed_artists().await;
    pb.finish_and_clear();

    let mut artists = match artists {
        Ok(artists) => artists,
        Err(e) => error!("Failed to load followed artists. Err: {}", e),
    };

    artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    if let Some(artist_search) = search {
        let search_term = artist_search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    if artists.is_empty() {
        info!("No followed artists.");
        return;
    }

    let table_rows: Vec<ArtistTableRow> = artists
        .into_iter()
        .map(|a| ArtistTableRow {
            genres: utils::join_limited(&a.genres, 3),
            name: a.name,
            id: a.id,
        })
        .collect();

    println!("{}", Table::new(table_rows));
}

pub async fn follow_artist(artist_id: String) {
    let client = super::client().await;
    match client.follow_artist(&artist_id).await {
        Ok(()) => success!("Now following {}.", artist_id),
        Err(e) => error!("Failed to follow artist. Err: {}", e),
    }
}

pub async fn unfollow_artist(artist_id: String) {
    let client = super::client().await;
    match client.unfollow_artist(&artist_id).await {
        Ok(()) => success!("Unfollowed {}.", artist_id),
        Err(e) => error!("Failed to unfollow artist. Err: {}", e),
    }
}

/// Details, albums, top tracks and related artists of the best match.
pub async fn artist_overview(name: String) {
    let client = super::client().await;

    let pb = super::spinner(&format!("Looking up \"{}\"...", name));
    let overview = client.artist_overview(&name).await;
    pb.finish_and_clear();

    let overview = match overview {
        Ok(Some(overview)) => overview,
        Ok(None) => {
            warning!("No artist found for \"{}\".", name);
            return;
        }
        Err(e) => error!("Failed to look up artist. Err: {}", e),
    };

    let artist = &overview.artist;
    info!("Artist: {} ({})", artist.name, artist.id);
    info!("Genres: {}", utils::join_limited(&artist.genres, 5));
    info!("Popularity: {}", artist.popularity);
    if let Some(followers) = &artist.followers {
        info!("Followers: {}", followers.total);
    }

    println!(
        "{}",
        Table::new(overview.top_tracks.iter().map(|t| TrackTableRow {
            name: t.name.clone(),
            artists: t.artist_names().join(", "),
            album: t.album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            popularity: t.popularity,
        }))
    );
    println!(
        "{}",
        Table::new(overview.albums.iter().map(|a| AlbumTableRow {
            name: a.name.clone(),
            artists: a
                .artists
                .iter()
                .map(|ar| ar.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            release_date: a.release_date.clone(),
            kind: a.album_type.clone(),
        }))
    );

    if !overview.related.is_empty() {
        let related: Vec<String> = overview.related.iter().map(|a| a.name.clone()).collect();
        info!("Related artists: {}", utils::join_limited(&related, 10));
    }
}
