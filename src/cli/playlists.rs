use tabled::{Table, Tabled};

use crate::{
    error, info, success,
    types::{EditPlaylistRequest, PlaylistTableRow},
    utils, warning,
};

#[derive(Tabled)]
struct PlaylistTrackRow {
    name: String,
    artists: String,
    album: String,
    duration: String,
}

pub async fn list_playlists() {
    let client = super::client().await;

    let pb = super::spinner("Fetching playlists...");
    let playlists = client.playlists().await;
    pb.finish_and_clear();

    let playlists = match playlists {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to load playlists. Err: {}", e),
    };

    if playlists.is_empty() {
        info!("No playlists.");
        return;
    }

    println!(
        "{}",
        Table::new(playlists.into_iter().map(|p| PlaylistTableRow {
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            tracks: p.tracks.map(|t| t.total).unwrap_or(0),
            public: p.public.map(|v| v.to_string()).unwrap_or_default(),
            name: p.name,
            id: p.id,
        }))
    );
}

pub async fn show_playlist(playlist_id: String) {
    let client = super::client().await;

    let playlist = match client.playlist(&playlist_id).await {
        Ok(playlist) => playlist,
        Err(e) => error!("Failed to load playlist {}. Err: {}", playlist_id, e),
    };
    info!("Playlist: {}", playlist.name);
    if let Some(description) = playlist.description.filter(|d| !d.is_empty()) {
        info!("Description: {}", description);
    }

    let pb = super::spinner("Fetching tracks...");
    let tracks = client.playlist_tracks(&playlist_id).await;
    pb.finish_and_clear();

    match tracks {
        Ok(tracks) if tracks.is_empty() => info!("Playlist is empty."),
        Ok(tracks) => println!(
            "{}",
            Table::new(tracks.into_iter().map(|t| PlaylistTrackRow {
                artists: t.artists.join(", "),
                duration: utils::format_duration(t.duration_ms),
                name: t.name,
                album: t.album,
            }))
        ),
        Err(e) => error!("Failed to load tracks. Err: {}", e),
    }
}

pub async fn create_playlist(name: String, description: String, public: bool) {
    let client = super::client().await;
    match client.create_playlist(&name, &description, public).await {
        Ok(playlist) => success!("Playlist {} created ({}).", playlist.name, playlist.id),
        Err(e) => error!("Failed to create playlist. Err: {}", e),
    }
}

pub async fn edit_playlist(playlist_id: String, changes: EditPlaylistRequest) {
    if changes.name.is_none() && changes.description.is_none() && changes.public.is_none() {
        warning!("Nothing to change.");
        return;
    }

    let client = super::client().await;
    match client.edit_playlist(&playlist_id, &changes).await {
        Ok(()) => success!("Playlist {} updated.", playlist_id),
        Err(e) => error!("Failed to update playlist. Err: {}", e),
    }
}

pub async fn follow_playlist(playlist_id: String) {
    let client = super::client().await;
    match client.follow_playlist(&playlist_id).await {
        Ok(()) => success!("Now following playlist {}.", playlist_id),
        Err(e) => error!("Failed to follow playlist. Err: {}", e),
    }
}

pub async fn add_to_playlist(playlist_id: String, song: String) {
    let client = super::client().await;
    match client.add_to_playlist(&playlist_id, &song).await {
        Ok(true) => success!("Added \"{}\" to playlist.", song),
        Ok(false) => warning!("No track found for \"{}\".", song),
        Err(e) => error!("Failed to add track. Err: {}", e),
    }
}

pub async fn remove_from_playlist(playlist_id: String, song: String) {
    let client = super::client().await;
    match client.remove_from_playlist(&playlist_id, &song).await {
        Ok(true) => success!("Removed \"{}\" from playlist.", song),
        Ok(false) => warning!("\"{}\" is not in this playlist.", song),
        Err(e) => error!("Failed to remove track. Err: {}", e),
    }
}
