use reqwest::Method;
use serde_json::json;

use super::{SearchKind, SpotifyClient};
use crate::{
    error::Result,
    types::{
        AddTrackToPlaylistRequest, CreatePlaylistRequest, EditPlaylistRequest, Paging, Playlist,
        PlaylistItem, PlaylistTrackInfo, RemoveTracksRequest, SnapshotResponse, Track, TrackUri,
    },
};

const PLAYLISTS_PAGE_SIZE: u32 = 50;

impl SpotifyClient {
    /// Playlists owned or followed by the current user (first page of 50).
    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self
            .get_query::<Paging<Playlist>>(
                "/me/playlists",
                &[("limit", PLAYLISTS_PAGE_SIZE.to_string())],
            )
            .await?
            .into_items())
    }

    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.get::<Playlist>(&format!("/playlists/{}", playlist_id))
            .await
    }

    /// All items of a playlist, following `next` links to the end.
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        let mut page = self
            .get::<Paging<PlaylistItem>>(&format!("/playlists/{}/tracks", playlist_id))
            .await?;
        let mut items = Vec::new();

        loop {
            let next = page.next.take();
            items.extend(page.into_items());
            match next {
                Some(url) => page = self.get_absolute::<Paging<PlaylistItem>>(&url).await?,
                None => break,
            }
        }

        Ok(items)
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<PlaylistTrackInfo>> {
        let items = self.playlist_items(playlist_id).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| PlaylistTrackInfo {
                artists: track.artist_names(),
                album: track
                    .album
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                id: track.id,
                name: track.name,
                duration_ms: track.duration_ms,
                preview_url: track.preview_url,
            })
            .collect())
    }

    pub async fn create_playlist(&self, name: &str, description: &str, public: bool) -> Result<Playlist> {
        let user = self.current_user().await?;
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
        };

        let response = self
            .send(
                Method::POST,
                &format!("/users/{}/playlists", user.id),
                &[],
                Some(&body),
            )
            .await?;
        Ok(response.json::<Playlist>().await?)
    }

    /// Changes only the fields that are `Some`.
    pub async fn edit_playlist(&self, playlist_id: &str, changes: &EditPlaylistRequest) -> Result<()> {
        self.send(
            Method::PUT,
            &format!("/playlists/{}", playlist_id),
            &[],
            Some(changes),
        )
        .await?;
        Ok(())
    }

    pub async fn follow_playlist(&self, playlist_id: &str) -> Result<()> {
        self.send(
            Method::PUT,
            &format!("/playlists/{}/followers", playlist_id),
            &[],
            Some(&json!({ "public": true })),
        )
        .await?;
        Ok(())
    }

    /// Adds the best catalogue hit for `song_name`. Returns `false` when the
    /// search finds no track.
    pub async fn add_to_playlist(&self, playlist_id: &str, song_name: &str) -> Result<bool> {
        let response = self.search_raw(song_name, SearchKind::Track, Some(1)).await?;
        let Some(track) = response
            .tracks
            .and_then(|p| p.into_items().into_iter().next())
        else {
            return Ok(false);
        };
        let Some(uri) = track_uri(&track) else {
            return Ok(false);
        };

        let body = AddTrackToPlaylistRequest { uris: vec![uri] };
        self.send(
            Method::POST,
            &format!("/playlists/{}/tracks", playlist_id),
            &[],
            Some(&body),
        )
        .await?
        .json::<SnapshotResponse>()
        .await?;
        Ok(true)
    }

    /// Removes every occurrence of the first playlist track whose name
    /// contains `song_name` (case-insensitive) and that has a URI. Returns
    /// `false` when no track matches.
    pub async fn remove_from_playlist(&self, playlist_id: &str, song_name: &str) -> Result<bool> {
        let needle = song_name.to_lowercase();
        let items = self.playlist_items(playlist_id).await?;
        let Some(uri) = items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .filter(|track| track.name.to_lowercase().contains(&needle))
            .find_map(track_uri)
        else {
            return Ok(false);
        };

        let body = RemoveTracksRequest {
            tracks: vec![TrackUri { uri }],
        };
        self.send(
            Method::DELETE,
            &format!("/playlists/{}/tracks", playlist_id),
            &[],
            Some(&body),
        )
        .await?;
        Ok(true)
    }
}

fn track_uri(track: &Track) -> Option<String> {
    if !track.uri.is_empty() {
        return Some(track.uri.clone());
    }
    track.id.as_ref().map(|id| format!("spotify:track:{}", id))
}
