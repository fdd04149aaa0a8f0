use super::SpotifyClient;
use crate::{
    error::Result,
    types::{Artist, Paging, TopArtistInfo, TopItems, TopTrackInfo, Track, UserProfile},
};

const TOP_ITEMS_LIMIT: u32 = 10;

impl SpotifyClient {
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.get::<UserProfile>("/me").await
    }

    /// The account's ten top tracks and ten top artists, flattened for display.
    pub async fn top_items(&self) -> Result<TopItems> {
        let limit = [("limit", TOP_ITEMS_LIMIT.to_string())];
        let tracks = self
            .get_query::<Paging<Track>>("/me/top/tracks", &limit)
            .await?
            .into_items();
        let artists = self
            .get_query::<Paging<Artist>>("/me/top/artists", &limit)
            .await?
            .into_items();

        Ok(TopItems {
            tracks: tracks.iter().map(top_track_info).collect(),
            artists: artists
                .iter()
                .map(|artist| TopArtistInfo {
                    name: artist.name.clone(),
                    image_url: artist.images.first().map(|i| i.url.clone()),
                })
                .collect(),
        })
    }
}

fn top_track_info(track: &Track) -> TopTrackInfo {
    TopTrackInfo {
        name: track.name.clone(),
        album: track
            .album
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        artists: track.artist_names().join(", "),
        image_url: track
            .album
            .as_ref()
            .and_then(|a| a.images.first())
            .map(|i| i.url.clone()),
    }
}
