use reqwest::Method;

use super::{SearchKind, SpotifyClient};
use crate::{
    error::Result,
    types::{
        Album, Artist, ArtistOverview, FollowedArtistsResponse, Paging, RelatedArtistsResponse,
        TopTracksResponse,
    },
};

const FOLLOWED_PAGE_SIZE: usize = 50;
const TOP_TRACKS_MARKET: &str = "US";

impl SpotifyClient {
    /// One page of followed artists, starting after the `after` cursor.
    pub async fn followed_artists_page(
        &self,
        limit: usize,
        after: Option<&str>,
    ) -> Result<FollowedArtistsResponse> {
        let mut params = vec![("type", "artist".to_string()), ("limit", limit.to_string())];
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }
        self.get_query::<FollowedArtistsResponse>("/me/following", &params)
            .await
    }

    /// Every followed artist. Paging stops at the first short page.
    pub async fn followed_artists(&self) -> Result<Vec<Artist>> {
        let mut all_artists = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = self
                .followed_artists_page(FOLLOWED_PAGE_SIZE, after.as_deref())
                .await?;
            let artists = page.artists.items;
            let short_page = artists.len() < FOLLOWED_PAGE_SIZE;
            after = artists.last().map(|a| a.id.clone());
            all_artists.extend(artists);

            if short_page || after.is_none() {
                break;
            }
        }

        Ok(all_artists)
    }

    pub async fn follow_artist(&self, artist_id: &str) -> Result<()> {
        self.change_follow(Method::PUT, artist_id).await
    }

    pub async fn unfollow_artist(&self, artist_id: &str) -> Result<()> {
        self.change_follow(Method::DELETE, artist_id).await
    }

    async fn change_follow(&self, method: Method, artist_id: &str) -> Result<()> {
        let params = [("type", "artist".to_string()), ("ids", artist_id.to_string())];
        self.send::<()>(method, "/me/following", &params, None).await?;
        Ok(())
    }

    /// Details, albums, top tracks and related artists of the first artist
    /// matching `name`. `None` when the search finds nothing.
    pub async fn artist_overview(&self, name: &str) -> Result<Option<ArtistOverview>> {
        let response = self.search_raw(name, SearchKind::Artist, Some(10)).await?;
        let Some(first) = response
            .artists
            .and_then(|p| p.into_items().into_iter().next())
        else {
            return Ok(None);
        };

        let id = first.id;
        let artist = self.get::<Artist>(&format!("/artists/{}", id)).await?;
        let albums = self
            .get::<Paging<Album>>(&format!("/artists/{}/albums", id))
            .await?
            .into_items();
        let top_tracks = self
            .get_query::<TopTracksResponse>(
                &format!("/artists/{}/top-tracks", id),
                &[("market", TOP_TRACKS_MARKET.to_string())],
            )
            .await?
            .tracks;
        let related = self
            .get::<RelatedArtistsResponse>(&format!("/artists/{}/related-artists", id))
            .await?
            .artists;

        Ok(Some(ArtistOverview {
            artist,
            albums,
            top_tracks,
            related,
        }))
    }
}
