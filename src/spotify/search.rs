use std::fmt;

use clap::ValueEnum;

use super::SpotifyClient;
use crate::{
    error::Result,
    ranking,
    types::{Album, Artist, Episode, Playlist, SearchResponse, Show, Track},
};

const ARTIST_SEARCH_LIMIT: u32 = 10;
const TRACK_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    Artist,
    Track,
    Album,
    Playlist,
    Show,
    Episode,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchKind::Artist => "artist",
            SearchKind::Track => "track",
            SearchKind::Album => "album",
            SearchKind::Playlist => "playlist",
            SearchKind::Show => "show",
            SearchKind::Episode => "episode",
        };
        write!(f, "{}", s)
    }
}

impl SearchKind {
    fn limit(&self) -> Option<u32> {
        match self {
            SearchKind::Artist => Some(ARTIST_SEARCH_LIMIT),
            SearchKind::Track => Some(TRACK_SEARCH_LIMIT),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchResults {
    Artists(Vec<Artist>),
    Tracks(Vec<Track>),
    Albums(Vec<Album>),
    Playlists(Vec<Playlist>),
    Shows(Vec<Show>),
    Episodes(Vec<Episode>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Artists(items) => items.len(),
            SearchResults::Tracks(items) => items.len(),
            SearchResults::Albums(items) => items.len(),
            SearchResults::Playlists(items) => items.len(),
            SearchResults::Shows(items) => items.len(),
            SearchResults::Episodes(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Picks the section matching `kind` out of a raw response. Track and
    /// album hits are run through the relevance ranking.
    pub fn from_response(response: SearchResponse, kind: SearchKind, query: &str) -> Self {
        match kind {
            SearchKind::Artist => Self::Artists(items(response.artists)),
            SearchKind::Track => {
                Self::Tracks(ranking::rank_track_results(items(response.tracks), query))
            }
            SearchKind::Album => {
                Self::Albums(ranking::rank_album_results(items(response.albums), query))
            }
            SearchKind::Playlist => Self::Playlists(items(response.playlists)),
            SearchKind::Show => Self::Shows(items(response.shows)),
            SearchKind::Episode => Self::Episodes(items(response.episodes)),
        }
    }
}

fn items<T>(paging: Option<crate::types::Paging<T>>) -> Vec<T> {
    paging.map(|p| p.into_items()).unwrap_or_default()
}

impl SpotifyClient {
    /// Raw `GET /search` for a single item type.
    pub async fn search_raw(&self, query: &str, kind: SearchKind, limit: Option<u32>) -> Result<SearchResponse> {
        let mut params = vec![("q", query.to_string()), ("type", kind.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_query::<SearchResponse>("/search", &params).await
    }

    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResults> {
        let response = self.search_raw(query, kind, kind.limit()).await?;
        Ok(SearchResults::from_response(response, kind, query))
    }
}
