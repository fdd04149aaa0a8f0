//! # Spotify Integration Module
//!
//! Thin client over the Spotify Web API covering what spotstat needs:
//!
//! ```text
//! CLI layer
//!     ↓
//! SpotifyClient
//!     ├── auth      (OAuth 2.0 PKCE, token exchange and refresh)
//!     ├── user      (profile, top items)
//!     ├── search    (catalogue search with relevance ranking)
//!     ├── artists   (followed artists, follow/unfollow, overview)
//!     └── playlist  (list, inspect, create, edit, follow, add/remove tracks)
//!     ↓
//! reqwest + serde_json
//! ```
//!
//! All calls return [`crate::Result`]. Non-success HTTP statuses surface as
//! [`crate::Error::Http`]; nothing is retried.

use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config,
    error::Result,
    management::{FileTokenStore, TokenManager},
};

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod search;
pub mod user;

pub use search::{SearchKind, SearchResults};

/// Authenticated handle on the Web API.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Client for the configured API URL using the stored token, refreshed
    /// first if it is about to expire.
    pub async fn from_env() -> Result<Self> {
        let refresher = auth::SpotifyRefresher::from_env()?;
        let mut token_mgr =
            TokenManager::load(Arc::new(FileTokenStore::default()), Arc::new(refresher)).await?;
        let token = token_mgr.get_valid_token().await?;
        Ok(Self::new(config::spotify_apiurl(), token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_absolute(&self.url(path)).await
    }

    async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// GET on a full URL, as handed out in `next` pagination links.
    async fn get_absolute<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response> {
        let mut request = self
            .http
            .request(method, self.url(path))
            .query(query)
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?.error_for_status()?)
    }
}
