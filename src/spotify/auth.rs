use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config,
    error::{Error, Result},
    management::{TokenRefresher, token_from_response},
    server::start_api_server,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the authorize URL for the PKCE flow.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    code_challenge: &str,
    scope: &str,
) -> Result<String> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid auth url '{}': {}", auth_url, e)))?;
    Ok(url.to_string())
}

/// Runs the interactive PKCE flow: starts the callback server, opens the
/// browser and waits up to a minute for the callback to deliver a token.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = authorize_url(
        &config::spotify_apiauth_url(),
        &config::spotify_client_id()?,
        &config::spotify_redirect_uri()?,
        &code_challenge,
        &config::spotify_scope(),
    )?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state, AUTH_TIMEOUT)
        .await
        .ok_or_else(|| Error::Auth("authentication failed or timed out".to_string()))
}

/// Polls the shared state every 250 ms until a token shows up or `max_wait`
/// has passed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    let start = std::time::Instant::now();

    loop {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.clone()) {
                return Some(token);
            }
        }
        if start.elapsed() >= max_wait {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(250).min(max_wait)).await;
    }
}

/// Exchanges an authorization code using the configured endpoints.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    exchange_code(
        &config::spotify_apitoken_url(),
        &config::spotify_client_id()?,
        &config::spotify_redirect_uri()?,
        code,
        verifier,
    )
    .await
}

pub async fn exchange_code(
    token_url: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    verifier: &str,
) -> Result<Token> {
    let response = Client::new()
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?
        .error_for_status()?
        .json::<TokenResponse>()
        .await?;

    Ok(token_from_response(
        response,
        None,
        Utc::now().timestamp() as u64,
    ))
}

/// Refresh-token grant against the accounts service.
pub struct SpotifyRefresher {
    token_url: String,
    client_id: String,
}

impl SpotifyRefresher {
    pub fn new(token_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            config::spotify_apitoken_url(),
            config::spotify_client_id()?,
        ))
    }
}

#[async_trait]
impl TokenRefresher for SpotifyRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let response = Client::new()
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<TokenResponse>().await?)
    }
}
