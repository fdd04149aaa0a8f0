//! # API Module
//!
//! HTTP endpoints of the short-lived local server started by `spotstat auth`.
//!
//! - [`callback`] completes the OAuth 2.0 PKCE flow: it receives the
//!   authorization code from Spotify's redirect, exchanges it together with
//!   the stored code verifier and hands the token back through shared state.
//! - [`health`] reports status and version.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
