mod auth;
mod login;

pub use auth::FileTokenStore;
pub use auth::MemoryTokenStore;
pub use auth::REFRESH_MARGIN_SECS;
pub use auth::TokenManager;
pub use auth::TokenRefresher;
pub use auth::TokenStore;
pub use auth::needs_refresh;
pub use auth::token_from_response;
pub use login::LoginStore;
pub use login::NewLogin;
