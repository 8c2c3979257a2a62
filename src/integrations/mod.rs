//! Outbound HTTP integrations.

/// Google Sheets values API with a disk-cached OAuth2 token
pub mod sheets;
/// Wise Old Man competition API
pub mod wom;

/// Builds the shared HTTP client.
///
/// Redirects are disabled; the OAuth2 token exchange requires it.
pub fn http_client() -> crate::errors::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("coffee-house-bot/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Into::into)
}
