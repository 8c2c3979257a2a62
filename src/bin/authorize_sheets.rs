//! One-time Google Sheets authorization.
//!
//! Prints the consent URL, reads the authorization code pasted back by the
//! operator, and writes the token cache the bot refreshes from afterwards.

use chrono::Utc;
use coffee_house_bot::{
    config::settings::{config_path, load_config},
    errors::{Error, Result},
    integrations::{
        http_client,
        sheets::{self, CachedToken, SHEETS_SCOPE},
    },
};
use dotenvy::dotenv;
use oauth2::{AuthorizationCode, CsrfToken, Scope};
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    dotenv().ok();

    let config = load_config(config_path())?;
    let secrets = sheets::load_client_secrets(&config.sheets.credentials_path)
        .inspect_err(|e| error!("Failed to load client secrets: {e}"))?;
    let client = sheets::oauth_client(&secrets)?;

    // Offline access with forced consent so Google always returns a refresh token.
    let (url, _csrf) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(SHEETS_SCOPE.to_string()))
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .url();

    println!("Open this URL in a browser and approve access:\n\n{url}\n");
    print!("Paste the authorization code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::validation("No authorization code entered."));
    }

    let response = client
        .exchange_code(AuthorizationCode::new(code.to_string()))
        .request_async(&http_client()?)
        .await
        .map_err(|e| Error::ExternalApi {
            service: "Google OAuth",
            message: e.to_string(),
        })?;

    let token = CachedToken::from_response(&response, None, Utc::now());
    if token.refresh_token.is_none() {
        error!("Google returned no refresh token; the cache will expire within the hour");
    }
    sheets::save_token(&config.sheets.token_path, &token)?;
    info!("Saved token cache to {}", config.sheets.token_path.display());
    Ok(())
}
