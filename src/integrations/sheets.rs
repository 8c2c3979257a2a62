//! Google Sheets access for the roster import.
//!
//! The bot authenticates as an installed OAuth2 application. The
//! `authorize_sheets` binary performs the one-time consent flow and writes the
//! token cache; afterwards the access token is refreshed from the cached
//! refresh token whenever it is about to expire.

use crate::{
    config::settings::SheetsConfig,
    errors::{Error, Result},
};
use chrono::{DateTime, TimeDelta, Utc};
use oauth2::{
    AuthUrl, Client, ClientId, ClientSecret, EmptyExtraTokenFields, EndpointNotSet, EndpointSet,
    RedirectUrl, RefreshToken, RevocationErrorResponseType, StandardErrorResponse,
    StandardRevocableToken, StandardTokenIntrospectionResponse, StandardTokenResponse,
    TokenResponse, TokenUrl,
    basic::{BasicClient, BasicErrorResponseType, BasicTokenType},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Read-only access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const SHEETS_API: &str = "https://sheets.googleapis.com/";
const SERVICE: &str = "Google Sheets";

/// Refresh this long before the recorded expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth2 client with the authorization and token endpoints set.
pub type GoogleOAuthClient = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Client secrets from a Google `credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

/// Contents of the token cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Builds a cache entry from a token endpoint response.
    ///
    /// Google omits the refresh token on refresh responses, so the previous
    /// one is kept when the response has none.
    #[must_use]
    pub fn from_response<T: TokenResponse>(
        response: &T,
        previous_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = response
            .expires_in()
            .and_then(|d| TimeDelta::from_std(d).ok())
            .map(|d| now + d);
        Self {
            access_token: response.access_token().secret().clone(),
            refresh_token: response
                .refresh_token()
                .map(|t| t.secret().clone())
                .or(previous_refresh),
            expires_at,
        }
    }

    /// True while the access token can still be used at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at - TimeDelta::seconds(EXPIRY_MARGIN_SECS) > now)
    }
}

/// Reads client secrets from `path`.
pub fn load_client_secrets(path: &Path) -> Result<ClientSecrets> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    parse_client_secrets(&contents)
}

fn parse_client_secrets(contents: &str) -> Result<ClientSecrets> {
    let file: CredentialsFile = serde_json::from_str(contents)?;
    file.installed.or(file.web).ok_or_else(|| Error::Config {
        message: "credentials file has neither an 'installed' nor a 'web' section".to_string(),
    })
}

/// Reads the token cache. `Ok(None)` when the file does not exist.
pub fn load_token(path: &Path) -> Result<Option<CachedToken>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes the token cache.
pub fn save_token(path: &Path, token: &CachedToken) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

fn config_error(what: &str, e: impl std::fmt::Display) -> Error {
    Error::Config {
        message: format!("Invalid {what} in credentials: {e}"),
    }
}

/// Builds the OAuth2 client from the client secrets.
pub fn oauth_client(secrets: &ClientSecrets) -> Result<GoogleOAuthClient> {
    let redirect = secrets
        .redirect_uris
        .first()
        .map_or("http://localhost", String::as_str);

    Ok(BasicClient::new(ClientId::new(secrets.client_id.clone()))
        .set_client_secret(ClientSecret::new(secrets.client_secret.clone()))
        .set_auth_uri(AuthUrl::new(secrets.auth_uri.clone()).map_err(|e| config_error("auth_uri", e))?)
        .set_token_uri(TokenUrl::new(secrets.token_uri.clone()).map_err(|e| config_error("token_uri", e))?)
        .set_redirect_uri(RedirectUrl::new(redirect.to_string()).map_err(|e| config_error("redirect_uri", e))?))
}

fn oauth_error(e: impl std::fmt::Display) -> Error {
    Error::ExternalApi {
        service: "Google OAuth",
        message: e.to_string(),
    }
}

/// Returns a usable access token, refreshing and re-caching it if needed.
pub async fn access_token(
    config: &SheetsConfig,
    http: &reqwest::Client,
    now: DateTime<Utc>,
) -> Result<String> {
    let cached = load_token(&config.token_path)?.ok_or_else(|| Error::Config {
        message: "Google Sheets is not authorized. Run authorize_sheets first.".to_string(),
    })?;
    if cached.is_fresh(now) {
        debug!("Using cached Google access token");
        return Ok(cached.access_token);
    }

    let refresh = cached.refresh_token.ok_or_else(|| Error::Config {
        message: "Cached Google token has no refresh token. Run authorize_sheets again."
            .to_string(),
    })?;

    let secrets = load_client_secrets(&config.credentials_path)?;
    let response = oauth_client(&secrets)?
        .exchange_refresh_token(&RefreshToken::new(refresh.clone()))
        .request_async(http)
        .await
        .map_err(oauth_error)?;

    let token = CachedToken::from_response(&response, Some(refresh), now);
    save_token(&config.token_path, &token)?;
    info!("Refreshed Google access token");
    Ok(token.access_token)
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Fetches the cells of `sheet!range` from a spreadsheet.
pub async fn fetch_values(
    http: &reqwest::Client,
    access_token: &str,
    spreadsheet_id: &str,
    sheet_name: &str,
    range: &str,
) -> Result<Vec<Vec<String>>> {
    let mut url = reqwest::Url::parse(SHEETS_API).map_err(|e| config_error("API url", e))?;
    url.path_segments_mut()
        .map_err(|()| config_error("API url", "cannot be a base"))?
        .extend([
            "v4",
            "spreadsheets",
            spreadsheet_id,
            "values",
            &format!("{sheet_name}!{range}"),
        ]);

    let response = http.get(url).bearer_auth(access_token).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::ExternalApi {
            service: SERVICE,
            message: format!("{status}: {body}"),
        });
    }

    let values: ValueRange = response.json().await?;
    Ok(values.values)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_installed_credentials() {
        let json = r#"{"installed":{"client_id":"id.apps.googleusercontent.com","project_id":"p",
            "auth_uri":"https://accounts.google.com/o/oauth2/auth",
            "token_uri":"https://oauth2.googleapis.com/token",
            "client_secret":"shh","redirect_uris":["http://localhost"]}}"#;
        let secrets = parse_client_secrets(json).unwrap();
        assert_eq!(secrets.client_id, "id.apps.googleusercontent.com");
        assert_eq!(secrets.redirect_uris, vec!["http://localhost"]);
        assert!(oauth_client(&secrets).is_ok());

        assert!(matches!(
            parse_client_secrets("{}"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_token_freshness() {
        let now = Utc::now();
        let token = CachedToken {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: Some(now + TimeDelta::minutes(10)),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + TimeDelta::minutes(9) + TimeDelta::seconds(30)));

        let unknown = CachedToken {
            expires_at: None,
            ..token
        };
        assert!(!unknown.is_fresh(now));
    }

    #[test]
    fn test_token_cache_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("chb-token-{}.json", std::process::id()));
        assert_eq!(load_token(&path)?, None);

        let token = CachedToken {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: None,
        };
        save_token(&path, &token)?;
        assert_eq!(load_token(&path)?, Some(token));
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_value_range_without_values() {
        let parsed: ValueRange = serde_json::from_str(r#"{"range":"A1:B2"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }
}
