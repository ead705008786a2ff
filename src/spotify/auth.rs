use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config,
    error::{Error, Result},
    types::{Token, TokenErrorResponse, TokenResponse},
};

const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Everything needed to talk to the Spotify accounts service.
///
/// Bundling the endpoint URLs with the client credentials keeps the token
/// exchanges free of hidden environment reads, so tests can point a config
/// at a mock server.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
}

impl AuthConfig {
    /// Builds an [`AuthConfig`] from the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client ID, client secret or
    /// redirect URI is missing. The endpoint URLs and scope fall back to
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        Ok(AuthConfig {
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret()?,
            redirect_uri: config::spotify_redirect_uri()?,
            auth_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
            scope: config::spotify_scope(),
        })
    }
}

/// Constructs the Spotify authorization URL the user is redirected to.
///
/// Pure URL construction with `response_type=code`, the client ID, the
/// space-joined scopes, the redirect URI and an optional `state` value, all
/// percent-encoded. No network is touched.
///
/// # Errors
///
/// Returns a configuration error if the configured authorization URL cannot
/// be parsed as a URL.
///
/// # Example
///
/// ```
/// let url = build_authorize_url(&config, Some("opaque-state"))?;
/// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
/// ```
pub fn build_authorize_url(config: &AuthConfig, state: Option<&str>) -> Result<String> {
    let mut params = vec![
        ("response_type", "code"),
        ("client_id", config.client_id.as_str()),
        ("scope", config.scope.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];
    if let Some(state) = state {
        params.push(("state", state));
    }

    let url = Url::parse_with_params(&config.auth_url, &params)
        .map_err(|e| Error::Config(format!("invalid authorization URL: {}", e)))?;
    Ok(url.to_string())
}

/// Exchanges an authorization code for an access token.
///
/// Completes the OAuth 2.0 authorization-code flow by posting the code to
/// the token endpoint, authenticated with HTTP Basic client credentials.
/// This is the final step in the authentication process.
///
/// # Arguments
///
/// * `config` - Accounts-service endpoints and client credentials
/// * `code` - Authorization code received from the OAuth callback
///
/// # Returns
///
/// A complete [`Token`] with access token, refresh token, granted scope and
/// expiry metadata stamped with the current time.
///
/// # Errors
///
/// Fails with an authorization-exchange error when the request cannot be
/// sent or the upstream rejects the code; the upstream `error_description`
/// is surfaced when present.
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly. The exchange
/// should happen immediately after receiving the code.
pub async fn exchange_code(config: &AuthConfig, code: &str) -> Result<Token> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .timeout(TOKEN_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::AuthorizationExchange(e.to_string()))?;

    parse_token_response(res)
        .await
        .map_err(Error::AuthorizationExchange)
}

/// Exchanges a refresh token for a new access token.
///
/// Uses the `refresh_token` grant so the relay can maintain authenticated
/// access without sending the user back through the consent screen.
///
/// # Arguments
///
/// * `config` - Accounts-service endpoints and client credentials
/// * `refresh_token` - Valid refresh token obtained from a previous exchange
///
/// # Returns
///
/// A [`Token`] carrying the fresh access token. Spotify does not always
/// rotate the refresh token; when it is omitted from the response the
/// returned token's `refresh_token` is `None` and the caller keeps the old
/// one.
///
/// # Errors
///
/// Fails with a refresh error when the request cannot be sent or the
/// upstream rejects the grant.
pub async fn refresh_token(config: &AuthConfig, refresh_token: &str) -> Result<Token> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .timeout(TOKEN_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::Refresh(e.to_string()))?;

    parse_token_response(res).await.map_err(Error::Refresh)
}

async fn parse_token_response(res: reqwest::Response) -> std::result::Result<Token, String> {
    let status = res.status();
    if !status.is_success() {
        let detail = match res.json::<TokenErrorResponse>().await {
            Ok(body) => body.error_description.unwrap_or(body.error),
            Err(_) => format!("token endpoint returned {}", status),
        };
        return Err(detail);
    }

    let body: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(Token {
        access_token: body.access_token,
        refresh_token: body.refresh_token,
        scope: body.scope,
        expires_in: body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
