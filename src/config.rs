//! Configuration management for the Spotify relay server.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials,
//! endpoint URLs and server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. A `.env` file in the working directory (or one named via `--env-file`)
//! 3. Application defaults (where applicable)

use std::{env, path::Path};

use crate::error::{Error, Result};

/// Default port the relay listens on when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Default permission scopes requested during authorization.
///
/// Covers everything the relay endpoints touch: playback state reads and
/// writes, the currently-playing item, followed artists and top tracks.
pub const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state user-read-currently-playing user-follow-read user-top-read streaming";

const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from a `.env` file.
///
/// With an explicit `path` the file must exist and parse; a missing file is
/// reported as a configuration error. Without one, a `.env` in the working
/// directory is loaded when present and silently skipped otherwise, so a
/// fully environment-configured deployment needs no file at all.
///
/// # Errors
///
/// Returns a configuration error if an explicitly requested file cannot be
/// read or parsed.
pub fn load_env(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            dotenv::from_path(p)
                .map_err(|e| Error::Config(format!("cannot load {}: {}", p.display(), e)))?;
        }
        None => {
            let _ = dotenv::dotenv();
        }
    }
    Ok(())
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform.
///
/// # Errors
///
/// Returns a configuration error if the variable is not set.
pub fn spotify_client_id() -> Result<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .map_err(|_| Error::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".into()))
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable. The
/// secret authenticates the token-endpoint exchanges and should never be
/// exposed in logs or version control.
///
/// # Errors
///
/// Returns a configuration error if the variable is not set.
pub fn spotify_client_secret() -> Result<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET")
        .map_err(|_| Error::Config("SPOTIFY_API_AUTH_CLIENT_SECRET must be set".into()))
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_API_REDIRECT_URI` environment variable which
/// specifies the callback URL that Spotify should redirect to after user
/// authorization. This must match the redirect URI registered in the Spotify
/// application settings.
///
/// # Errors
///
/// Returns a configuration error if the variable is not set.
///
/// # Example
///
/// ```
/// let redirect_uri = spotify_redirect_uri()?; // e.g., "http://localhost:5000/callback"
/// ```
pub fn spotify_redirect_uri() -> Result<String> {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .map_err(|_| Error::Config("SPOTIFY_API_REDIRECT_URI must be set".into()))
}

/// Returns the Spotify API scope permissions.
///
/// Retrieves the `SPOTIFY_API_AUTH_SCOPE` environment variable, falling back
/// to [`DEFAULT_SCOPE`] when unset.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_API_AUTH_URL` environment variable, falling back to
/// the public accounts endpoint. This is where users are redirected to grant
/// permissions to the application.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable, falling back
/// to the public accounts endpoint. Authorization codes and refresh tokens
/// are exchanged here.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable, falling back to the
/// public Web API. All resource calls are issued relative to this base.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the port the relay should listen on.
///
/// Retrieves the `PORT` environment variable, falling back to
/// [`DEFAULT_PORT`] when unset.
///
/// # Errors
///
/// Returns a configuration error if `PORT` is set but not a valid port
/// number.
pub fn server_port() -> Result<u16> {
    match env::var("PORT") {
        Ok(v) => v
            .parse::<u16>()
            .map_err(|_| Error::Config(format!("PORT must be a valid port number, got '{}'", v))),
        Err(_) => Ok(DEFAULT_PORT),
    }
}
