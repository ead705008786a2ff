use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    spotify::auth::{self, AuthConfig},
    types::Token,
};

const STALE_MARGIN_SECS: u64 = 240;

/// Single source of truth for the credential pair. All mutations go through
/// one lock, so readers never observe a half-written token.
pub struct TokenManager {
    config: Option<AuthConfig>,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    pub fn new() -> Self {
        TokenManager {
            config: None,
            token: Mutex::new(None),
        }
    }

    /// Uses a fixed auth config instead of reading the environment.
    pub fn with_config(config: AuthConfig) -> Self {
        TokenManager {
            config: Some(config),
            token: Mutex::new(None),
        }
    }

    fn auth_config(&self) -> Result<AuthConfig> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => AuthConfig::from_env(),
        }
    }

    pub fn authorize_url(&self, state: Option<&str>) -> Result<String> {
        let config = self.auth_config()?;
        auth::build_authorize_url(&config, state)
    }

    pub async fn is_authorized(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Returns the access token currently held. Never touches the network.
    pub async fn access_token(&self) -> Result<String> {
        match self.token.lock().await.as_ref() {
            Some(token) => Ok(token.access_token.clone()),
            None => Err(Error::Unauthorized),
        }
    }

    /// Exchanges an authorization code and replaces the stored credential
    /// pair with the result. A failed exchange leaves the stored state
    /// untouched.
    pub async fn complete_authorization(&self, code: &str) -> Result<Token> {
        if code.is_empty() {
            return Err(Error::AuthorizationExchange(
                "authorization code is missing".into(),
            ));
        }
        let config = self
            .auth_config()
            .map_err(|e| Error::AuthorizationExchange(e.to_string()))?;

        // hold the lock across the exchange so a refresh in flight cannot interleave
        let mut held = self.token.lock().await;
        let token = auth::exchange_code(&config, code).await?;
        *held = Some(token.clone());
        Ok(token)
    }

    /// Obtains a new access token with the stored refresh token.
    pub async fn refresh(&self) -> Result<String> {
        let config = self.auth_config().map_err(|e| Error::Refresh(e.to_string()))?;
        let mut held = self.token.lock().await;
        Self::refresh_held(&config, &mut held).await
    }

    /// Returns an access token that is not about to expire, refreshing the
    /// stored one first when it is within the staleness margin.
    pub async fn valid_access_token(&self) -> Result<String> {
        let mut held = self.token.lock().await;
        let token = held.as_ref().ok_or(Error::Unauthorized)?;
        if !is_stale(token) {
            return Ok(token.access_token.clone());
        }

        let config = self.auth_config().map_err(|e| Error::Refresh(e.to_string()))?;
        Self::refresh_held(&config, &mut held).await
    }

    async fn refresh_held(config: &AuthConfig, held: &mut Option<Token>) -> Result<String> {
        let current = held
            .clone()
            .ok_or_else(|| Error::Refresh("no refresh token held".into()))?;
        let refresh_token = current
            .refresh_token
            .clone()
            .ok_or_else(|| Error::Refresh("no refresh token held".into()))?;

        let fresh = auth::refresh_token(config, &refresh_token).await?;

        // Spotify does not always rotate the refresh token; keep the old one
        // unless the response carries a replacement.
        let updated = Token {
            access_token: fresh.access_token,
            refresh_token: fresh.refresh_token.or(Some(refresh_token)),
            scope: fresh.scope.or(current.scope),
            expires_in: fresh.expires_in,
            obtained_at: fresh.obtained_at,
        };
        let access_token = updated.access_token.clone();
        *held = Some(updated);
        Ok(access_token)
    }
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_stale(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    // expires_in is upstream-controlled and may be arbitrarily large
    now + STALE_MARGIN_SECS >= token.obtained_at.saturating_add(token.expires_in)
}
