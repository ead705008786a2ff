use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config,
    error::{Error, Result},
    types::ApiErrorResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const FETCH_ERROR: &str = "Error fetching Spotify data";

/// Client for the Spotify Web API resource endpoints.
///
/// Holds a reused HTTP client and the API base URL. The base URL is taken
/// from configuration by default and injectable for tests, so no call ever
/// reads the environment implicitly. Access tokens are always passed in by
/// the caller.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new() -> Self {
        Self::with_api_url(config::spotify_apiurl())
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues an authenticated GET and returns the raw success response.
    ///
    /// Network failures, timeouts and non-2xx statuses all map to
    /// [`Error::UpstreamFetch`]; the upstream `error.message` is used as the
    /// detail when the error body carries one.
    pub(crate) async fn get(&self, token: &str, path: &str) -> Result<Response> {
        let res = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|_| Error::UpstreamFetch {
                status: None,
                detail: FETCH_ERROR.to_string(),
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::UpstreamFetch {
                status: Some(status),
                detail: error_detail(res, FETCH_ERROR).await,
            });
        }
        Ok(res)
    }

    /// Authenticated GET decoded straight into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T> {
        let res = self.get(token, path).await?;
        read_json(res).await
    }

    /// Issues an authenticated PUT, optionally with a JSON body.
    ///
    /// Failures map to [`Error::UpstreamCommand`] with the given fallback
    /// detail when the upstream provides none of its own.
    pub(crate) async fn put<B: Serialize>(
        &self,
        token: &str,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<()> {
        let mut req = self
            .http
            .put(self.endpoint(path))
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT);
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(|_| Error::UpstreamCommand {
            status: None,
            detail: fallback.to_string(),
        })?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::UpstreamCommand {
                status: Some(status),
                detail: error_detail(res, fallback).await,
            });
        }
        Ok(())
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    res.json().await.map_err(|_| Error::UpstreamFetch {
        status: None,
        detail: FETCH_ERROR.to_string(),
    })
}

async fn error_detail(res: Response, fallback: &str) -> String {
    match res.json::<ApiErrorResponse>().await {
        Ok(body) => body.error.message.unwrap_or_else(|| fallback.to_string()),
        Err(_) => fallback.to_string(),
    }
}
