use reqwest::StatusCode;

use super::client::read_json;
use crate::{
    error::{Error, Result},
    spotify::SpotifyClient,
    types::{CurrentlyPlayingResponse, StartPlaybackRequest},
};

const PAUSE_ERROR: &str = "Error pausing playback";
const PLAY_ERROR: &str = "Error playing track";

impl SpotifyClient {
    /// Retrieves the name of the currently playing item, if any.
    ///
    /// Spotify answers `204 No Content` when nothing is active; that and a
    /// body without an item both come back as `None`, leaving the fallback
    /// wording to the caller.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    pub async fn currently_playing(&self, token: &str) -> Result<Option<String>> {
        let res = self.get(token, "/me/player/currently-playing").await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body: CurrentlyPlayingResponse = read_json(res).await?;
        Ok(body.item.map(|item| item.name))
    }

    /// Pauses playback on the listener's active device.
    ///
    /// # Errors
    ///
    /// Fails with an upstream command error on any non-2xx response; the
    /// upstream error body is preserved when present.
    pub async fn pause(&self, token: &str) -> Result<()> {
        self.put::<()>(token, "/me/player/pause", None, PAUSE_ERROR)
            .await
    }

    /// Starts playback of exactly one track.
    ///
    /// The upstream receives a singleton play queue containing `uri`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error when `uri` is empty, before any
    /// outbound call is made, and with an upstream command error when the
    /// upstream rejects the request.
    pub async fn play(&self, token: &str, uri: &str) -> Result<()> {
        if uri.is_empty() {
            return Err(Error::InvalidArgument("uri is required".into()));
        }

        let body = StartPlaybackRequest {
            uris: vec![uri.to_string()],
        };
        self.put(token, "/me/player/play", Some(&body), PLAY_ERROR)
            .await
    }
}
