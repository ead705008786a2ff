use super::tracks::TOP_TRACKS_LIMIT;
use crate::{
    error::Result,
    spotify::SpotifyClient,
    types::{Dashboard, DashboardTrack},
    utils,
};

/// Shown as `nowPlaying` when the upstream reports no active item.
pub const NOTHING_PLAYING: &str = "Nothing playing";

impl SpotifyClient {
    /// Aggregates the listener's dashboard view.
    ///
    /// Issues the three reads (top tracks, currently playing, followed
    /// artists) concurrently and joins them all-or-nothing: the first
    /// failure fails the whole call and no partial dashboard is ever
    /// produced. On success the raw responses are shaped for the client:
    /// tracks are capped at [`TOP_TRACKS_LIMIT`] and carry a ", "-joined
    /// artist list, artists reduce to their names.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    pub async fn dashboard(&self, token: &str) -> Result<Dashboard> {
        let (tracks, playing, artists) = tokio::try_join!(
            self.top_tracks(token),
            self.currently_playing(token),
            self.followed_artists(token),
        )?;

        let top_tracks = tracks
            .into_iter()
            .take(TOP_TRACKS_LIMIT as usize)
            .map(|track| DashboardTrack {
                name: track.name,
                artist: utils::join_artist_names(&track.artists),
                uri: track.uri,
            })
            .collect();

        Ok(Dashboard {
            top_tracks,
            now_playing: playing.unwrap_or_else(|| NOTHING_PLAYING.to_string()),
            followed_artists: artists.into_iter().map(|artist| artist.name).collect(),
        })
    }
}
