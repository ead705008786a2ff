use crate::{
    error::Result,
    spotify::SpotifyClient,
    types::{TopTracksResponse, Track},
};

pub(crate) const TOP_TRACKS_LIMIT: u32 = 10;

impl SpotifyClient {
    /// Retrieves the listener's top tracks from the Spotify Web API.
    ///
    /// The upstream is asked for at most [`TOP_TRACKS_LIMIT`] items; the
    /// response is decoded down to the track list.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    ///
    /// # Returns
    ///
    /// The tracks in the order the upstream ranks them, or an upstream fetch
    /// error.
    pub async fn top_tracks(&self, token: &str) -> Result<Vec<Track>> {
        let path = format!("/me/top/tracks?limit={}", TOP_TRACKS_LIMIT);
        let res: TopTracksResponse = self.get_json(token, &path).await?;
        Ok(res.items)
    }
}
