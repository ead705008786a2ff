use crate::{
    error::Result,
    spotify::SpotifyClient,
    types::{Artist, FollowedArtistsResponse},
};

impl SpotifyClient {
    /// Retrieves the artists the listener follows.
    ///
    /// A single page is enough for the dashboard view; the upstream's cursor
    /// pagination is not walked.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    pub async fn followed_artists(&self, token: &str) -> Result<Vec<Artist>> {
        let res: FollowedArtistsResponse =
            self.get_json(token, "/me/following?type=artist").await?;
        Ok(res.artists.items)
    }
}
