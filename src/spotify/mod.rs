//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API and accounts
//! service, implementing authentication, data retrieval, and playback control
//! functionality. It is the integration layer between the relay's HTTP
//! handlers and Spotify's services, handling all outbound HTTP communication,
//! the OAuth exchanges, and error normalization.
//!
//! ## Architecture
//!
//! The module follows a feature-based organization where each submodule
//! handles a specific domain of Spotify API functionality:
//!
//! ```text
//! Handler Layer (api, management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization-code flow, token refresh)
//!     ├── Listening Data (top tracks, currently playing, followed artists)
//!     ├── Playback Commands (pause, play)
//!     └── Dashboard Aggregation (concurrent fan-out, response shaping)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! [`auth`] - Implements the OAuth 2.0 authorization-code flow:
//! - **Authorization URL**: Deterministic construction with scopes and state
//! - **Code Exchange**: Exchanges callback codes for access/refresh tokens
//! - **Token Refresh**: Obtains fresh access tokens without re-authorization
//! - **Client Authentication**: HTTP Basic with the application credentials
//!
//! [`client`] - The shared resource-API client:
//! - **Bearer Authentication**: Attaches the access token to every call
//! - **Bounded Timeouts**: Every outbound request carries a timeout
//! - **Error Normalization**: Upstream error bodies become typed errors
//!
//! [`tracks`], [`player`], [`artists`] - Resource operations:
//! - `GET /me/top/tracks` - The listener's top tracks
//! - `GET /me/player/currently-playing` - The active playback item
//! - `GET /me/following?type=artist` - Followed artists
//! - `PUT /me/player/pause` - Pause playback
//! - `PUT /me/player/play` - Start playback of a single track
//!
//! [`dashboard`] - Aggregation of the three listening-data reads into one
//! response, issued concurrently and joined all-or-nothing.
//!
//! ## Authentication Strategy
//!
//! The relay is a confidential OAuth client: the client secret lives on the
//! server, so the token endpoint is authenticated with HTTP Basic rather
//! than PKCE. The flow:
//!
//! 1. **Authorization Request**: The user is redirected to Spotify with the
//!    requested scopes and an opaque state value
//! 2. **Callback**: Spotify redirects back with a one-time code
//! 3. **Token Exchange**: The code is exchanged for an access/refresh pair
//! 4. **Refresh**: Expired access tokens are renewed with the refresh grant
//!
//! ## Error Handling Philosophy
//!
//! - **Typed Failures**: Every function returns the crate error type; token
//!   exchanges surface the upstream `error_description`, resource calls the
//!   upstream `error.message`, with generic fallbacks otherwise
//! - **No Swallowing**: Failures always propagate to the caller; retry
//!   decisions (refresh-and-retry on 401) belong to the handler layer
//! - **Timeouts**: Outbound calls are bounded so an unresponsive upstream
//!   cannot suspend a request indefinitely

pub mod artists;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod player;
pub mod tracks;

pub use client::SpotifyClient;
