//! # API Module
//!
//! This module provides the HTTP endpoints the relay exposes to its own
//! clients. The handlers are thin adapters: they translate requests into
//! calls on the token manager and the Spotify client and translate the
//! results (or typed errors) back into HTTP responses.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Redirects the user to Spotify's consent screen with the
//!   configured scopes and a fresh state value.
//! - [`callback`] - Handles the redirect back from Spotify, exchanging the
//!   authorization code for the credential pair.
//!
//! ### Listening data and playback
//!
//! - [`dashboard`] - Aggregated top tracks, now-playing and followed
//!   artists.
//! - [`pause`] / [`play`] - Playback commands proxied to the upstream.
//!
//! Each of these requires a stored credential pair and answers 401 before
//! touching the network when none is held. A call that fails because the
//! upstream no longer accepts the access token is retried exactly once
//! after an automatic refresh.
//!
//! ### Monitoring
//!
//! - [`root`] - Plain-text service banner.
//! - [`health`] - Application status, version and authorization state.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, put}};
//! use sporelay::api::{dashboard, health};
//!
//! let app = Router::new()
//!     .route("/spotify", get(dashboard))
//!     .route("/health", get(health));
//! ```

mod auth;
mod health;
mod player;

pub use auth::{callback, login};
pub use health::{health, root};
pub use player::{dashboard, pause, play};
