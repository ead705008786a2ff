use std::{net::SocketAddr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, put},
};
use tower_http::cors::CorsLayer;

use crate::{api, error, info, management::TokenManager, spotify::SpotifyClient};

/// Shared state behind every handler: the credential store and the upstream
/// client.
pub struct AppState {
    pub tokens: TokenManager,
    pub spotify: SpotifyClient,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/spotify", get(api::dashboard))
        .route("/spotify/pause", put(api::pause))
        .route("/spotify/play", put(api::play))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

pub async fn start_server(port: u16, state: Arc<AppState>) {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    info!("Server running on port {}", port);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
