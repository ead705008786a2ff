use std::sync::Arc;

use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::{
    error::Result,
    server::AppState,
    types::{Dashboard, PlayRequest},
};

pub async fn dashboard(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Dashboard>> {
    let mut refreshed = false;

    loop {
        let token = state.tokens.valid_access_token().await?;
        match state.spotify.dashboard(&token).await {
            Ok(view) => return Ok(Json(view)),
            Err(e) if e.is_expired_token() && !refreshed => {
                state.tokens.refresh().await?;
                refreshed = true;
                continue; // retry once with the fresh token
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn pause(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>> {
    let mut refreshed = false;

    loop {
        let token = state.tokens.valid_access_token().await?;
        match state.spotify.pause(&token).await {
            Ok(()) => return Ok(Json(json!({ "message": "Paused" }))),
            Err(e) if e.is_expired_token() && !refreshed => {
                state.tokens.refresh().await?;
                refreshed = true;
                continue; // retry once with the fresh token
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn play(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<PlayRequest>,
) -> Result<Json<Value>> {
    let uri = body.uri.unwrap_or_default();
    let mut refreshed = false;

    loop {
        let token = state.tokens.valid_access_token().await?;
        match state.spotify.play(&token, &uri).await {
            Ok(()) => return Ok(Json(json!({ "message": "Playing song" }))),
            Err(e) if e.is_expired_token() && !refreshed => {
                state.tokens.refresh().await?;
                refreshed = true;
                continue; // retry once with the fresh token
            }
            Err(e) => return Err(e),
        }
    }
}
