use std::{env, sync::Arc};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use sporelay::config;
use sporelay::error::Error;
use sporelay::management::TokenManager;
use sporelay::server::{AppState, router};
use sporelay::spotify::SpotifyClient;
use sporelay::spotify::auth::AuthConfig;
use tower::ServiceExt;
use wiremock::matchers::{any, body_json, body_string_contains, header as req_header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper function to create an auth config pointing at a mock server
fn test_auth_config(server_uri: &str) -> AuthConfig {
    AuthConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:5000/callback".to_string(),
        auth_url: format!("{}/authorize", server_uri),
        token_url: format!("{}/token", server_uri),
        scope: "user-top-read".to_string(),
    }
}

// Helper function to build an application whose upstreams point at the mock server
fn test_state(server_uri: &str) -> Arc<AppState> {
    Arc::new(AppState {
        tokens: TokenManager::with_config(test_auth_config(server_uri)),
        spotify: SpotifyClient::with_api_url(format!("{}/v1", server_uri)),
    })
}

// Helper function to mount a successful token exchange
async fn mount_token_exchange(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "refresh_token": "refresh-1",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

// Helper function to read a JSON response body
async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_banner() {
    let server = MockServer::start().await;
    let app = router(test_state(&server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Spotify relay is running. Visit /login to authorize.");
}

#[tokio::test]
async fn test_health_reports_authorization_state() {
    let server = MockServer::start().await;
    let app = router(test_state(&server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authorized"], false);
}

#[tokio::test]
async fn test_login_redirects_to_authorize_url() {
    let server = MockServer::start().await;
    let app = router(test_state(&server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with(&format!("{}/authorize?", server.uri())));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=client-id"));

    // Every redirect carries a fresh opaque state value
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_login_with_bad_config_is_a_server_error() {
    let mut config = test_auth_config("http://upstream.local");
    config.auth_url = "not a url".to_string();

    let state = Arc::new(AppState {
        tokens: TokenManager::with_config(config),
        spotify: SpotifyClient::with_api_url("http://upstream.local/v1"),
    });

    let response = router(state)
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["code"], "config_error");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = MockServer::start().await;
    let app = router(test_state(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://relay-client.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

#[test]
fn test_server_port_configuration() {
    // Default when PORT is unset
    unsafe { env::remove_var("PORT") };
    assert_eq!(config::server_port().unwrap(), 5000);

    // Explicit valid override
    unsafe { env::set_var("PORT", "8080") };
    assert_eq!(config::server_port().unwrap(), 8080);

    // Unparseable values are configuration errors
    unsafe { env::set_var("PORT", "not-a-port") };
    assert!(matches!(config::server_port(), Err(Error::Config(_))));

    unsafe { env::remove_var("PORT") };
}

#[tokio::test]
async fn test_callback_without_code_is_rejected() {
    let server = MockServer::start().await;

    // No token exchange may be attempted without a code
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let app = router(test_state(&server.uri()));
    let response = app
        .oneshot(Request::builder().uri("/callback").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "authorization_failed");
    assert_eq!(
        body["message"],
        "Authorization code exchange failed: authorization code is missing"
    );
}

#[tokio::test]
async fn test_commands_without_authorization_are_rejected() {
    let server = MockServer::start().await;

    // No upstream call may be attempted without credentials
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(&server.uri());

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/spotify/pause")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Not authorized");

    let response = router(state)
        .oneshot(Request::builder().uri("/spotify").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_callback_then_dashboard_flow() {
    let server = MockServer::start().await;

    mount_token_exchange(&server, "access-1").await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "name": "A", "artists": [{ "name": "X" }], "uri": "spotify:track:a" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": { "items": [{ "name": "B" }] }
        })))
        .mount(&server)
        .await;

    let state = test_state(&server.uri());

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/callback?code=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health now reflects the stored credentials
    let response = router(state.clone())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["authorized"], true);

    let response = router(state)
        .oneshot(Request::builder().uri("/spotify").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["topTracks"][0]["name"], "A");
    assert_eq!(body["topTracks"][0]["artist"], "X");
    assert_eq!(body["nowPlaying"], "Nothing playing");
    assert_eq!(body["followedArtists"], json!(["B"]));
}

#[tokio::test]
async fn test_play_requires_uri() {
    let server = MockServer::start().await;

    mount_token_exchange(&server, "access-1").await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(&server.uri());
    router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/callback?code=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/spotify/play")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "invalid_argument");
}

#[tokio::test]
async fn test_play_round_trip() {
    let server = MockServer::start().await;

    mount_token_exchange(&server, "access-1").await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .and(body_json(json!({ "uris": ["spotify:track:abc"] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(&server.uri());
    router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/callback?code=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/spotify/play")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"uri":"spotify:track:abc"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Playing song");
}

#[tokio::test]
async fn test_dashboard_maps_upstream_failure() {
    let server = MockServer::start().await;

    mount_token_exchange(&server, "access-1").await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "status": 500, "message": "server error" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": { "items": [] }
        })))
        .mount(&server)
        .await;

    let state = test_state(&server.uri());
    router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/callback?code=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router(state)
        .oneshot(Request::builder().uri("/spotify").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "upstream_fetch_failed");
    assert_eq!(body["message"], "server error");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried() {
    let server = MockServer::start().await;

    mount_token_exchange(&server, "worn-out").await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The upstream revoked the token early, before its local expiry
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .and(req_header("authorization", "Bearer worn-out"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .and(req_header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(&server.uri());
    router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/callback?code=good")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/spotify/pause")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // One refresh, one retry, a normal response to the caller
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Paused");
}
