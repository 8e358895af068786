use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Router, routing::get};
use reqwest::Client;
use tower_http::trace::TraceLayer;

use crate::{
    Res,
    api::{self, AppState},
    config::Config,
    spotify::SpotifyClient,
};

/// All routes of the application, wired to `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/home", get(api::home))
        .route("/login", get(api::login))
        .route("/redirect", get(api::callback))
        .route("/getImages", get(api::get_images))
        .route("/download/{filename}", get(api::download_one))
        .route("/download_all", get(api::download_all))
        .route("/disconnect", get(api::disconnect))
        .route("/privacy-policy", get(api::privacy_policy))
        .route("/health", get(api::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the state from `config` and serves until the process is stopped.
pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server.server_address)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    async_fs::create_dir_all(config.storage.root()).await?;

    let http = Client::new();
    let provider = Arc::new(SpotifyClient::new(http.clone(), config.spotify.clone()));
    let state = AppState::new(config, provider, http);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
