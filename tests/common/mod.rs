#![allow(dead_code)]

use std::{
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{Router, extract::Path as UrlPath, http::StatusCode, routing::get};
use coverfetch::{
    config::{Config, ServerConfig, SessionConfig, SpotifyConfig, StorageConfig},
    spotify::{MusicProvider, SpotifyError},
    types::{Album, Image, SavedAlbum, SavedAlbumsPage, TokenRecord, UserId},
};

pub const COOKIE_NAME: &str = "coverfetch_test";

pub fn test_config(download_folder: &Path, per_user_folders: bool) -> Config {
    Config {
        server: ServerConfig {
            server_address: "127.0.0.1:0".to_string(),
        },
        spotify: SpotifyConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1/redirect".to_string(),
            scope: "user-library-read".to_string(),
            auth_url: "https://accounts.example/authorize".to_string(),
            token_url: "https://accounts.example/api/token".to_string(),
            revoke_url: "https://accounts.example/api/token/revoke".to_string(),
            api_url: "https://api.example/v1".to_string(),
        },
        storage: StorageConfig {
            download_folder: download_folder.to_path_buf(),
            per_user_folders,
        },
        session: SessionConfig {
            cookie_name: COOKIE_NAME.to_string(),
            ttl_secs: 3600,
        },
    }
}

pub fn token(access: &str, expires_at: i64) -> TokenRecord {
    TokenRecord {
        access_token: access.to_string(),
        refresh_token: format!("{access}-refresh"),
        expires_at,
    }
}

pub fn saved_album(name: &str, cover_url: Option<&str>) -> SavedAlbum {
    SavedAlbum {
        album: Album {
            name: name.to_string(),
            images: cover_url
                .map(|url| Image {
                    url: url.to_string(),
                })
                .into_iter()
                .collect(),
        },
    }
}

/// In-memory provider serving a fixed library and counting calls.
#[derive(Default)]
pub struct FakeProvider {
    pub user: String,
    pub library: Vec<SavedAlbum>,
    pub fail_refresh: bool,
    /// Offset at which an empty page is served regardless of the library.
    pub empty_page_at: Option<u32>,
    pub page_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub revoked: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_library(library: Vec<SavedAlbum>) -> Self {
        Self {
            user: "alice".to_string(),
            library,
            ..Default::default()
        }
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicProvider for FakeProvider {
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        Ok(format!("https://accounts.example/authorize?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenRecord, SpotifyError> {
        Ok(token(&format!("access-{code}"), i64::MAX / 2))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRecord, SpotifyError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh {
            return Err(SpotifyError::Status {
                endpoint: "token",
                status: reqwest::StatusCode::BAD_REQUEST,
            });
        }
        Ok(TokenRecord {
            access_token: "refreshed".to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at: i64::MAX / 2,
        })
    }

    async fn revoke_token(&self, access_token: &str) -> Result<(), SpotifyError> {
        self.revoked
            .lock()
            .unwrap()
            .push(access_token.to_string());
        Ok(())
    }

    async fn current_user(&self, _access_token: &str) -> Result<UserId, SpotifyError> {
        Ok(UserId::new(self.user.clone()))
    }

    async fn saved_albums_page(
        &self,
        _access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SavedAlbumsPage, SpotifyError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.empty_page_at == Some(offset) {
            return Ok(SavedAlbumsPage::default());
        }
        let items = self
            .library
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(SavedAlbumsPage { items })
    }
}

/// Body served for `/covers/{name}`.
pub fn cover_bytes(name: &str) -> Vec<u8> {
    format!("jpeg-bytes-of-{name}").into_bytes()
}

/// Starts a local image host and returns its base URL.
///
/// `/covers/{name}` answers with [`cover_bytes`], except names starting with
/// `missing` which answer `404`.
pub async fn spawn_image_server() -> String {
    async fn cover(UrlPath(name): UrlPath<String>) -> Result<Vec<u8>, StatusCode> {
        if name.starts_with("missing") {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(cover_bytes(&name))
    }

    let app = Router::new().route("/covers/{name}", get(cover));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
