//! # Spotify Integration Module
//!
//! The OAuth2 and Web API calls coverfetch needs, and nothing else:
//!
//! - [`auth`] - authorization URL, code exchange, token refresh and revocation
//!   using the confidential-client (client secret) flow
//! - [`library`] - the saved-albums endpoint and the pagination loop that turns
//!   it into a list of [`AlbumEntry`](crate::types::AlbumEntry)
//! - [`user`] - lookup of the current user's id
//!
//! Everything above this layer talks to Spotify through the [`MusicProvider`]
//! trait, so the pagination and token logic can run against a fake provider.
//! [`SpotifyClient`] is the real implementation.
//!
//! ## API Coverage
//!
//! - `GET {auth_url}` - consent screen the browser is redirected to
//! - `POST {token_url}` - `authorization_code` and `refresh_token` grants
//! - `POST {revoke_url}` - token revocation
//! - `GET /me` - current user
//! - `GET /me/albums` - saved albums, offset pagination
//!
//! No request is retried. A failure is returned to the caller as a
//! [`SpotifyError`].

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::{
    config::SpotifyConfig,
    types::{SavedAlbumsPage, TokenRecord, UserId},
};

pub mod auth;
pub mod library;
pub mod user;

pub use library::{PAGE_SIZE, list_saved_albums};

#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Unexpected status {status} from {endpoint}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
}

/// Operations coverfetch performs against the music streaming provider.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// URL of the consent screen, carrying `state` back to the callback.
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError>;

    async fn exchange_code(&self, code: &str) -> Result<TokenRecord, SpotifyError>;

    /// Exchanges `refresh_token` for a new record.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRecord, SpotifyError>;

    async fn revoke_token(&self, access_token: &str) -> Result<(), SpotifyError>;

    async fn current_user(&self, access_token: &str) -> Result<UserId, SpotifyError>;

    async fn saved_albums_page(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SavedAlbumsPage, SpotifyError>;
}

/// [`MusicProvider`] backed by the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(http: Client, config: SpotifyConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        self.build_authorize_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenRecord, SpotifyError> {
        self.request_token(code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRecord, SpotifyError> {
        self.request_refresh(refresh_token).await
    }

    async fn revoke_token(&self, access_token: &str) -> Result<(), SpotifyError> {
        self.request_revoke(access_token).await
    }

    async fn current_user(&self, access_token: &str) -> Result<UserId, SpotifyError> {
        self.get_current_user(access_token).await
    }

    async fn saved_albums_page(
        &self,
        access_token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SavedAlbumsPage, SpotifyError> {
        self.get_saved_albums(access_token, limit, offset).await
    }
}
