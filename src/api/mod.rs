//! # API Module
//!
//! HTTP handlers of the coverfetch web application and the state they share.
//!
//! ## Request flow
//!
//! ```text
//! /login ──> Spotify consent ──> /redirect ──> /getImages ──> /download/{file}
//!                                                        └──> /download_all
//! /disconnect ──> /
//! ```
//!
//! - [`login`] starts a fresh session and redirects to Spotify
//! - [`callback`] exchanges the code, stores the token under the user's id
//! - [`get_images`] lists the saved albums, downloads the covers and renders
//!   the listing
//! - [`download_one`] and [`download_all`] serve a single cover or a zip
//! - [`disconnect`] revokes the tokens and drops the session
//!
//! Sessions are tracked with a cookie holding a [`SessionId`]; the data behind
//! it lives in the in-memory [`SessionStore`].
//!
//! ## Errors
//!
//! Handlers return [`AppError`], which maps to the HTTP response: a missing
//! or expired login redirects to `/login`, bad callbacks and anonymous
//! per-user downloads are `400`, unknown files `404`, Spotify failures `502`.

use std::{path::PathBuf, sync::Arc};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use reqwest::Client;

use crate::{
    config::Config,
    error::AppError,
    management::{SessionId, SessionStore, TokenStore},
    spotify::MusicProvider,
};

mod callback;
mod disconnect;
mod download;
mod health;
mod images;
mod pages;

pub use callback::{callback, login};
pub use disconnect::disconnect;
pub use download::{download_all, download_one};
pub use health::health;
pub use images::get_images;
pub use pages::{home, privacy_policy};

/// State shared by every handler.
///
/// Cloned per request; everything mutable sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub tokens: TokenStore,
    pub provider: Arc<dyn MusicProvider>,
    /// Plain client for cover downloads.
    pub http: Client,
}

impl AppState {
    /// Builds the state around `provider`.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration; the session TTL and cookie name
    ///   are taken from it
    /// * `provider` - Music provider used for OAuth and the album listing
    /// * `http` - Client used for plain cover image downloads
    pub fn new(config: Config, provider: Arc<dyn MusicProvider>, http: Client) -> Self {
        let sessions = Arc::new(SessionStore::with_ttl(config.session.ttl()));
        let tokens = TokenStore::new(Arc::clone(&sessions), Arc::clone(&provider));

        Self {
            config: Arc::new(config),
            sessions,
            tokens,
            provider,
            http,
        }
    }

    fn session_id(&self, jar: &CookieJar) -> Option<SessionId> {
        jar.get(&self.config.session.cookie_name)
            .map(|c| SessionId::from(c.value().to_string()))
    }

    fn session_cookie(&self, id: &SessionId) -> Cookie<'static> {
        Cookie::build((self.config.session.cookie_name.clone(), id.as_str().to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(self.config.session.cookie_name.clone())
            .path("/")
            .build()
    }

    /// Folder the caller's downloads are served from.
    ///
    /// Per-user folders need an authenticated session; the shared folder does
    /// not.
    async fn scoped_folder(&self, jar: &CookieJar) -> Result<PathBuf, AppError> {
        let storage = &self.config.storage;
        if !storage.per_user_folders {
            return Ok(storage.root().to_path_buf());
        }

        let session = self.session_id(jar).ok_or(AppError::LoginRequired)?;
        let user = self
            .tokens
            .resolve_identity(&session)
            .await
            .ok_or(AppError::LoginRequired)?;

        Ok(storage.folder_for(&user))
    }
}
