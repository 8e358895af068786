use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-assigned identifier of an authenticated user.
///
/// Scopes both the token records held in a session and, in per-user mode,
/// the folder cover images are written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OAuth2 access/refresh token pair with an absolute expiry (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl TokenRecord {
    /// True when the token expires within `margin_secs` of `now`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - now < margin_secs
    }
}

/// An album name paired with its cover artwork URL for one fetch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub name: String,
    pub cover_url: String,
}

/// Raw body of the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

/// One page of `GET /me/albums`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedAlbumsPage {
    pub items: Vec<SavedAlbum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub album: Album,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}
