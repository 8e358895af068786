//! Configuration management for coverfetch.
//!
//! Values come from command-line flags or environment variables, with `.env`
//! files loaded first so they behave like regular environment variables.
//! The resulting [`Config`] is passed explicitly into the server state; no
//! component reads the environment on its own.
//!
//! The lookup order is:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables
//! 3. `.env` in the working directory, then `.env` in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{ArgAction, Args};

use crate::types::UserId;

#[derive(Debug, Clone, Args)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub spotify: SpotifyConfig,

    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address and port the web server binds to
    #[arg(long, env = "SERVER_ADDRESS", default_value = "127.0.0.1:5000")]
    pub server_address: String,
}

#[derive(Debug, Clone, Args)]
pub struct SpotifyConfig {
    /// Client id of the registered Spotify application
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: String,

    /// Client secret of the registered Spotify application
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// OAuth callback URL, must match the one registered with Spotify
    #[arg(long, env = "REDIRECT_URI")]
    pub redirect_uri: String,

    /// Space separated OAuth scopes
    #[arg(long, env = "SPOTIFY_SCOPE", default_value = "user-library-read")]
    pub scope: String,

    #[arg(
        long,
        env = "SPOTIFY_API_AUTH_URL",
        default_value = "https://accounts.spotify.com/authorize"
    )]
    pub auth_url: String,

    #[arg(
        long,
        env = "SPOTIFY_API_TOKEN_URL",
        default_value = "https://accounts.spotify.com/api/token"
    )]
    pub token_url: String,

    #[arg(
        long,
        env = "SPOTIFY_API_REVOKE_URL",
        default_value = "https://accounts.spotify.com/api/token/revoke"
    )]
    pub revoke_url: String,

    #[arg(long, env = "SPOTIFY_API_URL", default_value = "https://api.spotify.com/v1")]
    pub api_url: String,
}

#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Root folder cover images are written to
    #[arg(long, env = "DOWNLOAD_FOLDER", default_value = "downloads")]
    pub download_folder: PathBuf,

    /// Keep one sub folder per Spotify user instead of a shared folder
    #[arg(
        long,
        env = "PER_USER_FOLDERS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub per_user_folders: bool,
}

impl StorageConfig {
    /// Folder covers for `user` live in.
    ///
    /// With per-user folders disabled every user shares the download root.
    pub fn folder_for(&self, user: &UserId) -> PathBuf {
        if self.per_user_folders {
            self.download_folder.join(user.as_str())
        } else {
            self.download_folder.clone()
        }
    }

    pub fn root(&self) -> &Path {
        &self.download_folder
    }
}

#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id
    #[arg(long, env = "SESSION_COOKIE_NAME", default_value = "coverfetch_session")]
    pub cookie_name: String,

    /// Seconds an unused session is kept before it is dropped
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3600)]
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Loads environment variables from `.env` files.
///
/// A `.env` in the current working directory wins. Otherwise the file is
/// looked up in the platform-specific local data directory:
/// - Linux: `~/.local/share/coverfetch/.env`
/// - macOS: `~/Library/Application Support/coverfetch/.env`
/// - Windows: `%LOCALAPPDATA%/coverfetch/.env`
///
/// A missing file is not an error: every value can also be provided as a
/// regular environment variable or flag.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<Option<PathBuf>, String> {
    match dotenv::dotenv() {
        Ok(path) => return Ok(Some(path)),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("coverfetch/.env");
    path
}
