use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::spotify::SpotifyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No valid token in session")]
    NotAuthenticated,
    #[error("User not logged in")]
    LoginRequired,
    #[error("Authorization failed: no code provided")]
    MissingCode,
    #[error("Authorization failed: state mismatch")]
    InvalidState,
    #[error("Failed to retrieve access token: {0}")]
    TokenExchange(#[source] SpotifyError),
    #[error("File not found")]
    MissingFile,
    #[error("Provider error: {0}")]
    Provider(#[from] SpotifyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotAuthenticated => {
                tracing::debug!("No valid token, redirecting to login");
                return Redirect::to("/login").into_response();
            }
            AppError::LoginRequired => (StatusCode::BAD_REQUEST, "User not logged in."),
            AppError::MissingCode => (
                StatusCode::BAD_REQUEST,
                "Authorization failed: No code provided.",
            ),
            AppError::InvalidState => (
                StatusCode::BAD_REQUEST,
                "Authorization failed: Invalid state.",
            ),
            AppError::TokenExchange(e) => {
                tracing::warn!(error = %e, "Token exchange failed");
                (StatusCode::BAD_REQUEST, "Failed to retrieve access token.")
            }
            AppError::MissingFile => (StatusCode::NOT_FOUND, "File not found."),
            AppError::Provider(e) => {
                tracing::error!(error = %e, "Spotify request failed");
                (StatusCode::BAD_GATEWAY, "Spotify request failed.")
            }
            AppError::Io(e) => {
                tracing::error!(error = %e, "IO error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
            AppError::Archive(e) => {
                tracing::error!(error = %e, "Archive error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        };

        (status, message).into_response()
    }
}
