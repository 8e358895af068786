use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

use super::AppState;
use crate::{error::AppError, management, utils};

const ARCHIVE_NAME: &str = "album_covers.zip";

/// Serves a single cover from the caller's folder as an attachment.
///
/// # Errors
///
/// - [`AppError::LoginRequired`] in per-user mode without a logged in user
/// - [`AppError::MissingFile`] when `filename` is not a plain file name or
///   no such file exists in the folder
pub async fn download_one(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let folder = state.scoped_folder(&jar).await?;

    if !utils::is_plain_filename(&filename) {
        tracing::debug!(file = %filename, "Rejected file name");
        return Err(AppError::MissingFile);
    }

    let path = folder.join(&filename);
    match async_fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(AppError::MissingFile),
    }

    let contents = async_fs::read(&path).await?;
    let content_type = if filename.ends_with(utils::COVER_EXTENSION) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                utils::attachment_disposition(&filename),
            ),
        ],
        contents,
    ))
}

/// Serves every cover in the caller's folder as one zip archive.
pub async fn download_all(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let folder = state.scoped_folder(&jar).await?;
    let archive = management::archive_folder(&folder).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                utils::attachment_disposition(ARCHIVE_NAME),
            ),
        ],
        archive,
    ))
}
