use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;

use super::{AppState, pages};
use crate::{error::AppError, management, spotify};

/// Downloads the covers of every saved album and lists the caller's folder.
///
/// Runs the whole fetch sequentially inside the request. Albums already on
/// disk are simply overwritten.
///
/// # Errors
///
/// - [`AppError::NotAuthenticated`] (a redirect to `/login`) without a
///   session, identity or refreshable token
/// - [`AppError::Provider`] when listing the saved albums fails
pub async fn get_images(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    let session = state.session_id(&jar).ok_or(AppError::NotAuthenticated)?;
    let user = state
        .tokens
        .resolve_identity(&session)
        .await
        .ok_or(AppError::NotAuthenticated)?;
    let token = state.tokens.get_valid_token(&session, &user).await?;

    let albums = spotify::list_saved_albums(state.provider.as_ref(), &token.access_token).await?;
    tracing::info!(user = %user, albums = albums.len(), "Fetched saved albums");

    let folder = state.config.storage.folder_for(&user);
    management::persist_covers(&state.http, &albums, &folder).await?;

    let files = management::list_folder(&folder).await?;
    Ok(pages::download_page(&files, Some(&user)))
}
