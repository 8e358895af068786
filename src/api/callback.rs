use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::AppState;
use crate::{error::AppError, utils};

/// Starts a new login.
///
/// Any previous session is dropped. The fresh session only holds the OAuth
/// `state` the callback has to present.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(previous) = state.session_id(&jar) {
        state.sessions.destroy(&previous).await;
    }

    let session = state.sessions.create().await;
    let oauth_state = utils::generate_oauth_state();
    state
        .sessions
        .set_oauth_state(&session, oauth_state.clone())
        .await;

    let auth_url = state.provider.authorize_url(&oauth_state)?;
    tracing::debug!(url = %auth_url, "Redirecting to Spotify");

    Ok((jar.add(state.session_cookie(&session)), Redirect::to(&auth_url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// OAuth callback: trades the code for a token and stores it under the
/// user's Spotify id.
///
/// Tokens of any earlier identity in the session are evicted first, so the
/// session ends up holding exactly one. Redirects to `/getImages`.
///
/// # Errors
///
/// - [`AppError::MissingCode`] when `code` is absent or empty
/// - [`AppError::InvalidState`] when `state` does not match the session's
/// - [`AppError::TokenExchange`] when Spotify rejects the code
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    let session = state.session_id(&jar);
    let expected_state = match &session {
        Some(id) => state.sessions.take_oauth_state(id).await,
        None => None,
    };

    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "Spotify denied authorization");
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    let session = match (session, expected_state, params.state) {
        (Some(id), Some(expected), Some(given)) if expected == given => id,
        _ => return Err(AppError::InvalidState),
    };

    let token = state
        .provider
        .exchange_code(&code)
        .await
        .map_err(AppError::TokenExchange)?;
    let user = state.provider.current_user(&token.access_token).await?;

    // Only one identity may live in a session at a time.
    state.tokens.evict_all(&session).await;
    state.tokens.store(&session, user.clone(), token).await;
    tracing::info!(user = %user, "User authenticated");

    Ok(Redirect::to("/getImages"))
}
