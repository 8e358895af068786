use axum::{extract::State, response::Redirect};
use axum_extra::extract::cookie::CookieJar;

use super::AppState;

/// Revokes the session's tokens and forgets the session.
///
/// Revocation is best-effort: a failure is logged and the user is
/// disconnected anyway.
pub async fn disconnect(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(session) = state.session_id(&jar) {
        for token in state.tokens.evict_all(&session).await {
            match state.provider.revoke_token(&token.access_token).await {
                Ok(()) => tracing::debug!("Token revoked"),
                Err(e) => tracing::warn!(error = %e, "Failed to revoke token"),
            }
        }
        state.sessions.destroy(&session).await;
    }

    (jar.remove(state.removal_cookie()), Redirect::to("/"))
}
