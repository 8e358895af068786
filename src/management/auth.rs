use std::sync::Arc;

use chrono::Utc;

use super::session::{SessionId, SessionStore};
use crate::{
    error::AppError,
    spotify::MusicProvider,
    types::{TokenRecord, UserId},
};

/// Tokens are refreshed once they are closer to expiry than this.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Per-session token records, refreshed on demand.
#[derive(Clone)]
pub struct TokenStore {
    sessions: Arc<SessionStore>,
    provider: Arc<dyn MusicProvider>,
}

impl TokenStore {
    /// Creates a token store over `sessions`, refreshing through `provider`.
    pub fn new(sessions: Arc<SessionStore>, provider: Arc<dyn MusicProvider>) -> Self {
        TokenStore { sessions, provider }
    }

    /// Identity the session is authenticated as.
    ///
    /// A session holding records for more than one identity is treated as
    /// corrupt: every record is evicted and `None` is returned, since nothing
    /// tells which of them is the right one.
    pub async fn resolve_identity(&self, session: &SessionId) -> Option<UserId> {
        let mut identities = self.sessions.identities(session).await;

        if identities.len() > 1 {
            tracing::warn!(
                users = ?identities,
                "Multiple user ids found in session, evicting all tokens"
            );
            self.sessions.evict_tokens(session).await;
            return None;
        }

        identities.pop()
    }

    /// Records `token` as the credentials of `user` in `session`.
    ///
    /// Replaces any earlier record of the same user. Does nothing when the
    /// session has been destroyed or has expired in the meantime.
    ///
    /// # Arguments
    ///
    /// * `session` - Session the token belongs to
    /// * `user` - Spotify id the token was issued for
    /// * `token` - Freshly exchanged or refreshed token record
    pub async fn store(&self, session: &SessionId, user: UserId, token: TokenRecord) {
        tracing::debug!(user = %user, "Storing token");
        self.sessions.insert_token(session, user, token).await;
    }

    /// Removes every token of `session` and hands them back.
    ///
    /// The session itself stays. Callers revoke the returned tokens when the
    /// user disconnects, or just drop them when a new login replaces them.
    pub async fn evict_all(&self, session: &SessionId) -> Vec<TokenRecord> {
        self.sessions.evict_tokens(session).await
    }

    /// Returns a token for `user` that is good for at least another minute.
    ///
    /// An expiring token is refreshed and the new record replaces the stored
    /// one. A failed refresh is reported as `NotAuthenticated` so the caller
    /// sends the user through login again.
    pub async fn get_valid_token(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<TokenRecord, AppError> {
        self.get_valid_token_at(session, user, Utc::now().timestamp())
            .await
    }

    /// [`get_valid_token`](Self::get_valid_token) with an explicit clock,
    /// `now` being unix seconds.
    pub async fn get_valid_token_at(
        &self,
        session: &SessionId,
        user: &UserId,
        now: i64,
    ) -> Result<TokenRecord, AppError> {
        let Some(token) = self.sessions.token(session, user).await else {
            tracing::debug!(user = %user, "No token found");
            return Err(AppError::NotAuthenticated);
        };

        if !token.expires_within(now, REFRESH_MARGIN_SECS) {
            return Ok(token);
        }

        tracing::debug!(user = %user, "Token expired, refreshing");
        let refreshed = match self.provider.refresh_token(&token.refresh_token).await {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Token refresh failed");
                return Err(AppError::NotAuthenticated);
            }
        };

        self.sessions
            .insert_token(session, user.clone(), refreshed.clone())
            .await;

        Ok(refreshed)
    }
}
