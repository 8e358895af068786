use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    types::{TokenRecord, UserId},
    utils,
};

/// Opaque id carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(utils::generate_session_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifetime of an idle session unless configured otherwise.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct Session {
    tokens: HashMap<UserId, TokenRecord>,
    oauth_state: Option<String>,
    expires_at: Instant,
}

impl Session {
    fn new(ttl: Duration) -> Self {
        Self {
            tokens: HashMap::new(),
            oauth_state: None,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn extend(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }
}

/// In-memory sessions keyed by cookie id.
///
/// A session lives for `ttl` after it was last used. Expired sessions are
/// dropped when looked up and swept whenever a new one is created, so
/// abandoned logins do not pile up. Operations on a session that no longer
/// exists are no-ops; nothing here brings a destroyed session back.
///
/// Calls never hold the lock across an await on anything but the lock itself.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

/// Live session for `id`, extended on access. An expired one is removed.
fn live<'a>(
    sessions: &'a mut HashMap<SessionId, Session>,
    id: &SessionId,
    ttl: Duration,
) -> Option<&'a mut Session> {
    if sessions.get(id).is_some_and(Session::is_expired) {
        tracing::debug!("Session expired");
        sessions.remove(id);
        return None;
    }

    let session = sessions.get_mut(id)?;
    session.extend(ttl);
    Some(session)
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose sessions expire after `ttl` without use.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Starts an empty session and returns its id.
    ///
    /// Sweeps every expired session first.
    pub async fn create(&self) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, "Dropped expired sessions");
        }

        sessions.insert(id.clone(), Session::new(self.ttl));
        id
    }

    /// Drops the session and everything in it.
    pub async fn destroy(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().await.remove(id)
    }

    pub async fn exists(&self, id: &SessionId) -> bool {
        live(&mut *self.sessions.lock().await, id, self.ttl).is_some()
    }

    /// Number of sessions held, expired ones not yet swept included.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn set_oauth_state(&self, id: &SessionId, state: String) {
        if let Some(session) = live(&mut *self.sessions.lock().await, id, self.ttl) {
            session.oauth_state = Some(state);
        }
    }

    /// Removes and returns the pending OAuth state; it is single-use.
    pub async fn take_oauth_state(&self, id: &SessionId) -> Option<String> {
        live(&mut *self.sessions.lock().await, id, self.ttl).and_then(|s| s.oauth_state.take())
    }

    /// Stores `token` for `user`. Dropped when the session is gone.
    pub async fn insert_token(&self, id: &SessionId, user: UserId, token: TokenRecord) {
        match live(&mut *self.sessions.lock().await, id, self.ttl) {
            Some(session) => {
                session.tokens.insert(user, token);
            }
            None => tracing::debug!(user = %user, "Session gone, token not stored"),
        }
    }

    pub async fn token(&self, id: &SessionId, user: &UserId) -> Option<TokenRecord> {
        live(&mut *self.sessions.lock().await, id, self.ttl)
            .and_then(|s| s.tokens.get(user).cloned())
    }

    pub async fn identities(&self, id: &SessionId) -> Vec<UserId> {
        live(&mut *self.sessions.lock().await, id, self.ttl)
            .map(|s| s.tokens.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes every token record of the session and returns them.
    pub async fn evict_tokens(&self, id: &SessionId) -> Vec<TokenRecord> {
        live(&mut *self.sessions.lock().await, id, self.ttl)
            .map(|s| s.tokens.drain().map(|(_, token)| token).collect())
            .unwrap_or_default()
    }
}
