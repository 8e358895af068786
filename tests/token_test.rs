mod common;

use std::sync::Arc;

use common::{FakeProvider, token};
use coverfetch::{
    error::AppError,
    management::{REFRESH_MARGIN_SECS, SessionStore, TokenStore},
    types::UserId,
};

const NOW: i64 = 1_700_000_000;

fn setup(provider: FakeProvider) -> (Arc<SessionStore>, Arc<FakeProvider>, TokenStore) {
    let sessions = Arc::new(SessionStore::new());
    let provider = Arc::new(provider);
    let tokens = TokenStore::new(Arc::clone(&sessions), provider.clone());
    (sessions, provider, tokens)
}

#[tokio::test]
async fn test_fresh_token_is_reused() {
    let (sessions, provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;
    let user = UserId::new("alice");
    let stored = token("still-good", NOW + 3600);
    tokens.store(&session, user.clone(), stored.clone()).await;

    let got = tokens.get_valid_token_at(&session, &user, NOW).await.unwrap();

    assert_eq!(got, stored);
    assert_eq!(provider.refresh_calls(), 0);
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_and_replaced() {
    let (sessions, provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;
    let user = UserId::new("alice");
    tokens
        .store(&session, user.clone(), token("old", NOW + REFRESH_MARGIN_SECS - 1))
        .await;

    let got = tokens.get_valid_token_at(&session, &user, NOW).await.unwrap();

    assert_eq!(got.access_token, "refreshed");
    assert_eq!(got.refresh_token, "old-refresh");
    assert_eq!(provider.refresh_calls(), 1);
    assert_eq!(sessions.token(&session, &user).await, Some(got));
}

#[tokio::test]
async fn test_refresh_boundary() {
    let (sessions, provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;
    let user = UserId::new("alice");

    // Exactly one margin away is still good enough
    tokens
        .store(&session, user.clone(), token("edge", NOW + REFRESH_MARGIN_SECS))
        .await;
    let got = tokens.get_valid_token_at(&session, &user, NOW).await.unwrap();
    assert_eq!(got.access_token, "edge");
    assert_eq!(provider.refresh_calls(), 0);

    // Already expired
    tokens
        .store(&session, user.clone(), token("gone", NOW - 10))
        .await;
    let got = tokens.get_valid_token_at(&session, &user, NOW).await.unwrap();
    assert_eq!(got.access_token, "refreshed");
    assert_eq!(provider.refresh_calls(), 1);
}

#[tokio::test]
async fn test_missing_token_is_not_authenticated() {
    let (sessions, _provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;

    let result = tokens
        .get_valid_token_at(&session, &UserId::new("nobody"), NOW)
        .await;

    assert!(matches!(result, Err(AppError::NotAuthenticated)));
}

#[tokio::test]
async fn test_failed_refresh_is_not_authenticated() {
    let (sessions, provider, tokens) = setup(FakeProvider {
        fail_refresh: true,
        ..Default::default()
    });
    let session = sessions.create().await;
    let user = UserId::new("alice");
    let stale = token("stale", NOW);
    tokens.store(&session, user.clone(), stale.clone()).await;

    let result = tokens.get_valid_token_at(&session, &user, NOW).await;

    assert!(matches!(result, Err(AppError::NotAuthenticated)));
    assert_eq!(provider.refresh_calls(), 1);
    // Stored record is left alone
    assert_eq!(sessions.token(&session, &user).await, Some(stale));
}

#[tokio::test]
async fn test_single_identity_resolves() {
    let (sessions, _provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;

    assert_eq!(tokens.resolve_identity(&session).await, None);

    tokens
        .store(&session, UserId::new("alice"), token("a", NOW))
        .await;
    assert_eq!(
        tokens.resolve_identity(&session).await,
        Some(UserId::new("alice"))
    );
}

#[tokio::test]
async fn test_multiple_identities_evict_all_tokens() {
    let (sessions, _provider, tokens) = setup(FakeProvider::default());
    let session = sessions.create().await;
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    tokens.store(&session, alice.clone(), token("a", NOW)).await;
    tokens.store(&session, bob.clone(), token("b", NOW)).await;

    assert_eq!(tokens.resolve_identity(&session).await, None);

    assert!(sessions.identities(&session).await.is_empty());
    assert_eq!(sessions.token(&session, &alice).await, None);
    assert_eq!(sessions.token(&session, &bob).await, None);
    // The session itself survives, only the tokens are gone
    assert!(sessions.exists(&session).await);
}
