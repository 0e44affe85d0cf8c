use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use spotcharts::config::Settings;
use spotcharts::management::{AuthError, AuthFlow, CallbackParams, TokenGrant, TokenStore};
use spotcharts::spotify::SpotifyError;
use spotcharts::types::Token;

/// Grant that records every call and answers from a canned result.
#[derive(Default)]
struct StubGrant {
    exchanges: AtomicUsize,
    refreshes: AtomicUsize,
    codes: Mutex<Vec<String>>,
    fail: bool,
    rotate_refresh_token: bool,
}

impl StubGrant {
    fn failing() -> Self {
        StubGrant {
            fail: true,
            ..Default::default()
        }
    }

    fn rejected() -> SpotifyError {
        SpotifyError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid authorization code".to_string(),
        }
    }
}

impl TokenGrant for StubGrant {
    async fn authorization_code(&self, code: &str) -> Result<Token, SpotifyError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.codes.lock().unwrap().push(code.to_string());
        if self.fail {
            return Err(Self::rejected());
        }

        Ok(Token {
            access_token: format!("access-for-{}", code),
            refresh_token: Some("refresh-1".to_string()),
            scope: Some("user-top-read".to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(3600)),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(Self::rejected());
        }

        Ok(Token {
            access_token: format!("refreshed-{}-from-{}", n, refresh_token),
            refresh_token: self
                .rotate_refresh_token
                .then(|| format!("refresh-{}", n + 1)),
            scope: None,
            expires_at: Some(Utc::now() + Duration::seconds(3600)),
        })
    }
}

fn settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "SPOTIFY_CLIENT_ID" => Some("client".to_string()),
        "SPOTIFY_CLIENT_SECRET" => Some("secret".to_string()),
        "SPOTIFY_CLIENT_REDIRECT" => Some("http://localhost:3000/callback".to_string()),
        _ => None,
    })
    .unwrap()
}

fn flow(grant: StubGrant) -> AuthFlow<StubGrant> {
    AuthFlow::new(grant, TokenStore::new(), &settings())
}

fn params(code: Option<&str>, state: Option<&str>) -> CallbackParams {
    CallbackParams {
        code: code.map(str::to_string),
        state: state.map(str::to_string),
        error: None,
    }
}

#[test]
fn test_begin_login_issues_fresh_state() {
    let flow = flow(StubGrant::default());

    let first = flow.begin_login();
    let second = flow.begin_login();

    assert_eq!(first.state.len(), 16);
    assert!(first.state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first.state, second.state);

    let url = first.url.as_str();
    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=client"));
    assert!(url.contains(&format!("state={}", first.state)));
}

#[tokio::test]
async fn test_mismatched_state_never_exchanges() {
    let flow = flow(StubGrant::default());
    let mut stored = Some("expected-state-1".to_string());

    let result = flow
        .handle_callback(&params(Some("code"), Some("forged-state-99")), &mut stored)
        .await;

    assert_eq!(result, Err(AuthError::StateMismatch));
    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 0);
    // a rejected callback leaves the pending state alone
    assert_eq!(stored.as_deref(), Some("expected-state-1"));
    assert_eq!(flow.access_token().await, "");
}

#[tokio::test]
async fn test_missing_state_never_exchanges() {
    let flow = flow(StubGrant::default());

    let mut stored = Some("expected".to_string());
    let result = flow.handle_callback(&params(Some("code"), None), &mut stored).await;
    assert_eq!(result, Err(AuthError::StateMismatch));

    let mut nothing_stored = None;
    let result = flow
        .handle_callback(&params(Some("code"), Some("expected")), &mut nothing_stored)
        .await;
    assert_eq!(result, Err(AuthError::StateMismatch));

    let mut empty_stored = Some(String::new());
    let result = flow
        .handle_callback(&params(Some("code"), Some("")), &mut empty_stored)
        .await;
    assert_eq!(result, Err(AuthError::StateMismatch));

    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_matching_state_exchanges_and_stores_token() {
    let flow = flow(StubGrant::default());
    let login = flow.begin_login();
    let mut stored = Some(login.state.clone());

    let result = flow
        .handle_callback(&params(Some("abc"), Some(&login.state)), &mut stored)
        .await;

    assert_eq!(result, Ok(()));
    assert_eq!(stored, None);
    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(*flow.grant().codes.lock().unwrap(), vec!["abc"]);
    assert_eq!(flow.access_token().await, "access-for-abc");
    assert_eq!(
        flow.tokens().refresh_token().await.as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_state_is_single_use() {
    let flow = flow(StubGrant::default());
    let mut stored = Some("once".to_string());

    let first = flow
        .handle_callback(&params(Some("abc"), Some("once")), &mut stored)
        .await;
    let replay = flow
        .handle_callback(&params(Some("abc"), Some("once")), &mut stored)
        .await;

    assert_eq!(first, Ok(()));
    assert_eq!(replay, Err(AuthError::StateMismatch));
    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_exchange_leaves_store_untouched() {
    let flow = flow(StubGrant::failing());
    let previous = Token {
        access_token: "previous".to_string(),
        refresh_token: None,
        scope: None,
        expires_at: None,
    };
    flow.tokens().replace(previous.clone()).await;
    let mut stored = Some("s".to_string());

    let result = flow
        .handle_callback(&params(Some("bad"), Some("s")), &mut stored)
        .await;

    match result {
        Err(AuthError::TokenExchangeFailed(message)) => {
            assert!(message.contains("Invalid authorization code"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(flow.tokens().current().await, Some(previous));
    // the state was still consumed
    assert_eq!(stored, None);
}

#[tokio::test]
async fn test_denied_access_skips_exchange() {
    let flow = flow(StubGrant::default());
    let mut stored = Some("s".to_string());
    let denied = CallbackParams {
        code: None,
        state: Some("s".to_string()),
        error: Some("access_denied".to_string()),
    };

    let result = flow.handle_callback(&denied, &mut stored).await;

    assert_eq!(
        result,
        Err(AuthError::TokenExchangeFailed("access_denied".to_string()))
    );
    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_code_skips_exchange() {
    let flow = flow(StubGrant::default());
    let mut stored = Some("s".to_string());

    let result = flow.handle_callback(&params(None, Some("s")), &mut stored).await;

    assert!(matches!(result, Err(AuthError::TokenExchangeFailed(_))));
    assert_eq!(flow.grant().exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_access_token_is_idempotent() {
    let flow = flow(StubGrant::default());
    assert_eq!(flow.access_token().await, flow.access_token().await);

    let mut stored = Some("s".to_string());
    flow.handle_callback(&params(Some("abc"), Some("s")), &mut stored)
        .await
        .unwrap();

    let first = flow.access_token().await;
    let second = flow.access_token().await;
    assert_eq!(first, second);
    assert_eq!(flow.grant().refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let flow = flow(StubGrant::default());

    let access = flow.refresh_access_token("refresh-1").await.unwrap();

    assert_eq!(access, "refreshed-1-from-refresh-1");
    assert_eq!(flow.access_token().await, access);
    assert_eq!(
        flow.tokens().refresh_token().await.as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_refresh_takes_rotated_refresh_token() {
    let flow = flow(StubGrant {
        rotate_refresh_token: true,
        ..Default::default()
    });

    flow.refresh_access_token("refresh-1").await.unwrap();

    assert_eq!(
        flow.tokens().refresh_token().await.as_deref(),
        Some("refresh-2")
    );
}

#[tokio::test]
async fn test_failed_refresh_leaves_store_untouched() {
    let flow = flow(StubGrant::failing());
    let previous = Token {
        access_token: "still-here".to_string(),
        refresh_token: Some("stale".to_string()),
        scope: None,
        expires_at: None,
    };
    flow.tokens().replace(previous.clone()).await;

    let result = flow.refresh_access_token("stale").await;

    assert!(matches!(result, Err(AuthError::RefreshFailed(_))));
    assert_eq!(flow.tokens().current().await, Some(previous));
}

#[tokio::test]
async fn test_valid_access_token_refreshes_expiring_token() {
    let flow = flow(StubGrant::default());
    flow.tokens()
        .replace(Token {
            access_token: "expiring".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            scope: None,
            expires_at: Some(Utc::now() + Duration::seconds(30)),
        })
        .await;

    assert_eq!(
        flow.valid_access_token().await,
        "refreshed-1-from-refresh-1"
    );
    assert_eq!(flow.grant().refreshes.load(Ordering::SeqCst), 1);

    // fresh now, no second refresh
    flow.valid_access_token().await;
    assert_eq!(flow.grant().refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_valid_access_token_falls_back_to_stale_token() {
    let flow = flow(StubGrant::failing());
    flow.tokens()
        .replace(Token {
            access_token: "stale".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            scope: None,
            expires_at: Some(Utc::now() - Duration::seconds(10)),
        })
        .await;

    assert_eq!(flow.valid_access_token().await, "stale");
}

#[test]
fn test_error_redirect_targets() {
    assert_eq!(
        AuthError::StateMismatch.redirect_target(),
        "/#error=state_mismatch"
    );
    assert_eq!(
        AuthError::TokenExchangeFailed("Invalid authorization code".to_string())
            .redirect_target(),
        "/#error=invalid_token&message=Invalid%20authorization%20code"
    );
    assert_eq!(
        AuthError::RefreshFailed("revoked".to_string()).redirect_target(),
        "/#error=invalid_token&message=revoked"
    );
}
