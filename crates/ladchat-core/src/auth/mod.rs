//! Auth token lifecycle for the upload flow.
//!
//! Access tokens are short-lived (30 minutes); the refresh token lives for
//! seven days and is reused when the server does not rotate it.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryTokenStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Access token lifetime granted by the server.
pub const ACCESS_TOKEN_EXPIRE_SECS: u64 = 30 * 60;
/// Tokens this close to expiry are treated as expired.
pub const EXPIRY_SKEW_SECS: u64 = 30;

/// Auth errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),
    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Token payload returned by the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Tokens held on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Unix seconds when the access token stops being valid.
    pub expires_at: u64,
}

impl AuthTokens {
    /// Build stored tokens from a server response. A response without a
    /// refresh token keeps `previous_refresh`.
    pub fn from_response(
        response: TokenResponse,
        previous_refresh: Option<&str>,
        now: u64,
    ) -> AuthResult<Self> {
        let refresh_token = response
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .ok_or_else(|| {
                AuthError::RefreshRejected("Response has no refresh token".to_string())
            })?;
        Ok(Self {
            access_token: response.access_token,
            refresh_token,
            token_type: response.token_type,
            expires_at: now.saturating_add(response.expires_in),
        })
    }

    /// Check if the access token is expired (or about to be) at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_add(EXPIRY_SKEW_SECS) >= self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Persistence for the single signed-in token set.
pub trait TokenStore: Send + Sync {
    /// Load stored tokens, if any.
    fn load(&self) -> BoxFuture<'_, AuthResult<Option<AuthTokens>>>;

    /// Replace stored tokens.
    fn save(&self, tokens: &AuthTokens) -> BoxFuture<'_, AuthResult<()>>;

    /// Remove stored tokens.
    fn clear(&self) -> BoxFuture<'_, AuthResult<()>>;
}

/// Exchanges a refresh token for a new access token.
pub trait TokenRefresher: Send + Sync {
    fn refresh(&self, refresh_token: &str) -> BoxFuture<'_, AuthResult<TokenResponse>>;
}

/// Hands out valid access tokens, refreshing them when they expire.
pub struct AuthSession<S, R> {
    store: S,
    refresher: R,
}

impl<S: TokenStore, R: TokenRefresher> AuthSession<S, R> {
    pub fn new(store: S, refresher: R) -> Self {
        Self { store, refresher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist tokens from a login response.
    pub async fn sign_in(&self, response: TokenResponse, now: u64) -> AuthResult<AuthTokens> {
        let tokens = AuthTokens::from_response(response, None, now)?;
        self.store.save(&tokens).await?;
        log::info!("Signed in; access token valid until {}", tokens.expires_at);
        Ok(tokens)
    }

    /// Return a valid access token, refreshing and persisting if expired.
    pub async fn access_token(&self, now: u64) -> AuthResult<String> {
        let tokens = self.store.load().await?.ok_or(AuthError::NotSignedIn)?;
        if !tokens.is_expired(now) {
            return Ok(tokens.access_token);
        }

        log::info!("Access token expired, refreshing");
        let response = match self.refresher.refresh(&tokens.refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                return Err(e);
            }
        };
        let refreshed = AuthTokens::from_response(response, Some(&tokens.refresh_token), now)?;
        self.store.save(&refreshed).await?;
        Ok(refreshed.access_token)
    }

    /// Forget the stored tokens.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.store.clear().await?;
        log::info!("Signed out");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::block_on;
    use super::*;
    use std::sync::Mutex;

    /// Refresher that counts calls and optionally rotates the refresh token.
    struct FakeRefresher {
        calls: Mutex<u32>,
        rotate: bool,
        reject: bool,
    }

    impl FakeRefresher {
        fn new(rotate: bool, reject: bool) -> Self {
            Self {
                calls: Mutex::new(0),
                rotate,
                reject,
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl TokenRefresher for &FakeRefresher {
        fn refresh(&self, refresh_token: &str) -> BoxFuture<'_, AuthResult<TokenResponse>> {
            let refresh_token = refresh_token.to_string();
            Box::pin(async move {
                let calls = {
                    let mut calls = self.calls.lock().unwrap();
                    *calls += 1;
                    *calls
                };
                if self.reject {
                    return Err(AuthError::RefreshRejected("Invalid refresh token".to_string()));
                }
                Ok(TokenResponse {
                    access_token: format!("access-{}", calls),
                    refresh_token: self.rotate.then(|| format!("{}-rotated", refresh_token)),
                    token_type: "bearer".to_string(),
                    expires_in: ACCESS_TOKEN_EXPIRE_SECS,
                })
            })
        }
    }

    fn login() -> TokenResponse {
        TokenResponse {
            access_token: "access-0".to_string(),
            refresh_token: Some("refresh-0".to_string()),
            token_type: "bearer".to_string(),
            expires_in: ACCESS_TOKEN_EXPIRE_SECS,
        }
    }

    #[test]
    fn test_expiry_with_skew() {
        let tokens = AuthTokens::from_response(login(), None, 1000).unwrap();
        assert_eq!(tokens.expires_at, 1000 + ACCESS_TOKEN_EXPIRE_SECS);
        assert!(!tokens.is_expired(1000));
        assert!(tokens.is_expired(tokens.expires_at - EXPIRY_SKEW_SECS));
        assert!(tokens.is_expired(tokens.expires_at + 1));
        assert_eq!(tokens.authorization_header(), "Bearer access-0");
    }

    #[test]
    fn test_response_defaults() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":1800}"#).unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.refresh_token, None);
    }

    #[test]
    fn test_not_signed_in() {
        let refresher = FakeRefresher::new(false, false);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        let result = block_on(session.access_token(0));
        assert!(matches!(result, Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn test_valid_token_not_refreshed() {
        let refresher = FakeRefresher::new(false, false);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        block_on(session.sign_in(login(), 0)).unwrap();

        assert_eq!(block_on(session.access_token(60)).unwrap(), "access-0");
        assert_eq!(refresher.calls(), 0);
    }

    #[test]
    fn test_expired_token_refreshed_once_and_persisted() {
        let refresher = FakeRefresher::new(false, false);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        block_on(session.sign_in(login(), 0)).unwrap();

        let later = ACCESS_TOKEN_EXPIRE_SECS + 10;
        assert_eq!(block_on(session.access_token(later)).unwrap(), "access-1");
        assert_eq!(block_on(session.access_token(later + 5)).unwrap(), "access-1");
        assert_eq!(refresher.calls(), 1);

        let stored = block_on(session.store().load()).unwrap().unwrap();
        // Server did not rotate: the old refresh token is kept.
        assert_eq!(stored.refresh_token, "refresh-0");
        assert_eq!(stored.expires_at, later + ACCESS_TOKEN_EXPIRE_SECS);
    }

    #[test]
    fn test_rotated_refresh_token_stored() {
        let refresher = FakeRefresher::new(true, false);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        block_on(session.sign_in(login(), 0)).unwrap();

        block_on(session.access_token(ACCESS_TOKEN_EXPIRE_SECS)).unwrap();
        let stored = block_on(session.store().load()).unwrap().unwrap();
        assert_eq!(stored.refresh_token, "refresh-0-rotated");
    }

    #[test]
    fn test_rejected_refresh() {
        let refresher = FakeRefresher::new(false, true);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        block_on(session.sign_in(login(), 0)).unwrap();

        let result = block_on(session.access_token(ACCESS_TOKEN_EXPIRE_SECS * 2));
        assert!(matches!(result, Err(AuthError::RefreshRejected(_))));
        // Stored tokens are untouched.
        let stored = block_on(session.store().load()).unwrap().unwrap();
        assert_eq!(stored.access_token, "access-0");
    }

    #[test]
    fn test_sign_out() {
        let refresher = FakeRefresher::new(false, false);
        let session = AuthSession::new(MemoryTokenStore::new(), &refresher);
        block_on(session.sign_in(login(), 0)).unwrap();
        block_on(session.sign_out()).unwrap();
        assert!(matches!(
            block_on(session.access_token(0)),
            Err(AuthError::NotSignedIn)
        ));
    }
}
