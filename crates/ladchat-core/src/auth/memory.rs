//! In-memory token store.

use super::{AuthError, AuthResult, AuthTokens, BoxFuture, TokenStore};
use std::sync::RwLock;

/// In-memory token store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> BoxFuture<'_, AuthResult<Option<AuthTokens>>> {
        Box::pin(async move {
            let tokens = self
                .tokens
                .read()
                .map_err(|e| AuthError::Storage(format!("Lock error: {}", e)))?;
            Ok(tokens.clone())
        })
    }

    fn save(&self, tokens: &AuthTokens) -> BoxFuture<'_, AuthResult<()>> {
        let tokens = tokens.clone();
        Box::pin(async move {
            let mut slot = self
                .tokens
                .write()
                .map_err(|e| AuthError::Storage(format!("Lock error: {}", e)))?;
            *slot = Some(tokens);
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, AuthResult<()>> {
        Box::pin(async move {
            let mut slot = self
                .tokens
                .write()
                .map_err(|e| AuthError::Storage(format!("Lock error: {}", e)))?;
            *slot = None;
            Ok(())
        })
    }
}
