//! File-based token store for native platforms.

use super::{AuthError, AuthResult, AuthTokens, BoxFuture, TokenStore};
use std::fs;
use std::path::PathBuf;

const TOKEN_FILE: &str = "tokens.json";

/// Stores the token set as a JSON file in a directory.
pub struct FileTokenStore {
    base_path: PathBuf,
}

impl FileTokenStore {
    /// Create a store in the given directory, creating it if needed.
    pub fn new(base_path: PathBuf) -> AuthResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                AuthError::Storage(format!("Failed to create token directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create the store in the platform data directory.
    ///
    /// On Unix: `~/.local/share/ladchat/auth/`
    pub fn default_location() -> AuthResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| AuthError::Storage("Could not determine home directory".to_string()))?;
        Self::new(base.join("ladchat").join("auth"))
    }

    pub fn token_path(&self) -> PathBuf {
        self.base_path.join(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> BoxFuture<'_, AuthResult<Option<AuthTokens>>> {
        let path = self.token_path();
        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                AuthError::Storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&json).map(Some).map_err(|e| {
                AuthError::Storage(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn save(&self, tokens: &AuthTokens) -> BoxFuture<'_, AuthResult<()>> {
        let path = self.token_path();
        let json = match serde_json::to_string_pretty(tokens) {
            Ok(json) => json,
            Err(e) => return Box::pin(async move { Err(AuthError::Storage(e.to_string())) }),
        };
        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                AuthError::Storage(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn clear(&self) -> BoxFuture<'_, AuthResult<()>> {
        let path = self.token_path();
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    AuthError::Storage(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::block_on;
    use super::*;
    use tempfile::tempdir;

    fn tokens() -> AuthTokens {
        AuthTokens {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
            expires_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("auth")).unwrap();

        assert_eq!(block_on(store.load()).unwrap(), None);
        block_on(store.save(&tokens())).unwrap();
        assert!(store.token_path().exists());

        // A fresh store over the same directory sees the tokens.
        let reopened = FileTokenStore::new(dir.path().join("auth")).unwrap();
        assert_eq!(block_on(reopened.load()).unwrap(), Some(tokens()));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf()).unwrap();
        block_on(store.save(&tokens())).unwrap();
        block_on(store.clear()).unwrap();
        assert!(!store.token_path().exists());
        block_on(store.clear()).unwrap();
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf()).unwrap();
        fs::write(store.token_path(), "{not json").unwrap();
        assert!(matches!(block_on(store.load()), Err(AuthError::Storage(_))));
    }
}
