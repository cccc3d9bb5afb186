//! Login persistence between runs

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::domain::session::AccessToken;

const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// A session read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSession {
    pub token: AccessToken,
    pub username: Option<String>,
}

/// Keeps the bearer token in `session.json` under the data directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, token: &AccessToken, username: Option<&str>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .wrap_err_with(|| format!("cannot create {}", dir.display()))?;
        }
        let stored = StoredSession {
            access_token: token.expose().to_string(),
            username: username.map(String::from),
        };
        let json = serde_json::to_vec_pretty(&stored)?;
        tokio::fs::write(&self.path, json)
            .await
            .wrap_err_with(|| format!("cannot write {}", self.path.display()))?;
        restrict_permissions(&self.path).await?;
        log::debug!("session saved to {}", self.path.display());
        Ok(())
    }

    /// `Ok(None)` when nobody is logged in
    pub async fn load(&self) -> Result<Option<SavedSession>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("cannot read {}", self.path.display()))
            }
        };
        let stored: StoredSession = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("malformed session file {}", self.path.display()))?;
        if stored.access_token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(SavedSession {
            token: AccessToken::new(stored.access_token),
            username: stored.username,
        }))
    }

    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).wrap_err_with(|| format!("cannot remove {}", self.path.display())),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};
    tokio::fs::set_permissions(path, Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(&dir.path().join("nested"));
        assert_eq!(store.load().await?, None);

        store.save(&AccessToken::new("tok"), Some("alice")).await?;
        assert_eq!(
            store.load().await?,
            Some(SavedSession {
                token: AccessToken::new("tok"),
                username: Some("alice".into()),
            })
        );

        store.clear().await?;
        assert_eq!(store.load().await?, None);
        // Clearing twice is fine
        store.clear().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path());
        tokio::fs::write(store.path(), "not json").await?;
        assert!(store.load().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_token_means_logged_out() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path());
        tokio::fs::write(store.path(), r#"{"access_token": " "}"#).await?;
        assert_eq!(store.load().await?, None);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_private() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path());
        store.save(&AccessToken::new("tok"), None).await?;
        let mode = tokio::fs::metadata(store.path()).await?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
