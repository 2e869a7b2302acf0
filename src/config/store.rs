//! Configuration store: credentials plus the current access token.

use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::token::Token;
use crate::config::settings::PreludeConfig;

pub trait ConfigStore: Send + Sync {
    fn get_config(&self) -> impl Future<Output = Result<PreludeConfig>> + Send;

    /// Bearer string of the cached token, if present and not expired.
    fn get_current_access_token(&self) -> impl Future<Output = Option<String>> + Send;

    fn store_access_token(&self, token: Token) -> impl Future<Output = Result<()>> + Send;
}

/// In-memory store. Clones share the same token slot.
#[derive(Debug, Clone)]
pub struct MemoryConfigStore {
    config: Arc<PreludeConfig>,
    token: Arc<RwLock<Option<Token>>>,
}

impl MemoryConfigStore {
    pub fn new(config: PreludeConfig) -> Self {
        Self {
            config: Arc::new(config),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn current_token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    pub async fn clear_access_token(&self) {
        *self.token.write().await = None;
    }
}

impl ConfigStore for MemoryConfigStore {
    async fn get_config(&self) -> Result<PreludeConfig> {
        Ok(self.config.as_ref().clone())
    }

    async fn get_current_access_token(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid())
            .map(|token| token.value.to_owned())
    }

    async fn store_access_token(&self, token: Token) -> Result<()> {
        *self.token.write().await = Some(token);
        Ok(())
    }
}

/// Memory store that also persists the token as JSON (write tmp, chmod 0600, rename).
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    inner: MemoryConfigStore,
    path: PathBuf,
}

impl FileConfigStore {
    /// Reload a previously persisted token; expired or unreadable state is ignored.
    pub async fn open(config: PreludeConfig, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let inner = MemoryConfigStore::new(config);
        match read_token(&path).await {
            Ok(Some(token)) if token.is_valid() => {
                info!("token state restored from '{}'", path.display());
                *inner.token.write().await = Some(token);
            }
            Ok(Some(_)) => debug!("token state at '{}' is expired, ignored", path.display()),
            Ok(None) => debug!("no token state at '{}'", path.display()),
            Err(err) => warn!("token state at '{}' is unreadable: {}", path.display(), err),
        }
        Self { inner, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    async fn get_config(&self) -> Result<PreludeConfig> {
        self.inner.get_config().await
    }

    async fn get_current_access_token(&self) -> Option<String> {
        self.inner.get_current_access_token().await
    }

    /// The token is cached in memory first; a failed write only loses persistence.
    async fn store_access_token(&self, token: Token) -> Result<()> {
        self.inner.store_access_token(token.clone()).await?;
        match write_token(&self.path, &token).await {
            Ok(()) => info!("token state written, path '{}'", self.path.display()),
            Err(err) => warn!("token state not written, path '{}': {}", self.path.display(), err),
        }
        Ok(())
    }
}

async fn read_token(path: &Path) -> Result<Option<Token>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!(e)),
    }
}

/// Each write goes through its own temp file in the target directory, so
/// concurrent writers never share a temp path and the last rename wins.
async fn write_token(path: &Path, token: &Token) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let target = path.to_path_buf();
    let content = serde_json::to_vec(token)?;

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&parent)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file().set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        tmp.persist(&target).map_err(|e| anyhow!(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| anyhow!("token state writer failed: {}", e))?
}
