use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::{TOKEN_KEY, TokenStore};

// In-memory key-value store; the token lives under `TOKEN_KEY`.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    pub entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, String> {
        let entries = self.entries.lock().await;
        Ok(entries.get(TOKEN_KEY).cloned())
    }

    async fn set(&self, token: String) -> Result<(), String> {
        let mut entries = self.entries.lock().await;
        entries.insert(TOKEN_KEY.to_string(), token);
        Ok(())
    }

    async fn delete(&self) -> Result<(), String> {
        let mut entries = self.entries.lock().await;
        entries.remove(TOKEN_KEY);
        Ok(())
    }
}

// Key-value JSON file shared by every process on the machine, so a CLI login
// survives between invocations. Other keys in the file are left alone.
#[derive(Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Arc<Mutex<()>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>, String> {
        match self.read_raw().await? {
            Some(raw) => self.parse(&raw),
            None => Ok(Map::new()),
        }
    }

    // Used before a write: a corrupt file is replaced rather than blocking
    // every later login or token clear. The flag is true when it was corrupt.
    async fn load_for_write(&self) -> Result<(Map<String, Value>, bool), String> {
        let Some(raw) = self.read_raw().await? else {
            return Ok((Map::new(), false));
        };
        match self.parse(&raw) {
            Ok(entries) => Ok((entries, false)),
            Err(err) => {
                tracing::warn!(error = %err, "token file is corrupt, overwriting it.");
                Ok((Map::new(), true))
            }
        }
    }

    async fn read_raw(&self) -> Result<Option<Vec<u8>>, String> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("failed to read {}: {err}", self.path.display())),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn parse(&self, raw: &[u8]) -> Result<Map<String, Value>, String> {
        serde_json::from_slice(raw)
            .map_err(|err| format!("failed to parse {}: {err}", self.path.display()))
    }

    // Write to a sibling file then rename, so readers never see a partial value.
    async fn store(&self, entries: &Map<String, Value>) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
        }

        let raw = serde_json::to_vec_pretty(entries).map_err(|err| err.to_string())?;
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &raw)
            .await
            .map_err(|err| format!("failed to write {}: {err}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| format!("failed to replace {}: {err}", self.path.display()))
    }
}

// The file holds a bearer token, so it is readable by the owner only.
async fn write_private(path: &Path, raw: &[u8]) -> std::io::Result<()> {
    // A leftover temp file would keep its old permissions.
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(raw).await?;
    file.sync_all().await
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>, String> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn set(&self, token: String) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let (mut entries, _) = self.load_for_write().await?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token));
        self.store(&entries).await
    }

    async fn delete(&self) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let (mut entries, corrupt) = self.load_for_write().await?;
        if entries.remove(TOKEN_KEY).is_none() && !corrupt {
            return Ok(());
        }
        self.store(&entries).await
    }
}
