//! File-backed configuration store

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt};

use crate::{MockConfig, StoreError};

/// Serves a JSON document from disk, seeding it with [`MockConfig::default`]
///
/// The file is re-read on every load, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default document unless the file already exists
    ///
    /// Returns `true` if the file was created by this call. The document is
    /// written to a scratch file next to the target and then linked into
    /// place, so readers only ever see a complete file and concurrent
    /// callers never clobber each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub async fn ensure_exists(&self) -> Result<bool, StoreError> {
        if fs::try_exists(&self.path)
            .await
            .map_err(|source| self.read_error(source))?
        {
            return Ok(false);
        }

        let document =
            serde_json::to_vec_pretty(&MockConfig::default()).map_err(StoreError::Serialise)?;

        let scratch = self.scratch_path();
        let linked = match write_file(&scratch, &document).await {
            Ok(()) => fs::hard_link(&scratch, &self.path).await,
            Err(err) => Err(err),
        };

        match fs::remove_file(&scratch).await {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                tracing::warn!(path = %scratch.display(), error = %err, "Failed to remove scratch file");
            }
            _ => {}
        }

        match linked {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Created default configuration file");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(self.write_error(source)),
        }
    }

    /// Load the document, creating it first if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, created or parsed.
    pub async fn load(&self) -> Result<Value, StoreError> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.ensure_exists().await?;
                fs::read(&self.path)
                    .await
                    .map_err(|source| self.read_error(source))?
            }
            Err(source) => return Err(self.read_error(source)),
        };

        serde_json::from_slice(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Unique sibling of the target, on the same filesystem
    fn scratch_path(&self) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let name = self
            .path
            .file_name()
            .map_or_else(|| "config".into(), |name| name.to_string_lossy());
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);

        self.path
            .with_file_name(format!(".{name}.{}.{unique}.tmp", std::process::id()))
    }

    fn read_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    file.sync_all().await
}
