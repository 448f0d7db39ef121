//! Template retrieval.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Source of template binaries, looked up by identifier.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>>;
}

/// Templates stored as plain files in one directory.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.contains("..");
        plain.then(|| self.root.join(id))
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .resolve(id)
            .ok_or_else(|| Error::TemplateNotFound(id.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!(id, bytes = bytes.len(), "fetched template");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::TemplateNotFound(id.to_string()))
            }
            Err(e) => Err(Error::Storage {
                id: id.to_string(),
                details: e.to_string(),
            }),
        }
    }
}
