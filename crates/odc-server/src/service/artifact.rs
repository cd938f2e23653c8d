//! Filesystem artifact store
//!
//! Files live flat under one directory and are named after the asset id,
//! optionally with an extension: `7` or `7.csv`.

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::debug;

use odc_core::{ArtifactContent, ArtifactStore};

#[derive(Clone, Debug)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn artifact(
        &self,
        asset_id: i64,
        extension: Option<&str>,
    ) -> anyhow::Result<Option<ArtifactContent>> {
        let file_name = match extension {
            Some(ext) if !is_plain_extension(ext) => return Ok(None),
            Some(ext) => format!("{}.{}", asset_id, ext),
            None => asset_id.to_string(),
        };

        let path = self.root.join(&file_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), size = bytes.len(), "Artifact read");
                Ok(Some(ArtifactContent::new(file_name, bytes)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Media type for an artifact file extension
pub fn content_type(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => "application/json",
        Some("jsonld") => "application/ld+json",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
