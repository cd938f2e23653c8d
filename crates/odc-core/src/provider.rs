//! Collaborator interfaces consumed by the assembly engine
//!
//! The engine never talks to storage or a token issuer directly; it reads
//! through these traits so backends can be swapped without touching assembly.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use odc_common::DEFAULT_SECURITY_TOKEN;

use crate::model::{Asset, ConfigurationSnapshot};

/// Source of the single current configuration record
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// `Ok(None)` means no configuration row exists.
    async fn configuration(&self) -> anyhow::Result<Option<ConfigurationSnapshot>>;
}

/// Source of the assets currently marked as publicly offered
#[async_trait]
pub trait PublishedAssetSource: Send + Sync {
    async fn published_assets(&self) -> anyhow::Result<Vec<Asset>>;
}

/// Issuer of the bearer token attached to broker lifecycle messages
#[async_trait]
pub trait TokenSupplier: Send + Sync {
    async fn security_token(&self) -> anyhow::Result<String>;
}

/// Bytes served at `<url>/data/<file name>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactContent {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ArtifactContent {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Extension of the file name, if any
    pub fn extension(&self) -> Option<&str> {
        self.file_name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// Storage holding the content of each asset
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// `Ok(None)` means nothing is stored for the asset under that extension.
    async fn artifact(
        &self,
        asset_id: i64,
        extension: Option<&str>,
    ) -> anyhow::Result<Option<ArtifactContent>>;
}

/// Token supplier returning a fixed placeholder value
#[derive(Clone, Debug)]
pub struct StaticTokenSupplier {
    token: String,
}

impl StaticTokenSupplier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Default for StaticTokenSupplier {
    fn default() -> Self {
        Self::new(DEFAULT_SECURITY_TOKEN)
    }
}

#[async_trait]
impl TokenSupplier for StaticTokenSupplier {
    async fn security_token(&self) -> anyhow::Result<String> {
        Ok(self.token.clone())
    }
}

/// In-memory configuration provider
#[derive(Debug, Default)]
pub struct MemoryConfigurationProvider {
    snapshot: RwLock<Option<ConfigurationSnapshot>>,
}

impl MemoryConfigurationProvider {
    pub fn new(snapshot: Option<ConfigurationSnapshot>) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub async fn set(&self, snapshot: Option<ConfigurationSnapshot>) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl ConfigurationProvider for MemoryConfigurationProvider {
    async fn configuration(&self) -> anyhow::Result<Option<ConfigurationSnapshot>> {
        Ok(self.snapshot.read().await.clone())
    }
}

/// In-memory published asset list, returned in insertion order
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: RwLock<Vec<Asset>>,
}

impl MemoryAssetSource {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: RwLock::new(assets),
        }
    }

    pub async fn replace(&self, assets: Vec<Asset>) {
        *self.assets.write().await = assets;
    }
}

#[async_trait]
impl PublishedAssetSource for MemoryAssetSource {
    async fn published_assets(&self) -> anyhow::Result<Vec<Asset>> {
        Ok(self.assets.read().await.clone())
    }
}

/// In-memory artifact store keyed by asset id
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<i64, ArtifactContent>>,
}

impl MemoryArtifactStore {
    pub async fn insert(&self, asset_id: i64, content: ArtifactContent) {
        self.artifacts.write().await.insert(asset_id, content);
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn artifact(
        &self,
        asset_id: i64,
        extension: Option<&str>,
    ) -> anyhow::Result<Option<ArtifactContent>> {
        let artifacts = self.artifacts.read().await;
        Ok(artifacts
            .get(&asset_id)
            .filter(|content| extension.is_none() || content.extension() == extension)
            .cloned())
    }
}
