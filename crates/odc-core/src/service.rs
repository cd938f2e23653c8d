//! Self-description service
//!
//! Entry point used by the HTTP layer and the broker loop. Every call reads a
//! fresh configuration snapshot; nothing is cached between calls.

use std::{sync::Arc, time::Duration};

use tracing::{error, warn};

use odc_api::{BaseConnector, Catalog, Message, MessageKind};

use crate::{
    catalog::{AssetSourcePolicy, CatalogAssembler},
    connector,
    error::{EngineError, Result},
    message,
    model::ConfigurationSnapshot,
    provider::{
        ArtifactContent, ArtifactStore, ConfigurationProvider, MemoryArtifactStore,
        PublishedAssetSource, TokenSupplier,
    },
};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

const NO_CONFIG_AVAILABLE: &str = "No config available.";

/// Engine tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Upper bound for each external read
    pub read_timeout: Duration,
    pub asset_source_policy: AssetSourcePolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            asset_source_policy: AssetSourcePolicy::default(),
        }
    }
}

/// Assembles catalogs, connector descriptors and messages on demand
pub struct SelfDescriptionService {
    configuration: Arc<dyn ConfigurationProvider>,
    tokens: Arc<dyn TokenSupplier>,
    artifacts: Arc<dyn ArtifactStore>,
    catalogs: CatalogAssembler,
    read_timeout: Duration,
}

impl SelfDescriptionService {
    pub fn new(
        configuration: Arc<dyn ConfigurationProvider>,
        assets: Arc<dyn PublishedAssetSource>,
        tokens: Arc<dyn TokenSupplier>,
        options: EngineOptions,
    ) -> Self {
        Self {
            configuration,
            tokens,
            artifacts: Arc::new(MemoryArtifactStore::default()),
            catalogs: CatalogAssembler::new(
                assets,
                options.asset_source_policy,
                options.read_timeout,
            ),
            read_timeout: options.read_timeout,
        }
    }

    /// Serve artifacts from `artifacts` instead of the empty default store.
    pub fn with_artifacts(mut self, artifacts: Arc<dyn ArtifactStore>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Read the current configuration snapshot.
    pub async fn configuration(&self) -> Result<ConfigurationSnapshot> {
        match tokio::time::timeout(self.read_timeout, self.configuration.configuration()).await {
            Ok(Ok(Some(snapshot))) => Ok(snapshot),
            Ok(Ok(None)) => Err(EngineError::ConfigUnavailable(
                NO_CONFIG_AVAILABLE.to_string(),
            )),
            Ok(Err(e)) => Err(EngineError::ConfigUnavailable(format!("{:#}", e))),
            Err(_) => Err(EngineError::ConfigUnavailable(format!(
                "configuration read timed out after {:?}",
                self.read_timeout
            ))),
        }
    }

    /// Fetch the bearer token for lifecycle messages.
    pub async fn security_token(&self) -> Result<String> {
        match tokio::time::timeout(self.read_timeout, self.tokens.security_token()).await {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(e)) => Err(EngineError::TokenUnavailable(format!("{:#}", e))),
            Err(_) => Err(EngineError::TokenUnavailable(format!(
                "token read timed out after {:?}",
                self.read_timeout
            ))),
        }
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        let (_, catalog) = self.described_catalog().await.inspect_err(log_failure("catalog"))?;
        Ok(catalog)
    }

    pub async fn connector(&self) -> Result<BaseConnector> {
        let (_, connector) = self
            .described_connector()
            .await
            .inspect_err(log_failure("connector"))?;
        Ok(connector)
    }

    pub async fn registration_message(&self) -> Result<Message> {
        self.message(MessageKind::ConnectorAvailable).await
    }

    pub async fn update_message(&self) -> Result<Message> {
        self.message(MessageKind::ConnectorUpdate).await
    }

    pub async fn unregistration_message(&self) -> Result<Message> {
        self.message(MessageKind::ConnectorUnavailable).await
    }

    pub async fn self_description_response(&self) -> Result<Message> {
        self.message(MessageKind::SelfDescriptionResponse).await
    }

    /// Fetch the content of a published asset.
    ///
    /// Assets that are not currently published are reported as not found,
    /// whether or not the store holds content for them.
    pub async fn artifact(&self, asset_id: i64, extension: Option<&str>) -> Result<ArtifactContent> {
        let published = self.catalogs.published_assets().await?;
        if !published.iter().any(|asset| asset.id == asset_id) {
            return Err(EngineError::ArtifactNotFound(asset_id));
        }

        let result = match tokio::time::timeout(
            self.read_timeout,
            self.artifacts.artifact(asset_id, extension),
        )
        .await
        {
            Ok(Ok(Some(content))) => Ok(content),
            Ok(Ok(None)) => Err(EngineError::ArtifactNotFound(asset_id)),
            Ok(Err(e)) => Err(EngineError::ArtifactUnavailable(format!("{:#}", e))),
            Err(_) => Err(EngineError::ArtifactUnavailable(format!(
                "artifact read timed out after {:?}",
                self.read_timeout
            ))),
        };
        result.inspect_err(|e| warn!(asset_id, "Artifact not served: {}", e))
    }

    /// Build the message of the given kind.
    pub async fn message(&self, kind: MessageKind) -> Result<Message> {
        let result = if kind.requires_security_token() {
            self.lifecycle_message(kind).await
        } else {
            self.response_message().await
        };
        result.inspect_err(log_failure(kind.as_str()))
    }

    /// Build a message together with the connector it describes.
    ///
    /// Configuration, token and assets are each read once, so the message
    /// issuer and the connector always come from the same snapshot.
    pub async fn announcement(&self, kind: MessageKind) -> Result<(Message, BaseConnector)> {
        let result = if kind.requires_security_token() {
            self.lifecycle_announcement(kind).await
        } else {
            self.response_announcement().await
        };
        result.inspect_err(log_failure(kind.as_str()))
    }

    async fn lifecycle_message(&self, kind: MessageKind) -> Result<Message> {
        let (config, token) = tokio::join!(self.configuration(), self.security_token());
        let config = config?;
        let token = token?;

        Ok(message::lifecycle(kind, &config, &token)?)
    }

    async fn lifecycle_announcement(&self, kind: MessageKind) -> Result<(Message, BaseConnector)> {
        let (config, token, assets) = tokio::join!(
            self.configuration(),
            self.security_token(),
            self.catalogs.published_assets()
        );
        let config = config?;
        let token = token?;
        let assets = assets?;

        let catalog = self.catalogs.assemble(&config, &assets).await?;
        let message = message::lifecycle(kind, &config, &token)?;
        let connector = connector::build(&config, catalog)?;
        Ok((message, connector))
    }

    async fn response_announcement(&self) -> Result<(Message, BaseConnector)> {
        let (config, connector) = self.described_connector().await?;
        let message = message::self_description_response(&config, connector.clone())?;
        Ok((message, connector))
    }

    async fn response_message(&self) -> Result<Message> {
        let (config, connector) = self.described_connector().await?;
        Ok(message::self_description_response(&config, connector)?)
    }

    async fn described_catalog(&self) -> Result<(ConfigurationSnapshot, Catalog)> {
        let (config, assets) = tokio::join!(self.configuration(), self.catalogs.published_assets());
        let config = config?;
        let assets = assets?;

        let catalog = self.catalogs.assemble(&config, &assets).await?;
        Ok((config, catalog))
    }

    async fn described_connector(&self) -> Result<(ConfigurationSnapshot, BaseConnector)> {
        let (config, catalog) = self.described_catalog().await?;
        let connector = connector::build(&config, catalog)?;
        Ok((config, connector))
    }
}

fn log_failure(target: &'static str) -> impl Fn(&EngineError) {
    move |e| error!("Failed to build {}: {}", target, e)
}
