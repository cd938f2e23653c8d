//! Catalog assembly
//!
//! Joins the offered-resource computation (one build per published asset) with
//! the requested-resource computation into a single [`Catalog`].
//!
//! A malformed asset is logged and dropped; it never fails the catalog. Only a
//! failure of the join itself, or of the asset source under
//! [`AssetSourcePolicy::Strict`], fails the whole composition.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use futures::future::join_all;
use tracing::{debug, error, warn};

use odc_api::{Catalog, DataResource, Fragment};

use crate::{
    error::{AssetBuildFailure, EngineError, Result},
    model::{Asset, ConfigurationSnapshot},
    provider::PublishedAssetSource,
    resource,
};

/// How a failing or slow asset source affects the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetSourcePolicy {
    /// Log the failure and offer an empty catalog
    #[default]
    Lenient,
    /// Fail the catalog with a composition failure
    Strict,
}

impl AssetSourcePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSourcePolicy::Lenient => "lenient",
            AssetSourcePolicy::Strict => "strict",
        }
    }
}

impl Display for AssetSourcePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetSourcePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(AssetSourcePolicy::Lenient),
            "strict" => Ok(AssetSourcePolicy::Strict),
            _ => Err(format!("Invalid asset source policy: {}", s)),
        }
    }
}

/// Builds catalogs from the published asset source
pub struct CatalogAssembler {
    source: Arc<dyn PublishedAssetSource>,
    policy: AssetSourcePolicy,
    read_timeout: Duration,
}

impl CatalogAssembler {
    pub fn new(
        source: Arc<dyn PublishedAssetSource>,
        policy: AssetSourcePolicy,
        read_timeout: Duration,
    ) -> Self {
        Self {
            source,
            policy,
            read_timeout,
        }
    }

    /// Read the published assets, bounded by the read timeout and resolved per policy.
    pub async fn published_assets(&self) -> Result<Vec<Asset>> {
        let failure =
            match tokio::time::timeout(self.read_timeout, self.source.published_assets()).await {
                Ok(Ok(assets)) => return Ok(assets),
                Ok(Err(e)) => format!("published asset read failed: {:#}", e),
                Err(_) => format!(
                    "published asset read timed out after {:?}",
                    self.read_timeout
                ),
            };

        match self.policy {
            AssetSourcePolicy::Lenient => {
                error!("{}, offering an empty catalog", failure);
                Ok(Vec::new())
            }
            AssetSourcePolicy::Strict => Err(EngineError::CompositionFailure(failure)),
        }
    }

    /// Compose the catalog for `assets` under `config`.
    ///
    /// The offered list keeps the order of `assets`, minus the assets whose
    /// conversion failed.
    pub async fn assemble(
        &self,
        config: &ConfigurationSnapshot,
        assets: &[Asset],
    ) -> Result<Catalog> {
        let catalog_id = config.identity(Fragment::Catalog)?;

        let (offer, request) = tokio::try_join!(
            offer_resources(config, assets),
            request_resources(config)
        )?;

        debug!(
            published = assets.len(),
            offered = offer.len(),
            requested = request.len(),
            "Catalog assembled"
        );

        Ok(Catalog::new(catalog_id, offer, request))
    }
}

async fn offer_resources(
    config: &ConfigurationSnapshot,
    assets: &[Asset],
) -> Result<Vec<DataResource>> {
    let builds = assets.iter().map(|asset| async move {
        resource::build(config, asset).map_err(|source| AssetBuildFailure {
            asset_id: asset.id,
            source,
        })
    });

    let mut offer = Vec::with_capacity(assets.len());
    for result in join_all(builds).await {
        match result {
            Ok(resource) => offer.push(resource),
            Err(failure) => {
                warn!(asset_id = failure.asset_id, "Dropping asset from catalog: {}", failure);
            }
        }
    }
    Ok(offer)
}

// Asset requests are not modelled yet; the list stays empty but joins like the offer side.
async fn request_resources(_config: &ConfigurationSnapshot) -> Result<Vec<DataResource>> {
    Ok(Vec::new())
}
