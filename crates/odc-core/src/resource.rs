//! Asset to resource conversion
//!
//! Builds one [`DataResource`] per published asset. A failure here is scoped to
//! the single asset; callers decide whether to drop it (see [`crate::catalog`]).

use odc_api::{Agent, Artifact, DataResource, Fragment, Host, IdsType, PlainLiteral, StaticEndpoint};

use crate::error::{BuildError, parse_uri};
use crate::model::{Asset, ConfigurationSnapshot};

/// Convert one asset into its resource descriptor.
pub fn build(config: &ConfigurationSnapshot, asset: &Asset) -> Result<DataResource, BuildError> {
    let custom_license = asset
        .license_url
        .as_deref()
        .map(|license| parse_uri("license", license))
        .transpose()?;

    Ok(DataResource {
        type_: IdsType::DataResource,
        id: config.identity(Fragment::DataResource)?,
        version: asset.version.clone(),
        title: PlainLiteral::list(asset.dataset_title.as_deref()),
        description: PlainLiteral::list(asset.dataset_description.as_deref()),
        keyword: keywords(&asset.tags),
        custom_license,
        resource_endpoint: endpoint(config, asset)?,
        publisher: Agent::new(config.identity(Fragment::Publisher)?, None, None),
        sovereign: Agent::new(
            config.identity(Fragment::Sovereign)?,
            asset.organization_title.as_deref(),
            asset.organization_description.as_deref(),
        ),
    })
}

fn endpoint(config: &ConfigurationSnapshot, asset: &Asset) -> Result<StaticEndpoint, BuildError> {
    let host = Host::with_id(config.identity(Fragment::Host)?, config.base_url()?);
    let artifact = Artifact::new(
        config.identity(Fragment::Artifact)?,
        asset.file_name(),
        asset.created_at,
    );
    Ok(StaticEndpoint::new(
        config.identity(Fragment::ResourceEndpoint)?,
        host,
        artifact,
    ))
}

fn keywords(tags: &[String]) -> Vec<PlainLiteral> {
    tags.iter().map(PlainLiteral::new).collect()
}
