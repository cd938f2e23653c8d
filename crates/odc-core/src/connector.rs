//! Connector self-description

use odc_api::{BaseConnector, Catalog, Fragment};

use crate::error::BuildError;
use crate::model::ConfigurationSnapshot;

/// Wrap `catalog` in the connector node described by `config`.
pub fn build(config: &ConfigurationSnapshot, catalog: Catalog) -> Result<BaseConnector, BuildError> {
    let title = Some(config.title.as_str()).filter(|t| !t.is_empty());

    Ok(BaseConnector::new(
        config.identity(Fragment::Connector)?,
        config.maintainer_uri()?,
        config.curator_uri()?,
        title,
        config.base_url()?,
        catalog,
    ))
}
