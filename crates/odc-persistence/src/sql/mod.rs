//! SQL-backed collaborators (MySQL/PostgreSQL via SeaORM)

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::*;
use tracing::debug;

use odc_core::{Asset, ConfigurationProvider, ConfigurationSnapshot, PublishedAssetSource};

use crate::entity::{configuration, data_asset};
use crate::model::AssetStatus;

/// Reads the connector configuration from the `configuration` table
#[derive(Debug)]
pub struct DbConfigurationProvider {
    db: Arc<DatabaseConnection>,
}

impl DbConfigurationProvider {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConfigurationProvider for DbConfigurationProvider {
    async fn configuration(&self) -> anyhow::Result<Option<ConfigurationSnapshot>> {
        let row = configuration::Entity::find()
            .order_by_asc(configuration::Column::Id)
            .one(self.db.as_ref())
            .await?;

        Ok(row.map(ConfigurationSnapshot::from))
    }
}

/// Reads published rows from the `data_asset` table, ordered by id
#[derive(Debug)]
pub struct DbAssetSource {
    db: Arc<DatabaseConnection>,
}

impl DbAssetSource {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PublishedAssetSource for DbAssetSource {
    async fn published_assets(&self) -> anyhow::Result<Vec<Asset>> {
        let rows = data_asset::Entity::find()
            .filter(data_asset::Column::Status.eq(i32::from(AssetStatus::Published)))
            .order_by_asc(data_asset::Column::Id)
            .all(self.db.as_ref())
            .await?;

        debug!(count = rows.len(), "Loaded published data assets");

        Ok(rows.into_iter().map(Asset::from).collect())
    }
}
