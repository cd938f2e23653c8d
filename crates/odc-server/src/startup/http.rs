//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};
use tracing::info;

use odc_core::{
    ConfigurationProvider, MemoryAssetSource, MemoryConfigurationProvider, PublishedAssetSource,
    SelfDescriptionService, StaticTokenSupplier,
};
use odc_persistence::{DbAssetSource, DbConfigurationProvider};

use crate::{
    api::route,
    model::{app_state::AppState, config::Configuration},
    service::{artifact::FileArtifactStore, broker::BrokerClient},
};

/// Wire the engine to its collaborators.
///
/// With `db.url` set, configuration and assets come from the database.
/// Otherwise the static `connector.*` identity is served with no assets.
pub async fn build_state(configuration: &Configuration) -> anyhow::Result<Arc<AppState>> {
    let (config_provider, asset_source): (
        Arc<dyn ConfigurationProvider>,
        Arc<dyn PublishedAssetSource>,
    ) = match configuration.database_connection().await? {
        Some(db) => {
            info!("Reading connector configuration and assets from the database");
            let db = Arc::new(db);
            (
                Arc::new(DbConfigurationProvider::new(db.clone())),
                Arc::new(DbAssetSource::new(db)),
            )
        }
        None => {
            info!("No database configured, serving the static connector identity");
            (
                Arc::new(MemoryConfigurationProvider::new(
                    configuration.static_connector(),
                )),
                Arc::new(MemoryAssetSource::default()),
            )
        }
    };

    let mut service = SelfDescriptionService::new(
        config_provider,
        asset_source,
        Arc::new(StaticTokenSupplier::new(configuration.security_token())),
        configuration.engine_options()?,
    );
    if let Some(dir) = configuration.artifacts_dir() {
        info!(dir = %dir.display(), "Serving artifacts from disk");
        service = service.with_artifacts(Arc::new(FileArtifactStore::new(dir)));
    }
    let service = Arc::new(service);
    let broker_client = BrokerClient::new(configuration.broker_timeout())?;

    Ok(Arc::new(AppState::new(service, broker_client)))
}

/// Creates and binds the connector HTTP server.
pub fn main_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .configure(route::configure)
    })
    .bind((address, port))?
    .run())
}
