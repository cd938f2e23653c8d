//! Main entry point for the open data connector server.

use odc_server::{
    model::config::Configuration,
    service::broker::spawn_update_loop,
    startup::{self, ShutdownSignal},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let app_state = startup::build_state(&configuration).await?;

    let shutdown = ShutdownSignal::new();
    startup::shutdown_on_os_signal(shutdown.clone());

    let broker_urls = configuration.broker_urls();
    let update_loop = match configuration.broker_update_interval() {
        Some(period) if !broker_urls.is_empty() => Some(spawn_update_loop(
            app_state.service.clone(),
            app_state.broker_client.clone(),
            broker_urls,
            period,
            shutdown.clone(),
        )),
        _ => None,
    };

    let address = configuration.server_address();
    let port = configuration.server_port();
    info!("Connector listening on {}:{}", address, port);

    let server = startup::main_server(app_state, address, port)?;
    let result = server.await;

    shutdown.shutdown();
    if let Some(handle) = update_loop
        && let Err(e) = handle.await
    {
        error!("Broker update loop ended abnormally: {}", e);
    }

    result?;
    Ok(())
}
