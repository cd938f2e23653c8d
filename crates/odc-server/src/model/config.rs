//! Application configuration
//!
//! Sources, lowest precedence first: `conf/application.yml`, `ODC_*`
//! environment variables (`ODC_SERVER__PORT` sets `server.port`), then
//! command line overrides.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use odc_common::DEFAULT_SECURITY_TOKEN;
use odc_core::{AssetSourcePolicy, ConfigurationSnapshot, EngineOptions};

use crate::startup::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8090;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_BROKER_TIMEOUT_MS: u64 = 10000;

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "odc-server", version, about = "Open data connector self-description server")]
pub struct Cli {
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(short = 'c', long = "config")]
    pub config_file: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process arguments.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let config_file = args
            .config_file
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = Config::builder()
            .add_source(File::with_name(&config_file).required(false))
            .add_source(environment());

        if let Some(port) = args.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = args.database_url {
            builder = builder.set_override("db.url", url)?;
        }

        Ok(Self::from_config(builder.build()?))
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Artifacts
    // ========================================================================

    /// Directory holding the files served under `/data/`
    pub fn artifacts_dir(&self) -> Option<PathBuf> {
        self.config
            .get_string("artifacts.dir")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    // ========================================================================
    // Connector identity and engine
    // ========================================================================

    /// Static connector identity, used when no database is configured
    pub fn static_connector(&self) -> Option<ConfigurationSnapshot> {
        let url = self.config.get_string("connector.url").ok()?;
        let field = |key: &str| self.config.get_string(key).unwrap_or_default();

        Some(ConfigurationSnapshot::new(
            url,
            field("connector.maintainer"),
            field("connector.curator"),
            field("connector.title"),
        ))
    }

    pub fn engine_options(&self) -> anyhow::Result<EngineOptions> {
        let read_timeout = self.millis("engine.read_timeout_ms", DEFAULT_READ_TIMEOUT_MS);
        let asset_source_policy = match self.config.get_string("engine.asset_source_policy") {
            Ok(policy) => policy
                .parse::<AssetSourcePolicy>()
                .map_err(anyhow::Error::msg)?,
            Err(_) => AssetSourcePolicy::default(),
        };

        Ok(EngineOptions {
            read_timeout,
            asset_source_policy,
        })
    }

    pub fn security_token(&self) -> String {
        self.config
            .get_string("security.token")
            .unwrap_or_else(|_| DEFAULT_SECURITY_TOKEN.to_string())
    }

    // ========================================================================
    // Broker
    // ========================================================================

    pub fn broker_urls(&self) -> Vec<String> {
        self.config
            .get::<Vec<String>>("broker.urls")
            .unwrap_or_default()
    }

    /// Period of the broker update loop; `None` when the loop is disabled
    pub fn broker_update_interval(&self) -> Option<Duration> {
        let secs = self
            .config
            .get_int("broker.update_interval_secs")
            .unwrap_or(0);
        (secs > 0).then(|| Duration::from_secs(secs as u64))
    }

    pub fn broker_timeout(&self) -> Duration {
        self.millis("broker.timeout_ms", DEFAULT_BROKER_TIMEOUT_MS)
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        if self.config.get_table("logging").is_err() {
            return LoggingConfig::from_env();
        }

        LoggingConfig::from_config(
            self.config.get_string("logging.dir").ok(),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            self.config
                .get_string("logging.level")
                .unwrap_or_else(|_| "info".to_string()),
            self.config.get_string("logging.rotation").ok(),
        )
    }

    // ========================================================================
    // Database
    // ========================================================================

    pub fn database_url(&self) -> Option<String> {
        self.config
            .get_string("db.url")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    pub async fn database_connection(&self) -> anyhow::Result<Option<DatabaseConnection>> {
        let Some(url) = self.database_url() else {
            return Ok(None);
        };

        let max_connections = self
            .config
            .get_int("db.pool.max_connections")
            .unwrap_or(10) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.connect_timeout_secs")
            .unwrap_or(8) as u64;

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(max_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .sqlx_logging(false);

        tracing::info!(
            max_connections = max_connections,
            connect_timeout = connect_timeout,
            "Database connection pool configured"
        );

        Ok(Some(Database::connect(opt).await?))
    }

    fn millis(&self, key: &str, default: u64) -> Duration {
        let ms = self
            .config
            .get_int(key)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(default);
        Duration::from_millis(ms)
    }
}

/// `ODC_ENGINE__READ_TIMEOUT_MS` overrides `engine.read_timeout_ms`.
fn environment() -> Environment {
    Environment::with_prefix("ODC")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("broker.urls")
        .try_parsing(true)
}
