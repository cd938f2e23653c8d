//! Broker transport
//!
//! Lifecycle messages travel to a broker as a multipart POST: the `header`
//! part carries the message, and for register and update the `payload` part
//! carries the connector self-description.

use std::{fmt::Display, str::FromStr, sync::Arc, time::Duration};

use futures::future::join_all;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use odc_api::{BaseConnector, Message, MessageKind};
use odc_common::LD_JSON_CONTENT_TYPE;
use odc_core::SelfDescriptionService;

use crate::startup::ShutdownSignal;

/// Error type for broker deliveries
#[derive(Debug, thiserror::Error)]
pub enum BrokerClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("broker rejected message: status={status}, body={body}")]
    Rejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, BrokerClientError>;

/// Lifecycle operation requested against a broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerAction {
    Register,
    Update,
    Unregister,
}

impl BrokerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerAction::Register => "register",
            BrokerAction::Update => "update",
            BrokerAction::Unregister => "unregister",
        }
    }

    pub fn message_kind(&self) -> MessageKind {
        match self {
            BrokerAction::Register => MessageKind::ConnectorAvailable,
            BrokerAction::Update => MessageKind::ConnectorUpdate,
            BrokerAction::Unregister => MessageKind::ConnectorUnavailable,
        }
    }

    /// Whether the connector self-description travels with the message
    pub fn carries_payload(&self) -> bool {
        !matches!(self, BrokerAction::Unregister)
    }
}

impl Display for BrokerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BrokerAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "register" => Ok(BrokerAction::Register),
            "update" => Ok(BrokerAction::Update),
            "unregister" => Ok(BrokerAction::Unregister),
            _ => Err(format!("unknown broker action '{}'", s)),
        }
    }
}

/// HTTP client posting messages to brokers
#[derive(Clone, Debug)]
pub struct BrokerClient {
    http_client: reqwest::Client,
}

impl BrokerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    /// Post `message` (and `connector`, if given) to `broker_url`. Not retried.
    pub async fn send(
        &self,
        broker_url: &str,
        message: &Message,
        connector: Option<&BaseConnector>,
    ) -> Result<()> {
        let mut form = Form::new().part("header", json_part(message)?);
        if let Some(connector) = connector {
            form = form.part("payload", json_part(connector)?);
        }

        let response = self
            .http_client
            .post(broker_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(broker = broker_url, status = status.as_u16(), "Broker rejected {}", message.kind);
            return Err(BrokerClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(broker = broker_url, kind = %message.kind, "Message delivered");
        Ok(())
    }
}

fn json_part(value: &impl Serialize) -> Result<Part> {
    let body = serde_json::to_vec(value)?;
    Ok(Part::bytes(body).mime_str(LD_JSON_CONTENT_TYPE)?)
}

/// Build the message for `action` and deliver it to `broker_url`.
///
/// Returns the delivered message.
pub async fn deliver(
    service: &SelfDescriptionService,
    client: &BrokerClient,
    action: BrokerAction,
    broker_url: &str,
) -> anyhow::Result<Message> {
    let kind = action.message_kind();
    let (message, connector) = if action.carries_payload() {
        let (message, connector) = service.announcement(kind).await?;
        (message, Some(connector))
    } else {
        (service.message(kind).await?, None)
    };

    client.send(broker_url, &message, connector.as_ref()).await?;
    info!(broker = broker_url, action = %action, "Broker notified");
    Ok(message)
}

/// Periodically send update messages to every configured broker until shutdown.
pub fn spawn_update_loop(
    service: Arc<SelfDescriptionService>,
    client: BrokerClient,
    broker_urls: Vec<String>,
    period: Duration,
    shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    let mut shutdown_rx = shutdown.subscribe();

    tokio::spawn(async move {
        info!(
            brokers = broker_urls.len(),
            period_secs = period.as_secs(),
            "Broker update loop started"
        );

        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    update_all(&service, &client, &broker_urls).await;
                }
                _ = shutdown_rx.recv() => {
                    info!("Broker update loop stopped");
                    break;
                }
            }
        }
    })
}

async fn update_all(service: &SelfDescriptionService, client: &BrokerClient, broker_urls: &[String]) {
    let deliveries = broker_urls
        .iter()
        .map(|url| deliver(service, client, BrokerAction::Update, url));

    for (url, result) in broker_urls.iter().zip(join_all(deliveries).await) {
        if let Err(e) = result {
            warn!(broker = %url, "Periodic update failed: {:#}", e);
        }
    }
}
