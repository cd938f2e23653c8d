//! Outbound message envelopes
//!
//! A [`Message`] is one of four lifecycle/query variants. All of them share the
//! issued timestamp, model version and issuer; the [`MessagePayload`] carries
//! either the security token or the embedded connector, never both.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::descriptor::BaseConnector;
use crate::model::{IDS_CONTEXT, IdsType, TokenFormat};

/// Message variant, emitted as `@type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "ids:ConnectorAvailableMessage")]
    ConnectorAvailable,
    #[serde(rename = "ids:ConnectorUpdateMessage")]
    ConnectorUpdate,
    #[serde(rename = "ids:ConnectorUnavailableMessage")]
    ConnectorUnavailable,
    #[serde(rename = "ids:SelfDescriptionResponse")]
    SelfDescriptionResponse,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::ConnectorAvailable => "ConnectorAvailableMessage",
            MessageKind::ConnectorUpdate => "ConnectorUpdateMessage",
            MessageKind::ConnectorUnavailable => "ConnectorUnavailableMessage",
            MessageKind::SelfDescriptionResponse => "SelfDescriptionResponse",
        }
    }

    /// Path segment used for generated message ids
    pub fn autogen_segment(&self) -> &'static str {
        match self {
            MessageKind::ConnectorAvailable => "connectorAvailableMessage",
            MessageKind::ConnectorUpdate => "connectorUpdateMessage",
            MessageKind::ConnectorUnavailable => "connectorUnavailableMessage",
            MessageKind::SelfDescriptionResponse => "selfDescriptionResponse",
        }
    }

    /// Whether the variant authenticates with a bearer token instead of embedding the connector
    pub fn requires_security_token(&self) -> bool {
        !matches!(self, MessageKind::SelfDescriptionResponse)
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bearer credential attached to broker lifecycle messages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicAttributeToken {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    pub token_format: TokenFormat,
    pub token_value: String,
}

impl DynamicAttributeToken {
    pub fn jwt(token_value: impl Into<String>) -> Self {
        Self {
            type_: IdsType::DynamicAttributeToken,
            token_format: TokenFormat::Jwt,
            token_value: token_value.into(),
        }
    }
}

/// Variant-specific body of a message, flattened into the envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessagePayload {
    SecurityToken(DynamicAttributeToken),
    Connector(Box<BaseConnector>),
}

/// Outbound message envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: MessageKind,
    #[serde(rename = "@id")]
    pub id: Url,
    pub issued: DateTime<Utc>,
    pub model_version: String,
    pub issuer_connector: Url,
    #[serde(flatten)]
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(
        kind: MessageKind,
        id: Url,
        issued: DateTime<Utc>,
        model_version: impl Into<String>,
        issuer_connector: Url,
        payload: MessagePayload,
    ) -> Self {
        Self {
            context: IDS_CONTEXT.to_string(),
            kind,
            id,
            issued,
            model_version: model_version.into(),
            issuer_connector,
            payload,
        }
    }

    pub fn security_token(&self) -> Option<&DynamicAttributeToken> {
        match &self.payload {
            MessagePayload::SecurityToken(token) => Some(token),
            MessagePayload::Connector(_) => None,
        }
    }

    pub fn connector(&self) -> Option<&BaseConnector> {
        match &self.payload {
            MessagePayload::Connector(connector) => Some(connector),
            MessagePayload::SecurityToken(_) => None,
        }
    }
}
