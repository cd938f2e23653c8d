//! Message envelope construction
//!
//! Lifecycle messages (register, update, unregister) carry a security token;
//! the self-description response embeds the connector instead.

use chrono::Utc;
use url::Url;
use uuid::Uuid;

use odc_api::{
    AUTOGEN_BASE, BaseConnector, DynamicAttributeToken, Fragment, INFO_MODEL_VERSION, Message,
    MessageKind, MessagePayload,
};

use crate::error::{BuildError, parse_uri};
use crate::model::ConfigurationSnapshot;

/// Announce the connector to a broker.
pub fn registration(config: &ConfigurationSnapshot, token: &str) -> Result<Message, BuildError> {
    lifecycle(MessageKind::ConnectorAvailable, config, token)
}

/// Notify a broker that the self-description changed.
pub fn update(config: &ConfigurationSnapshot, token: &str) -> Result<Message, BuildError> {
    lifecycle(MessageKind::ConnectorUpdate, config, token)
}

/// Withdraw the connector from a broker.
pub fn unregistration(config: &ConfigurationSnapshot, token: &str) -> Result<Message, BuildError> {
    lifecycle(MessageKind::ConnectorUnavailable, config, token)
}

/// Answer a self-description query with the full connector.
pub fn self_description_response(
    config: &ConfigurationSnapshot,
    connector: BaseConnector,
) -> Result<Message, BuildError> {
    Ok(Message::new(
        MessageKind::SelfDescriptionResponse,
        config.identity(Fragment::SelfDescriptionResponse)?,
        Utc::now(),
        INFO_MODEL_VERSION,
        config.base_url()?,
        MessagePayload::Connector(Box::new(connector)),
    ))
}

/// Token-carrying message of `kind` issued by the configured connector.
pub fn lifecycle(
    kind: MessageKind,
    config: &ConfigurationSnapshot,
    token: &str,
) -> Result<Message, BuildError> {
    Ok(Message::new(
        kind,
        generated_id(kind)?,
        Utc::now(),
        INFO_MODEL_VERSION,
        config.base_url()?,
        MessagePayload::SecurityToken(DynamicAttributeToken::jwt(token)),
    ))
}

fn generated_id(kind: MessageKind) -> Result<Url, BuildError> {
    parse_uri(
        "message id",
        &format!("{}{}/{}", AUTOGEN_BASE, kind.autogen_segment(), Uuid::new_v4()),
    )
}
