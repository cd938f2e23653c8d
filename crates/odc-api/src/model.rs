//! Common information model constants and enums
//!
//! This module defines the protocol constants, vocabulary terms and
//! identity fragments shared by every descriptor and message.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use url::Url;

// Information model versions
pub const INFO_MODEL_VERSION: &str = "2.0.0";
pub const SUPPORTED_INFO_MODEL_VERSIONS: &[&str] = &[INFO_MODEL_VERSION];
pub const CONNECTOR_VERSION: &str = "0.0.1";

// JSON-LD
pub const IDS_CONTEXT: &str = "https://w3id.org/idsa/contexts/2.0.0/context.jsonld";
pub const AUTOGEN_BASE: &str = "https://w3id.org/idsa/autogen/";

// Resource host defaults
pub const HOST_PATH_PREFIX: &str = "/";

/// Vocabulary class of a descriptor node, emitted as `@type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdsType {
    #[serde(rename = "ids:BaseConnector")]
    BaseConnector,
    #[serde(rename = "ids:Catalog")]
    Catalog,
    #[serde(rename = "ids:DataResource")]
    DataResource,
    #[serde(rename = "ids:StaticEndpoint")]
    StaticEndpoint,
    #[serde(rename = "ids:Artifact")]
    Artifact,
    #[serde(rename = "ids:Host")]
    Host,
    #[serde(rename = "ids:Agent")]
    Agent,
    #[serde(rename = "ids:DynamicAttributeToken")]
    DynamicAttributeToken,
}

/// Security profile a connector claims to fulfil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecurityProfile {
    #[default]
    #[serde(rename = "idsc:BASE_CONNECTOR_SECURITY_PROFILE")]
    BaseConnector,
    #[serde(rename = "idsc:TRUSTED_CONNECTOR_SECURITY_PROFILE")]
    TrustedConnector,
}

impl SecurityProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityProfile::BaseConnector => "BASE_CONNECTOR_SECURITY_PROFILE",
            SecurityProfile::TrustedConnector => "TRUSTED_CONNECTOR_SECURITY_PROFILE",
        }
    }
}

impl Display for SecurityProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport protocol of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    #[serde(rename = "idsc:HTTP")]
    Http,
    #[serde(rename = "idsc:HTTPS")]
    Https,
}

/// Encoding of a security token value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenFormat {
    #[default]
    #[serde(rename = "idsc:JWT")]
    Jwt,
}

/// Role-scoped identity suffixes appended to the connector base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Connector,
    Catalog,
    DataResource,
    ResourceEndpoint,
    Artifact,
    Host,
    Publisher,
    Sovereign,
    SelfDescriptionResponse,
}

impl Fragment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fragment::Connector => "Connector",
            Fragment::Catalog => "Catalog",
            Fragment::DataResource => "DataResource",
            Fragment::ResourceEndpoint => "ResourceEndpoint",
            Fragment::Artifact => "Artifact",
            Fragment::Host => "Host",
            Fragment::Publisher => "Publisher",
            Fragment::Sovereign => "Sovereign",
            Fragment::SelfDescriptionResponse => "SelfDescriptionResponse",
        }
    }

    /// Concatenate `base` and `#<fragment>` into an identity URI.
    ///
    /// The base is used verbatim, so an unparsable base fails here rather than
    /// being silently normalized.
    pub fn uri(&self, base: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}#{}", base, self.as_str()))
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Fragment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Connector" => Ok(Fragment::Connector),
            "Catalog" => Ok(Fragment::Catalog),
            "DataResource" => Ok(Fragment::DataResource),
            "ResourceEndpoint" => Ok(Fragment::ResourceEndpoint),
            "Artifact" => Ok(Fragment::Artifact),
            "Host" => Ok(Fragment::Host),
            "Publisher" => Ok(Fragment::Publisher),
            "Sovereign" => Ok(Fragment::Sovereign),
            "SelfDescriptionResponse" => Ok(Fragment::SelfDescriptionResponse),
            _ => Err(format!("Invalid fragment: {}", s)),
        }
    }
}
