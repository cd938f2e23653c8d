//! Self-description descriptor models
//!
//! Plain immutable value types for the connector, catalog, resource, endpoint
//! and agent nodes of a self-description document.
//!
//! Optional scalar fields are `Option` and list fields are `Vec`; both are skipped
//! on serialization when absent or empty, so an omitted asset attribute never
//! shows up as `null` or `[]` on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use odc_common::DATA_PATH;

use crate::model::{
    CONNECTOR_VERSION, HOST_PATH_PREFIX, IDS_CONTEXT, INFO_MODEL_VERSION, IdsType, Protocol,
    SUPPORTED_INFO_MODEL_VERSIONS, SecurityProfile,
};

/// Text value with an optional language tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainLiteral {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(
        rename = "@language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,
}

impl PlainLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
        }
    }

    /// Wrap an optional text into a literal list; an absent value yields no literal.
    pub fn list(value: Option<&str>) -> Vec<PlainLiteral> {
        value.map(|v| vec![PlainLiteral::new(v)]).unwrap_or_default()
    }
}

/// Network location a connector or endpoint is reachable at
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Url>,
    pub access_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    pub protocol: Protocol,
}

impl Host {
    /// Anonymous host node as embedded in the connector's host list
    pub fn new(access_url: Url) -> Self {
        Self {
            type_: IdsType::Host,
            id: None,
            access_url,
            path_prefix: None,
            protocol: Protocol::Http,
        }
    }

    /// Identified host node used by resource endpoints
    pub fn with_id(id: Url, access_url: Url) -> Self {
        Self {
            type_: IdsType::Host,
            id: Some(id),
            access_url,
            path_prefix: Some(HOST_PATH_PREFIX.to_string()),
            protocol: Protocol::Http,
        }
    }
}

/// The file a resource endpoint serves
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    pub creation_date: DateTime<Utc>,
    pub file_name: String,
}

impl Artifact {
    pub fn new(id: Url, file_name: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            type_: IdsType::Artifact,
            id,
            creation_date,
            file_name: file_name.into(),
        }
    }
}

/// Access path facet of a resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticEndpoint {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    pub endpoint_artifact: Artifact,
    pub endpoint_host: Host,
    pub path: String,
}

impl StaticEndpoint {
    pub fn new(id: Url, endpoint_host: Host, endpoint_artifact: Artifact) -> Self {
        Self {
            type_: IdsType::StaticEndpoint,
            id,
            endpoint_artifact,
            endpoint_host,
            path: DATA_PATH.to_string(),
        }
    }

    /// Full address peers fetch the artifact from: `<access-url>/data/<file-name>`.
    pub fn access_url(&self) -> Result<Url, url::ParseError> {
        let base = self.endpoint_host.access_url.as_str().trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        let path = if path.ends_with('/') || path.is_empty() {
            path.to_string()
        } else {
            format!("{}/", path)
        };
        Url::parse(&format!(
            "{}/{}{}",
            base, path, self.endpoint_artifact.file_name
        ))
    }
}

/// A named party such as the publisher or sovereign of a resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<PlainLiteral>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<PlainLiteral>,
}

impl Agent {
    pub fn new(id: Url, title: Option<&str>, description: Option<&str>) -> Self {
        Self {
            type_: IdsType::Agent,
            id,
            title: PlainLiteral::list(title),
            description: PlainLiteral::list(description),
        }
    }
}

/// Protocol-facing representation of one published asset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResource {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<PlainLiteral>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<PlainLiteral>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyword: Vec<PlainLiteral>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_license: Option<Url>,
    pub resource_endpoint: StaticEndpoint,
    pub publisher: Agent,
    pub sovereign: Agent,
}

impl DataResource {
    /// Artifact file name, which doubles as the stable per-asset key.
    pub fn file_name(&self) -> &str {
        &self.resource_endpoint.endpoint_artifact.file_name
    }
}

/// Offered and requested resources of a connector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    pub offer: Vec<DataResource>,
    pub request: Vec<DataResource>,
}

impl Catalog {
    pub fn new(id: Url, offer: Vec<DataResource>, request: Vec<DataResource>) -> Self {
        Self {
            type_: IdsType::Catalog,
            id,
            offer,
            request,
        }
    }
}

/// Full self-description of the connector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseConnector {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub type_: IdsType,
    #[serde(rename = "@id")]
    pub id: Url,
    pub maintainer: Url,
    pub curator: Url,
    pub version: String,
    pub outbound_model_version: String,
    pub inbound_model_version: Vec<String>,
    pub security_profile: SecurityProfile,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<PlainLiteral>,
    pub hosts: Vec<Host>,
    pub catalog: Catalog,
}

impl BaseConnector {
    /// Assemble a connector node. Version and profile fields are process constants.
    pub fn new(
        id: Url,
        maintainer: Url,
        curator: Url,
        title: Option<&str>,
        access_url: Url,
        catalog: Catalog,
    ) -> Self {
        Self {
            context: IDS_CONTEXT.to_string(),
            type_: IdsType::BaseConnector,
            id,
            maintainer,
            curator,
            version: CONNECTOR_VERSION.to_string(),
            outbound_model_version: INFO_MODEL_VERSION.to_string(),
            inbound_model_version: SUPPORTED_INFO_MODEL_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            security_profile: SecurityProfile::BaseConnector,
            title: PlainLiteral::list(title),
            hosts: vec![Host::new(access_url)],
            catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn endpoint(base: &str, file_name: &str) -> StaticEndpoint {
        StaticEndpoint::new(
            url(&format!("{}#ResourceEndpoint", base)),
            Host::with_id(url(&format!("{}#Host", base)), url(base)),
            Artifact::new(
                url(&format!("{}#Artifact", base)),
                file_name,
                Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap(),
            ),
        )
    }

    #[test]
    fn test_plain_literal_list_only_drops_absent() {
        assert!(PlainLiteral::list(None).is_empty());
        assert_eq!(PlainLiteral::list(Some("")), vec![PlainLiteral::new("")]);
        assert_eq!(PlainLiteral::list(Some("x")), vec![PlainLiteral::new("x")]);
    }

    #[test]
    fn test_plain_literal_without_language() {
        let value = serde_json::to_value(PlainLiteral::new("Sensors")).unwrap();
        assert_eq!(value, json!({"@value": "Sensors"}));
    }

    #[test]
    fn test_access_url_with_trailing_slash_base() {
        let endpoint = endpoint("https://conn.example/", "7");
        assert_eq!(
            endpoint.access_url().unwrap().as_str(),
            "https://conn.example/data/7"
        );
    }

    #[test]
    fn test_access_url_with_path_base() {
        let endpoint = endpoint("https://conn.example/odc", "42");
        assert_eq!(
            endpoint.access_url().unwrap().as_str(),
            "https://conn.example/odc/data/42"
        );
    }

    #[test]
    fn test_endpoint_serialization_shape() {
        let value = serde_json::to_value(endpoint("https://conn.example/", "7")).unwrap();
        assert_eq!(value["@type"], "ids:StaticEndpoint");
        assert_eq!(value["path"], "/data/");
        assert_eq!(value["endpointArtifact"]["fileName"], "7");
        assert_eq!(value["endpointHost"]["pathPrefix"], "/");
        assert_eq!(value["endpointHost"]["protocol"], "idsc:HTTP");
        assert_eq!(value["endpointHost"]["@id"], "https://conn.example/#Host");
    }

    #[test]
    fn test_agent_omits_absent_literals() {
        let agent = Agent::new(url("https://conn.example/#Publisher"), None, None);
        let value = serde_json::to_value(&agent).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("title"));
        assert!(!object.contains_key("description"));

        let agent = Agent::new(
            url("https://conn.example/#Sovereign"),
            Some("Org"),
            Some("An organization"),
        );
        let value = serde_json::to_value(&agent).unwrap();
        assert_eq!(value["title"][0]["@value"], "Org");
        assert_eq!(value["description"][0]["@value"], "An organization");
    }

    #[test]
    fn test_connector_constants() {
        let catalog = Catalog::new(url("https://conn.example/#Catalog"), vec![], vec![]);
        let connector = BaseConnector::new(
            url("https://conn.example/#Connector"),
            url("https://org.example/m"),
            url("https://org.example/c"),
            Some("Demo"),
            url("https://conn.example/"),
            catalog,
        );
        let value = serde_json::to_value(&connector).unwrap();
        assert_eq!(value["@context"], IDS_CONTEXT);
        assert_eq!(value["version"], "0.0.1");
        assert_eq!(value["outboundModelVersion"], "2.0.0");
        assert_eq!(value["inboundModelVersion"], json!(["2.0.0"]));
        assert_eq!(
            value["securityProfile"],
            "idsc:BASE_CONNECTOR_SECURITY_PROFILE"
        );
        assert_eq!(value["hosts"][0]["accessUrl"], "https://conn.example/");
        assert!(value["hosts"][0].get("@id").is_none());
        assert_eq!(value["catalog"]["offer"], Value::Array(vec![]));
        assert_eq!(value["catalog"]["request"], Value::Array(vec![]));
    }
}
