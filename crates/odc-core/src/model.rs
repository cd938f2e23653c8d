//! Input records consumed by the assembly engine
//!
//! These mirror the rows the external configuration and asset stores hand
//! over. They are read fresh on every assembly and never mutated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use odc_api::Fragment;

use crate::error::{BuildError, fragment_uri, parse_uri};

/// Current connector identity and operational metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    pub url: String,
    pub maintainer: String,
    pub curator: String,
    pub title: String,
}

impl ConfigurationSnapshot {
    pub fn new(
        url: impl Into<String>,
        maintainer: impl Into<String>,
        curator: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            maintainer: maintainer.into(),
            curator: curator.into(),
            title: title.into(),
        }
    }

    /// The connector base URL, which also identifies the issuer of messages.
    ///
    /// The value is normalized the way [`Url`] does it, so a bare authority
    /// such as `https://conn.example` gains a trailing slash.
    pub fn base_url(&self) -> Result<Url, BuildError> {
        parse_uri("url", &self.url)
    }

    pub fn maintainer_uri(&self) -> Result<Url, BuildError> {
        parse_uri("maintainer", &self.maintainer)
    }

    pub fn curator_uri(&self) -> Result<Url, BuildError> {
        parse_uri("curator", &self.curator)
    }

    /// Role-scoped identity `<url>#<fragment>`
    pub fn identity(&self, fragment: Fragment) -> Result<Url, BuildError> {
        fragment_uri(&self.url, fragment)
    }
}

/// One published data offering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i64,
    #[serde(default)]
    pub dataset_title: Option<String>,
    #[serde(default)]
    pub dataset_description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub organization_title: Option<String>,
    #[serde(default)]
    pub organization_description: Option<String>,
}

impl Asset {
    /// Asset with only the required fields set
    pub fn new(id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            dataset_title: None,
            dataset_description: None,
            version: None,
            license_url: None,
            tags: Vec::new(),
            created_at,
            organization_title: None,
            organization_description: None,
        }
    }

    /// Artifact file name peers address this asset by
    pub fn file_name(&self) -> String {
        self.id.to_string()
    }
}
