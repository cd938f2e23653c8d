//! Row to engine model conversions

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::warn;

use odc_core::{Asset, ConfigurationSnapshot};

use crate::entity::{configuration, data_asset};

/// Review state of a data asset, stored as an integer column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum AssetStatus {
    Unapproved = 0,
    Approved = 1,
    Published = 2,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Unapproved => "UNAPPROVED",
            AssetStatus::Approved => "APPROVED",
            AssetStatus::Published => "PUBLISHED",
        }
    }
}

impl Display for AssetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<AssetStatus> for i32 {
    fn from(status: AssetStatus) -> Self {
        status as i32
    }
}

impl TryFrom<i32> for AssetStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AssetStatus::Unapproved),
            1 => Ok(AssetStatus::Approved),
            2 => Ok(AssetStatus::Published),
            _ => Err(format!("Invalid asset status: {}", value)),
        }
    }
}

impl From<configuration::Model> for ConfigurationSnapshot {
    fn from(value: configuration::Model) -> Self {
        Self {
            url: value.url,
            maintainer: value.maintainer,
            curator: value.curator,
            title: value.title.unwrap_or_default(),
        }
    }
}

impl From<data_asset::Model> for Asset {
    fn from(value: data_asset::Model) -> Self {
        let tags = decode_tags(value.id, value.tags.as_deref());

        Self {
            id: value.id,
            dataset_title: value.dataset_title,
            dataset_description: value.dataset_description,
            version: value.version,
            license_url: value.license_url,
            tags,
            created_at: value.created_at.and_utc(),
            organization_title: value.organization_title,
            organization_description: value.organization_description,
        }
    }
}

/// Tags are stored as a JSON text array.
fn decode_tags(asset_id: i64, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(asset_id, "Ignoring malformed tags column: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(tags: Option<&str>) -> data_asset::Model {
        data_asset::Model {
            id: 4,
            dataset_title: Some("Air quality".to_string()),
            dataset_description: None,
            version: Some("2".to_string()),
            license_url: None,
            tags: tags.map(str::to_string),
            organization_title: Some("City".to_string()),
            organization_description: None,
            status: AssetStatus::Published.into(),
            created_at: NaiveDate::from_ymd_opt(2019, 11, 5)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_asset_status_conversion() {
        assert_eq!(i32::from(AssetStatus::Published), 2);
        assert_eq!(AssetStatus::try_from(0).unwrap(), AssetStatus::Unapproved);
        assert_eq!(AssetStatus::try_from(1).unwrap(), AssetStatus::Approved);
        assert!(AssetStatus::try_from(7).is_err());
        assert_eq!(AssetStatus::Published.to_string(), "PUBLISHED");
    }

    #[test]
    fn test_row_to_asset() {
        let asset = Asset::from(row(Some(r#"["air","city"]"#)));

        assert_eq!(asset.id, 4);
        assert_eq!(asset.dataset_title.as_deref(), Some("Air quality"));
        assert_eq!(asset.version.as_deref(), Some("2"));
        assert_eq!(asset.tags, vec!["air".to_string(), "city".to_string()]);
        assert_eq!(asset.organization_title.as_deref(), Some("City"));
        assert_eq!(asset.created_at.to_rfc3339(), "2019-11-05T08:30:00+00:00");
    }

    #[test]
    fn test_missing_or_malformed_tags() {
        assert!(Asset::from(row(None)).tags.is_empty());
        assert!(Asset::from(row(Some("  "))).tags.is_empty());
        assert!(Asset::from(row(Some("air, city"))).tags.is_empty());
    }

    #[test]
    fn test_row_to_configuration() {
        let snapshot = ConfigurationSnapshot::from(configuration::Model {
            id: 1,
            url: "https://conn.example/".to_string(),
            maintainer: "https://org.example/m".to_string(),
            curator: "https://org.example/c".to_string(),
            title: None,
        });
        assert_eq!(snapshot.url, "https://conn.example/");
        assert!(snapshot.title.is_empty());
    }
}
