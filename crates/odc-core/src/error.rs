//! Error types for self-description assembly

use odc_api::Fragment;

/// A descriptor field could not be turned into a valid URI
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid {field} uri '{value}': {source}")]
    InvalidUri {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl BuildError {
    pub fn invalid_uri(field: &'static str, value: impl Into<String>, source: url::ParseError) -> Self {
        BuildError::InvalidUri {
            field,
            value: value.into(),
            source,
        }
    }
}

/// Parse `value` as an absolute URI, naming `field` on failure.
pub fn parse_uri(
    field: &'static str,
    value: &str,
) -> std::result::Result<url::Url, BuildError> {
    url::Url::parse(value).map_err(|e| BuildError::invalid_uri(field, value, e))
}

/// Build the role-scoped identity `<base>#<fragment>`.
pub fn fragment_uri(
    base: &str,
    fragment: Fragment,
) -> std::result::Result<url::Url, BuildError> {
    fragment
        .uri(base)
        .map_err(|e| BuildError::invalid_uri("identity", format!("{}#{}", base, fragment), e))
}

/// One asset could not be converted; it is dropped from the catalog
#[derive(Debug, thiserror::Error)]
#[error("asset {asset_id} could not be described: {source}")]
pub struct AssetBuildFailure {
    pub asset_id: i64,
    #[source]
    pub source: BuildError,
}

/// Errors surfaced by the assembly engine to its callers
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("catalog composition failed: {0}")]
    CompositionFailure(String),

    #[error("security token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("no published artifact for asset {0}")]
    ArtifactNotFound(i64),

    #[error("artifact store unavailable: {0}")]
    ArtifactUnavailable(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::ConfigUnavailable("No config available.".to_string());
        assert_eq!(
            err.to_string(),
            "configuration unavailable: No config available."
        );

        let err = EngineError::TokenUnavailable("issuer down".to_string());
        assert_eq!(err.to_string(), "security token unavailable: issuer down");

        let err = EngineError::ArtifactNotFound(42);
        assert_eq!(err.to_string(), "no published artifact for asset 42");

        let err = EngineError::CompositionFailure("asset source failed".to_string());
        assert_eq!(
            err.to_string(),
            "catalog composition failed: asset source failed"
        );
    }

    #[test]
    fn test_parse_uri_names_field() {
        let err = parse_uri("license", "not a uri").unwrap_err();
        let BuildError::InvalidUri { field, value, .. } = &err;
        assert_eq!(*field, "license");
        assert_eq!(value, "not a uri");
        assert!(err.to_string().starts_with("invalid license uri 'not a uri'"));
    }

    #[test]
    fn test_build_error_converts_transparently() {
        let build = parse_uri("maintainer", "::").unwrap_err();
        let message = build.to_string();
        let err: EngineError = build.into();
        assert!(matches!(err, EngineError::Build(_)));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_fragment_uri() {
        let uri = fragment_uri("https://conn.example/", Fragment::Sovereign).unwrap();
        assert_eq!(uri.as_str(), "https://conn.example/#Sovereign");
        assert!(fragment_uri("conn.example", Fragment::Sovereign).is_err());
    }
}
