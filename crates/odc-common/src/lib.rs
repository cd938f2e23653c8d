//! ODC Common - Shared error codes and constants
//!
//! This crate provides the foundational pieces used across all connector components:
//! - Error codes for API responses
//! - Common constants

pub mod error;

pub use error::ErrorCode;

/// Media type of self-description documents
pub const LD_JSON_CONTENT_TYPE: &str = "application/ld+json";

/// Placeholder bearer token handed out until a real token issuer is wired in
pub const DEFAULT_SECURITY_TOKEN: &str = "abcdefg12";

/// Path segment under which artifacts are served to peers
pub const DATA_PATH: &str = "/data/";
